//! Database models (SQLx `FromRow` row structs)

mod member_record;
mod roster;

pub use member_record::MemberRecordModel;
pub use roster::RosterSnapshotModel;
