//! Entity <-> model mappers
//!
//! Validation happens here, at the deserialization boundary: a stored row
//! that no longer decodes becomes a typed fault instead of a panic.

mod member_record;
mod roster;

pub use member_record::MemberRecordRow;
pub use roster::RosterSnapshotRow;
