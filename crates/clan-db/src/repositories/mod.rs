//! PostgreSQL repository implementations

mod error;
mod member_record;
mod roster;

pub use error::{map_db_error, map_unique_violation};
pub use member_record::PgMemberRecordRepository;
pub use roster::PgRosterRepository;
