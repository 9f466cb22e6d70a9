//! # clan-db
//!
//! Storage layer implementing the repository traits of `clan-core` with
//! PostgreSQL via SQLx.
//!
//! One row per tracked member (`member_records`), one snapshot row per clan
//! (`roster_snapshots`) - namespaced in separate tables so roster writes and
//! member writes never contend. A row update replaces the whole row, which is
//! the atomic-replace contract the engine relies on.
//!
//! Day buckets and roster members live in JSONB columns and are validated in
//! the mappers when rows are read back; a malformed row surfaces as
//! `DomainError::CorruptRecord` for that member only.

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{PgMemberRecordRepository, PgRosterRepository};
