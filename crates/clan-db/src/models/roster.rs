//! Roster snapshot database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for roster_snapshots table
#[derive(Debug, Clone, FromRow)]
pub struct RosterSnapshotModel {
    pub clan_id: i64,
    pub clan_name: String,
    pub last_updated: DateTime<Utc>,
    pub members: serde_json::Value,
}
