//! Member record database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for member_records table
///
/// `game_activity` is a JSONB map of ISO dates to day buckets; it is decoded
/// and validated in the mapper, not here.
#[derive(Debug, Clone, FromRow)]
pub struct MemberRecordModel {
    pub chat_id: i64,
    pub game_id: i64,
    pub chat_name: String,
    pub game_name: String,
    pub clan_id: i64,
    pub chat_events: i64,
    pub characters_typed: i64,
    pub voice_minutes: i64,
    pub game_activity: serde_json::Value,
    pub activity_score: i64,
    pub status_tier: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
