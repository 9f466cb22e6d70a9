//! MemberRecord entity <-> model mapper

use std::collections::BTreeMap;

use chrono::NaiveDate;

use clan_core::entities::{ChatStats, DayStat, MemberRecord, StatusTier};
use clan_core::error::DomainError;
use clan_core::value_objects::{ChatUserId, ClanId, GameAccountId};

use crate::models::MemberRecordModel;

fn corrupt(chat_id: i64, reason: impl Into<String>) -> DomainError {
    DomainError::CorruptRecord {
        id: ChatUserId::new(chat_id),
        reason: reason.into(),
    }
}

/// Convert a stored row into the domain entity, validating as we go.
///
/// Counter columns must be non-negative and `game_activity` must decode as a
/// date -> bucket map; anything else marks the row corrupt for this member
/// without touching the rest of the batch.
impl TryFrom<MemberRecordModel> for MemberRecord {
    type Error = DomainError;

    fn try_from(model: MemberRecordModel) -> Result<Self, Self::Error> {
        let chat_events = u64::try_from(model.chat_events)
            .map_err(|_| corrupt(model.chat_id, "negative chat_events"))?;
        let characters_typed = u64::try_from(model.characters_typed)
            .map_err(|_| corrupt(model.chat_id, "negative characters_typed"))?;
        let voice_minutes = u64::try_from(model.voice_minutes)
            .map_err(|_| corrupt(model.chat_id, "negative voice_minutes"))?;

        let game_activity: BTreeMap<NaiveDate, DayStat> =
            serde_json::from_value(model.game_activity)
                .map_err(|e| corrupt(model.chat_id, format!("bad game_activity: {e}")))?;

        let status_tier: StatusTier = model
            .status_tier
            .parse()
            .map_err(|e: String| corrupt(model.chat_id, e))?;

        Ok(MemberRecord {
            chat_id: ChatUserId::new(model.chat_id),
            game_id: GameAccountId::new(model.game_id),
            chat_name: model.chat_name,
            game_name: model.game_name,
            clan_id: ClanId::new(model.clan_id),
            game_activity,
            chat_stats: ChatStats {
                chat_events,
                characters_typed,
                voice_minutes,
            },
            activity_score: model.activity_score,
            status_tier,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Column values for database insertion or update
pub struct MemberRecordRow {
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
}

impl MemberRecordRow {
    pub fn new(record: &MemberRecord) -> Result<Self, DomainError> {
        let game_activity = serde_json::to_value(&record.game_activity)
            .map_err(|e| DomainError::InternalError(format!("encode game_activity: {e}")))?;

        Ok(Self {
            chat_id: record.chat_id.into_inner(),
            game_id: record.game_id.into_inner(),
            chat_name: record.chat_name.clone(),
            game_name: record.game_name.clone(),
            clan_id: record.clan_id.into_inner(),
            chat_events: i64::try_from(record.chat_stats.chat_events).unwrap_or(i64::MAX),
            characters_typed: i64::try_from(record.chat_stats.characters_typed)
                .unwrap_or(i64::MAX),
            voice_minutes: i64::try_from(record.chat_stats.voice_minutes).unwrap_or(i64::MAX),
            game_activity,
            activity_score: record.activity_score,
            status_tier: record.status_tier.to_string(),
        })
    }
}
