//! Member record - the long-lived entity for one tracked individual

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::DayStat;
use crate::value_objects::{ChatUserId, ClanId, GameAccountId};

/// Rolling-window chat activity counters.
///
/// Fully replaced on each refresh, never accumulated across cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatStats {
    pub chat_events: u64,
    pub characters_typed: u64,
    pub voice_minutes: u64,
}

/// Coarse activity classification derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTier {
    Thriving,
    Dormant,
    Inactive,
}

impl StatusTier {
    pub const THRIVING_FLOOR: i64 = 3_000_000;
    pub const DORMANT_FLOOR: i64 = 1_000_000;

    #[must_use]
    pub fn from_score(score: i64) -> Self {
        if score >= Self::THRIVING_FLOOR {
            Self::Thriving
        } else if score >= Self::DORMANT_FLOOR {
            Self::Dormant
        } else {
            Self::Inactive
        }
    }
}

impl std::fmt::Display for StatusTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Thriving => write!(f, "thriving"),
            Self::Dormant => write!(f, "dormant"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for StatusTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "thriving" => Ok(Self::Thriving),
            "dormant" => Ok(Self::Dormant),
            "inactive" => Ok(Self::Inactive),
            _ => Err(format!("invalid status tier: {s}")),
        }
    }
}

/// The long-lived record for one tracked individual.
///
/// Identity fields are immutable once registered; display names refresh
/// periodically; `game_activity` holds one bucket per calendar day inside the
/// reporting window; score and tier are derived on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub chat_id: ChatUserId,
    pub game_id: GameAccountId,
    pub chat_name: String,
    pub game_name: String,
    pub clan_id: ClanId,
    pub game_activity: BTreeMap<NaiveDate, DayStat>,
    pub chat_stats: ChatStats,
    pub activity_score: i64,
    pub status_tier: StatusTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MemberRecord {
    /// Create a freshly registered record with zeroed statistics.
    #[must_use]
    pub fn register(
        chat_id: ChatUserId,
        chat_name: impl Into<String>,
        game_id: GameAccountId,
        game_name: impl Into<String>,
        clan_id: ClanId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            chat_id,
            game_id,
            chat_name: chat_name.into(),
            game_name: game_name.into(),
            clan_id,
            game_activity: BTreeMap::new(),
            chat_stats: ChatStats::default(),
            activity_score: 0,
            status_tier: StatusTier::Inactive,
            created_at: now,
            updated_at: now,
        }
    }

    /// Cached bucket for a day, if one exists.
    #[must_use]
    pub fn cached_day(&self, date: NaiveDate) -> Option<&DayStat> {
        self.game_activity.get(&date)
    }

    /// Replace the rolling chat counters wholesale.
    pub fn replace_chat_stats(&mut self, stats: ChatStats) {
        self.chat_stats = stats;
    }

    /// Replace the day-bucket map wholesale. Days that fell out of the
    /// reporting window are pruned by simply not being in the new map.
    pub fn replace_game_activity(&mut self, activity: BTreeMap<NaiveDate, DayStat>) {
        self.game_activity = activity;
    }

    /// Store a freshly derived score and tier.
    pub fn set_score(&mut self, score: i64, tier: StatusTier) {
        self.activity_score = score;
        self.status_tier = tier;
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
