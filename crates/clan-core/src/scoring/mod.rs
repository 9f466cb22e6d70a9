//! Activity score calculation
//!
//! Pure function over a member's day buckets and chat counters. No I/O and no
//! clock access, so the same inputs always produce the same score regardless
//! of when or how often it runs.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::entities::{ChatStats, DayStat, StatusTier, WindowTotals};

/// Full breakdown of one score computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub total_seconds: u64,
    pub total_unique: u64,
    pub total_clan_weight: f64,
    pub bonus_multiplier: f64,
    pub activity_score: i64,
    pub tier: StatusTier,
}

/// Combine aggregated day buckets and rolling chat counters into the final
/// activity score.
///
/// The typed-character term is scaled by the social bonus: a member who is
/// both chatty and plays alongside clanmates is weighted super-linearly,
/// while either signal alone carries much less.
#[must_use]
pub fn compute_score(
    game_activity: &BTreeMap<NaiveDate, DayStat>,
    chat: &ChatStats,
) -> ScoreBreakdown {
    let totals = WindowTotals::accumulate(game_activity.values());
    let bonus_multiplier = totals.bonus_multiplier();

    let score = totals.seconds_played as f64
        + (chat.chat_events * 60) as f64
        + (chat.characters_typed * 3) as f64 * bonus_multiplier;

    let activity_score = score as i64;

    ScoreBreakdown {
        total_seconds: totals.seconds_played,
        total_unique: totals.unique_clan_members,
        total_clan_weight: totals.clan_weight,
        bonus_multiplier,
        activity_score,
        tier: StatusTier::from_score(activity_score),
    }
}
