//! Day bucket - one calendar day's aggregated play statistics

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregated play statistics for one UTC calendar day.
///
/// Once written for a day strictly before today, a `DayStat` is frozen and
/// reused on later refresh cycles instead of being re-fetched. Today's bucket
/// is provisional and overwritten every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStat {
    pub date: NaiveDate,
    pub seconds_played: u64,
    /// Fractional accumulator: each session contributes its clan-teammate
    /// count, capped per session, hence non-integer totals.
    pub clan_members_played_with: f64,
    pub unique_clan_members_played_with: u32,
}

impl DayStat {
    /// A well-formed empty bucket (used for privacy-restricted profiles and
    /// days with no recorded sessions).
    #[must_use]
    pub fn zeroed(date: NaiveDate) -> Self {
        Self {
            date,
            seconds_played: 0,
            clan_members_played_with: 0.0,
            unique_clan_members_played_with: 0,
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.seconds_played == 0
            && self.clan_members_played_with == 0.0
            && self.unique_clan_members_played_with == 0
    }
}

/// Totals accumulated over a window of day buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowTotals {
    pub seconds_played: u64,
    pub clan_weight: f64,
    pub unique_clan_members: u64,
}

impl WindowTotals {
    pub fn accumulate<'a>(days: impl IntoIterator<Item = &'a DayStat>) -> Self {
        let mut totals = Self::default();
        for day in days {
            totals.seconds_played += day.seconds_played;
            totals.clan_weight += day.clan_members_played_with;
            totals.unique_clan_members += u64::from(day.unique_clan_members_played_with);
        }
        totals
    }

    /// Social-engagement bonus: unique teammates plus the capped per-session
    /// weight, summed over the window.
    #[must_use]
    pub fn bonus_multiplier(&self) -> f64 {
        self.clan_weight + self.unique_clan_members as f64
    }
}
