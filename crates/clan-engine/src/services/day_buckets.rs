//! Day-bucket reconciliation
//!
//! Historical days are computed once and frozen; today is provisional and
//! recomputed every cycle. That bounds remote cost to O(window) amortized
//! instead of O(window) per cycle.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, instrument};

use clan_core::entities::{DayStat, MemberRecord};
use clan_core::value_objects::{GameAccountId, ReportingWindow};

use super::error::EngineError;
use super::fetcher::{ActivityFetcher, DayActivity};
use super::participants;
use super::roster::RosterCache;

/// Rebuilds a member's day buckets for the reporting window
pub struct DayBucketService {
    fetcher: Arc<ActivityFetcher>,
    roster: Arc<RosterCache>,
    day_concurrency: usize,
}

impl DayBucketService {
    pub fn new(
        fetcher: Arc<ActivityFetcher>,
        roster: Arc<RosterCache>,
        day_concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            roster,
            day_concurrency: day_concurrency.max(1),
        }
    }

    /// Rebuild `record.game_activity` over `window`.
    ///
    /// A cached bucket for a day strictly before `today` is reused verbatim
    /// with no remote call. Missing days - and always `today` - are fetched
    /// and aggregated. The rebuilt map replaces the old one wholesale, which
    /// also prunes days that fell out of the window.
    ///
    /// Day fetches run with bounded concurrency; pagination inside each day
    /// stays sequential in the fetcher. Any failed day aborts the member's
    /// reconcile and the record keeps its previous state.
    #[instrument(skip(self, record), fields(member = %record.chat_id))]
    pub async fn reconcile(
        &self,
        record: &mut MemberRecord,
        window: ReportingWindow,
        today: NaiveDate,
    ) -> Result<(), EngineError> {
        let mut rebuilt = BTreeMap::new();
        let mut missing = Vec::new();

        for day in window.days() {
            match record.cached_day(day) {
                Some(cached) if day < today => {
                    rebuilt.insert(day, cached.clone());
                }
                _ => missing.push(day),
            }
        }

        debug!(
            cached = rebuilt.len(),
            to_fetch = missing.len(),
            "reconciling day buckets"
        );

        let account = record.game_id;
        let fetched: Vec<(NaiveDate, DayStat)> = stream::iter(missing)
            .map(|day| self.fetch_day_stat(account, day))
            .buffer_unordered(self.day_concurrency)
            .try_collect()
            .await?;

        for (day, stat) in fetched {
            rebuilt.insert(day, stat);
        }

        record.replace_game_activity(rebuilt);
        Ok(())
    }

    async fn fetch_day_stat(
        &self,
        account: GameAccountId,
        day: NaiveDate,
    ) -> Result<(NaiveDate, DayStat), EngineError> {
        let activity = self.fetcher.fetch_day(account, day).await?;
        Ok((day, aggregate_day(day, &activity, account, &self.roster)))
    }
}

/// Fold one day's sessions into its bucket.
///
/// Seconds sum over sessions; the clan weight sums each session's capped
/// cohort contribution; unique teammates are deduplicated across the whole
/// day. A privacy-restricted day is a zero bucket.
pub fn aggregate_day(
    date: NaiveDate,
    activity: &DayActivity,
    self_id: GameAccountId,
    roster: &RosterCache,
) -> DayStat {
    if activity.privacy_restricted {
        return DayStat::zeroed(date);
    }

    let mut seconds_played = 0u64;
    let mut clan_weight = 0f64;
    let mut unique: HashSet<GameAccountId> = HashSet::new();

    for session in &activity.sessions {
        seconds_played += session.seconds_played;
        let cohort = participants::resolve(session, self_id, roster);
        clan_weight += cohort.clan_weight;
        unique.extend(cohort.unique);
    }

    DayStat {
        date,
        seconds_played,
        clan_members_played_with: clan_weight,
        unique_clan_members_played_with: unique.len() as u32,
    }
}
