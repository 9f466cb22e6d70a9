//! Refresh cycles
//!
//! The three recurring cycles the scheduler drives: roster refresh (with
//! eviction reconcile), display-name refresh, and the activity refresh that
//! rebuilds every member's day buckets and score.
//!
//! Fault isolation is per member: one member failing - retry exhaustion,
//! corrupt record, anything - is logged and the batch moves on. Each record
//! is persisted immediately after its own update, so a crash mid-cycle loses
//! at most the in-flight member.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use clan_core::entities::{ChatStats, ClanRoster, RosterMember};
use clan_core::scoring;
use clan_core::value_objects::{ChatUserId, ReportingWindow};

use super::context::EngineContext;
use super::error::{EngineError, EngineResult, FetchError};
use super::reports::ReportService;
use super::roster::TrackedClan;

/// Tally of one activity refresh cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// What happened to one member inside a cycle
enum MemberOutcome {
    Updated,
    /// Gone or unreadable; counted but not an error
    Skipped,
}

/// Drives the recurring refresh cycles
#[derive(Clone)]
pub struct RefreshService {
    ctx: Arc<EngineContext>,
}

impl RefreshService {
    /// Create a new RefreshService
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Arc<EngineContext> {
        &self.ctx
    }

    // =========================================================================
    // Roster cycle
    // =========================================================================

    /// Refresh every tracked clan's roster, then evict records revoked from
    /// all rosters.
    ///
    /// A failed clan keeps its previous snapshot (stale-but-available) and
    /// suppresses eviction for the whole cycle: a partial union must not
    /// evict members of the clan that failed to refresh.
    #[instrument(skip(self))]
    pub async fn refresh_rosters(&self) -> EngineResult<()> {
        let mut all_ok = true;

        for clan in self.ctx.tracked_clans() {
            match self.refresh_one_roster(clan).await {
                Ok(count) => info!(clan = %clan.id, members = count, "roster refreshed"),
                Err(e) => {
                    all_ok = false;
                    warn!(
                        clan = %clan.id,
                        error = %e,
                        "roster refresh failed; keeping previous snapshot"
                    );
                }
            }
        }

        if all_ok {
            self.evict_departed().await?;
        } else {
            warn!("skipping eviction: at least one roster refresh failed");
        }
        Ok(())
    }

    async fn refresh_one_roster(&self, clan: &TrackedClan) -> EngineResult<usize> {
        let envelope = self
            .ctx
            .throttle()
            .call(|| self.ctx.game_api().get_group_members(clan.id))
            .await?;

        if !envelope.is_success() {
            return Err(EngineError::Fetch(FetchError::UnexpectedCode {
                code: envelope.error_code,
                message: envelope.message,
            }));
        }

        let members: Vec<RosterMember> = envelope
            .response
            .map(|page| page.members)
            .unwrap_or_default()
            .into_iter()
            .map(|m| RosterMember {
                account_id: m.account_id,
                display_name: m.display_name,
                joined_at: m.joined_at,
            })
            .collect();

        let roster = ClanRoster::new(clan.id, clan.name.clone(), members, Utc::now());
        let count = roster.len();

        // Snapshot persistence is best-effort; the in-process cache is
        // already the source of truth for this cycle
        if let Err(e) = self.ctx.roster_repo().save(&roster).await {
            warn!(clan = %clan.id, error = %e, "failed to persist roster snapshot");
        }

        self.ctx.roster_cache().install(roster);
        Ok(count)
    }

    /// Delete records whose game account is absent from every current
    /// roster. Runs under each member's lock so it cannot race an in-flight
    /// worker update.
    async fn evict_departed(&self) -> EngineResult<()> {
        let union = self.ctx.roster_cache().union_ids();

        for chat_id in self.ctx.member_repo().list_ids().await? {
            let lock = self.ctx.locks().lock_for(chat_id);
            let _guard = lock.lock().await;

            let record = match self.ctx.member_repo().find_by_chat_id(chat_id).await {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                // Unreadable rows are never deleted here: their game id is
                // unknowable, so absence from the union cannot be shown
                Err(e) if e.is_corrupt() => {
                    warn!(member = %chat_id, error = %e, "corrupt record; not considered for eviction");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if !union.contains(&record.game_id) {
                self.ctx.member_repo().delete(chat_id).await?;
                self.ctx.locks().forget(chat_id);
                info!(
                    member = %chat_id,
                    game = %record.game_id,
                    "evicted: no longer on any clan roster"
                );
            }
        }
        Ok(())
    }

    // =========================================================================
    // Name cycle
    // =========================================================================

    /// Refresh chat and game display names for every record
    #[instrument(skip(self))]
    pub async fn refresh_names(&self) -> EngineResult<()> {
        for chat_id in self.ctx.member_repo().list_ids().await? {
            if let Err(e) = self.refresh_name(chat_id).await {
                warn!(member = %chat_id, error = %e, "name refresh failed; continuing");
            }
        }
        Ok(())
    }

    async fn refresh_name(&self, chat_id: ChatUserId) -> EngineResult<()> {
        let lock = self.ctx.locks().lock_for(chat_id);
        let _guard = lock.lock().await;

        let mut record = match self.ctx.member_repo().find_by_chat_id(chat_id).await? {
            Some(record) => record,
            None => return Ok(()),
        };

        match self.ctx.chat().resolve_display_name(chat_id).await {
            Ok(name) => record.chat_name = name,
            Err(e) => warn!(member = %chat_id, error = %e, "chat name lookup failed"),
        }

        if let super::fetcher::ProfileLookup::Resolved(profile) =
            self.ctx.fetcher().resolve_profile(record.game_id).await?
        {
            record.game_name = profile.display_name;
        }

        record.touch(Utc::now());
        self.ctx.member_repo().update(&record).await?;
        Ok(())
    }

    // =========================================================================
    // Activity cycle
    // =========================================================================

    /// One full activity refresh over all tracked members
    #[instrument(skip(self))]
    pub async fn refresh_activity(&self) -> EngineResult<RefreshSummary> {
        self.refresh_activity_at(Utc::now().date_naive()).await
    }

    /// Clock-injected variant of `refresh_activity`, driven directly by
    /// tests and by `force_refresh`.
    pub async fn refresh_activity_at(&self, today: NaiveDate) -> EngineResult<RefreshSummary> {
        let window = ReportingWindow::trailing(today, self.ctx.window_days());
        let chat_stats = self.collect_chat_stats(window).await;

        let ids = self.ctx.member_repo().list_ids().await?;
        let workers = Arc::new(Semaphore::new(self.ctx.worker_count()));
        let mut join_set: JoinSet<(ChatUserId, EngineResult<MemberOutcome>)> = JoinSet::new();

        for chat_id in ids {
            let permit = workers
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| EngineError::Internal("worker semaphore closed".to_string()))?;
            let service = self.clone();
            let member_chat = chat_stats
                .as_ref()
                .map(|stats| stats.get(&chat_id).copied().unwrap_or_default());

            join_set.spawn(async move {
                let _permit = permit;
                let outcome = service
                    .refresh_member(chat_id, member_chat, window, today)
                    .await;
                (chat_id, outcome)
            });
        }

        let mut summary = RefreshSummary::default();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((_, Ok(MemberOutcome::Updated))) => summary.updated += 1,
                Ok((_, Ok(MemberOutcome::Skipped))) => summary.skipped += 1,
                Ok((chat_id, Err(e))) => {
                    summary.failed += 1;
                    warn!(member = %chat_id, error = %e, "member refresh failed; continuing");
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!(error = %e, "refresh worker panicked");
                }
            }
        }

        info!(
            updated = summary.updated,
            skipped = summary.skipped,
            failed = summary.failed,
            "activity refresh cycle complete"
        );
        Ok(summary)
    }

    /// Gather chat counters for the cycle. A chat-platform outage downgrades
    /// to keeping everyone's previous counters rather than failing the cycle.
    async fn collect_chat_stats(
        &self,
        window: ReportingWindow,
    ) -> Option<HashMap<ChatUserId, ChatStats>> {
        let since = window.start.and_time(NaiveTime::MIN).and_utc();
        match self
            .ctx
            .chat_stats()
            .collect(self.ctx.member_role(), since)
            .await
        {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(error = %e, "chat stats collection failed; keeping previous counters");
                None
            }
        }
    }

    /// Update one member under their lock: replace chat counters, reconcile
    /// day buckets, recompute the score, persist immediately.
    async fn refresh_member(
        &self,
        chat_id: ChatUserId,
        chat: Option<ChatStats>,
        window: ReportingWindow,
        today: NaiveDate,
    ) -> EngineResult<MemberOutcome> {
        let lock = self.ctx.locks().lock_for(chat_id);
        let _guard = lock.lock().await;

        let mut record = match self.ctx.member_repo().find_by_chat_id(chat_id).await {
            Ok(Some(record)) => record,
            // Evicted since the id list was taken
            Ok(None) => return Ok(MemberOutcome::Skipped),
            Err(e) if e.is_corrupt() => {
                warn!(member = %chat_id, error = %e, "record unreadable; skipped this cycle");
                return Ok(MemberOutcome::Skipped);
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(chat) = chat {
            record.replace_chat_stats(chat);
        }

        self.ctx
            .day_buckets()
            .reconcile(&mut record, window, today)
            .await?;

        let breakdown = scoring::compute_score(&record.game_activity, &record.chat_stats);
        record.set_score(breakdown.activity_score, breakdown.tier);
        record.touch(Utc::now());

        self.ctx.member_repo().update(&record).await?;

        debug!(
            member = %chat_id,
            score = breakdown.activity_score,
            tier = %breakdown.tier,
            "member refreshed"
        );
        Ok(MemberOutcome::Updated)
    }

    // =========================================================================
    // Command surface
    // =========================================================================

    /// Force an immediate refresh: one member when `query` is given,
    /// the whole batch otherwise.
    #[instrument(skip(self))]
    pub async fn force_refresh(&self, query: Option<&str>) -> EngineResult<()> {
        let today = Utc::now().date_naive();
        match query {
            None => {
                self.refresh_activity_at(today).await?;
                Ok(())
            }
            Some(query) => {
                let record = ReportService::new(&self.ctx).get_report(query).await?;
                let window = ReportingWindow::trailing(today, self.ctx.window_days());
                let chat = self
                    .collect_chat_stats(window)
                    .await
                    .map(|stats| stats.get(&record.chat_id).copied().unwrap_or_default());
                self.refresh_member(record.chat_id, chat, window, today)
                    .await?;
                Ok(())
            }
        }
    }
}
