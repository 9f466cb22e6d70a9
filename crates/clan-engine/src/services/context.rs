//! Engine context - shared handles and settings for all services

use std::sync::Arc;

use clan_core::traits::{ChatPlatform, GameStatsApi, MemberRecordRepository, RosterRepository};

use super::chat_stats::ChatStatsCollector;
use super::day_buckets::DayBucketService;
use super::fetcher::ActivityFetcher;
use super::locks::MemberLockMap;
use super::roster::{RosterCache, TrackedClan};
use super::throttle::{ApiThrottle, RetryPolicy};

/// Tracking settings the services need at runtime
#[derive(Debug, Clone)]
pub struct TrackingSettings {
    pub clans: Vec<TrackedClan>,
    pub window_days: u32,
    pub member_role: String,
}

/// Shared context holding every collaborator, cache, and setting
pub struct EngineContext {
    member_repo: Arc<dyn MemberRecordRepository>,
    roster_repo: Arc<dyn RosterRepository>,
    game_api: Arc<dyn GameStatsApi>,
    chat: Arc<dyn ChatPlatform>,
    throttle: Arc<ApiThrottle>,
    roster_cache: Arc<RosterCache>,
    fetcher: Arc<ActivityFetcher>,
    day_buckets: DayBucketService,
    chat_stats: ChatStatsCollector,
    locks: MemberLockMap,
    tracking: TrackingSettings,
    worker_count: usize,
}

impl EngineContext {
    pub fn builder() -> EngineContextBuilder {
        EngineContextBuilder::default()
    }

    pub fn member_repo(&self) -> &dyn MemberRecordRepository {
        self.member_repo.as_ref()
    }

    pub fn roster_repo(&self) -> &dyn RosterRepository {
        self.roster_repo.as_ref()
    }

    pub fn game_api(&self) -> &Arc<dyn GameStatsApi> {
        &self.game_api
    }

    pub fn chat(&self) -> &dyn ChatPlatform {
        self.chat.as_ref()
    }

    pub fn throttle(&self) -> &ApiThrottle {
        &self.throttle
    }

    pub fn roster_cache(&self) -> &RosterCache {
        &self.roster_cache
    }

    pub fn fetcher(&self) -> &ActivityFetcher {
        &self.fetcher
    }

    pub fn day_buckets(&self) -> &DayBucketService {
        &self.day_buckets
    }

    pub fn chat_stats(&self) -> &ChatStatsCollector {
        &self.chat_stats
    }

    pub fn locks(&self) -> &MemberLockMap {
        &self.locks
    }

    pub fn tracked_clans(&self) -> &[TrackedClan] {
        &self.tracking.clans
    }

    pub fn window_days(&self) -> u32 {
        self.tracking.window_days
    }

    pub fn member_role(&self) -> &str {
        &self.tracking.member_role
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }
}

/// Builder for EngineContext
#[derive(Default)]
pub struct EngineContextBuilder {
    member_repo: Option<Arc<dyn MemberRecordRepository>>,
    roster_repo: Option<Arc<dyn RosterRepository>>,
    game_api: Option<Arc<dyn GameStatsApi>>,
    chat: Option<Arc<dyn ChatPlatform>>,
    tracking: Option<TrackingSettings>,
    requests_per_second: Option<u32>,
    retry_policy: Option<RetryPolicy>,
    worker_count: Option<usize>,
    day_concurrency: Option<usize>,
}

impl EngineContextBuilder {
    pub fn member_repo(mut self, repo: Arc<dyn MemberRecordRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn roster_repo(mut self, repo: Arc<dyn RosterRepository>) -> Self {
        self.roster_repo = Some(repo);
        self
    }

    pub fn game_api(mut self, api: Arc<dyn GameStatsApi>) -> Self {
        self.game_api = Some(api);
        self
    }

    pub fn chat(mut self, chat: Arc<dyn ChatPlatform>) -> Self {
        self.chat = Some(chat);
        self
    }

    pub fn tracking(mut self, tracking: TrackingSettings) -> Self {
        self.tracking = Some(tracking);
        self
    }

    pub fn requests_per_second(mut self, rps: u32) -> Self {
        self.requests_per_second = Some(rps);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    pub fn worker_count(mut self, count: usize) -> Self {
        self.worker_count = Some(count);
        self
    }

    pub fn day_concurrency(mut self, concurrency: usize) -> Self {
        self.day_concurrency = Some(concurrency);
        self
    }

    /// Build the context, wiring the derived services.
    ///
    /// # Errors
    /// Returns the name of the first missing required field.
    pub fn build(self) -> Result<EngineContext, &'static str> {
        let member_repo = self.member_repo.ok_or("member_repo is required")?;
        let roster_repo = self.roster_repo.ok_or("roster_repo is required")?;
        let game_api = self.game_api.ok_or("game_api is required")?;
        let chat = self.chat.ok_or("chat is required")?;
        let tracking = self.tracking.ok_or("tracking is required")?;

        let throttle = Arc::new(ApiThrottle::new(
            self.requests_per_second.unwrap_or(20),
            self.retry_policy.unwrap_or_default(),
        ));
        let roster_cache = Arc::new(RosterCache::new());
        let fetcher = Arc::new(ActivityFetcher::new(game_api.clone(), throttle.clone()));
        let day_buckets = DayBucketService::new(
            fetcher.clone(),
            roster_cache.clone(),
            self.day_concurrency.unwrap_or(4),
        );
        let chat_stats = ChatStatsCollector::new(chat.clone());

        Ok(EngineContext {
            member_repo,
            roster_repo,
            game_api,
            chat,
            throttle,
            roster_cache,
            fetcher,
            day_buckets,
            chat_stats,
            locks: MemberLockMap::new(),
            tracking,
            worker_count: self.worker_count.unwrap_or(4).max(1),
        })
    }
}
