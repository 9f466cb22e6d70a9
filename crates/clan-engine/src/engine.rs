//! Engine facade
//!
//! Wires storage, the HTTP game client, and the injected chat collaborator
//! into a running engine, and exposes the surface the command layer calls.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use clan_bungie::BungieClient;
use clan_common::AppConfig;
use clan_core::entities::MemberRecord;
use clan_core::traits::{ChatIdentity, ChatPlatform};
use clan_core::value_objects::{ClanId, GameAccountId};
use clan_db::{create_pool, PgMemberRecordRepository, PgRosterRepository};

use crate::scheduler::{SchedulePeriods, Scheduler};
use crate::services::{
    EngineContext, EngineError, EngineResult, RefreshService, RegistrationService, ReportService,
    RetryPolicy, RosterHit, TrackedClan, TrackingSettings,
};

/// The aggregation engine: shared context, refresh services, and the
/// scheduler driving them.
pub struct Engine {
    ctx: Arc<EngineContext>,
    refresh: RefreshService,
    scheduler: Option<Scheduler>,
}

impl Engine {
    /// Wire the engine from configuration, with PostgreSQL storage and the
    /// pooled HTTP game client.
    ///
    /// The chat-platform collaborator is injected by the embedding bot; the
    /// engine only knows its trait.
    pub async fn from_config(
        config: &AppConfig,
        chat: Arc<dyn ChatPlatform>,
    ) -> EngineResult<Self> {
        let db_config = clan_db::DatabaseConfig {
            url: config.database.url.clone(),
            max_connections: config.database.max_connections,
            min_connections: config.database.min_connections,
            ..Default::default()
        };
        let pool = create_pool(&db_config)
            .await
            .map_err(|e| EngineError::Config(format!("database: {e}")))?;
        info!("database connection established");

        let member_repo = Arc::new(PgMemberRecordRepository::new(pool.clone()));
        let roster_repo = Arc::new(PgRosterRepository::new(pool));

        let game_api = Arc::new(
            BungieClient::new(&config.bungie.api_key, &config.bungie.base_url)
                .map_err(|e| EngineError::Config(format!("game api client: {e}")))?,
        );

        let tracking = TrackingSettings {
            clans: config
                .tracking
                .clans
                .iter()
                .map(|clan| TrackedClan {
                    id: ClanId::new(clan.id),
                    name: clan.name.clone(),
                })
                .collect(),
            window_days: config.tracking.reporting_window_days,
            member_role: config.tracking.member_role.clone(),
        };

        let ctx = EngineContext::builder()
            .member_repo(member_repo)
            .roster_repo(roster_repo)
            .game_api(game_api)
            .chat(chat)
            .tracking(tracking)
            .requests_per_second(config.bungie.requests_per_second)
            .retry_policy(RetryPolicy {
                max_attempts: config.bungie.retry_max_attempts,
                base_backoff: Duration::from_millis(config.bungie.retry_base_backoff_ms),
                max_backoff: Duration::from_millis(config.bungie.retry_max_backoff_ms),
            })
            .worker_count(config.scheduler.worker_count)
            .day_concurrency(config.scheduler.day_concurrency)
            .build()
            .map_err(|e| EngineError::Config(e.to_string()))?;

        let periods = SchedulePeriods {
            roster_refresh: Duration::from_secs(config.scheduler.roster_refresh_secs),
            name_refresh: Duration::from_secs(config.scheduler.name_refresh_secs),
            activity_refresh: Duration::from_secs(config.scheduler.activity_refresh_secs),
        };

        Ok(Self::with_context(Arc::new(ctx), periods))
    }

    /// Assemble from a prebuilt context. Tests inject in-memory storage and
    /// scripted collaborators through this path.
    pub fn with_context(ctx: Arc<EngineContext>, periods: SchedulePeriods) -> Self {
        let refresh = RefreshService::new(ctx.clone());
        let scheduler = Scheduler::new(refresh.clone(), periods);
        Self {
            ctx,
            refresh,
            scheduler: Some(scheduler),
        }
    }

    /// Seed the roster cache from persisted snapshots, then start the
    /// periodic tasks.
    pub async fn start(&mut self) -> EngineResult<()> {
        match self.ctx.roster_repo().load_all().await {
            Ok(snapshots) => {
                info!(count = snapshots.len(), "roster cache seeded from storage");
                self.ctx.roster_cache().seed(snapshots);
            }
            Err(e) => {
                warn!(error = %e, "could not seed roster cache; first refresh will rebuild it");
            }
        }

        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.start();
        }
        Ok(())
    }

    /// Stop the periodic tasks, letting in-flight member updates finish
    pub async fn shutdown(mut self) {
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.shutdown().await;
        }
    }

    // =========================================================================
    // Command surface
    // =========================================================================

    /// Register a chat identity against a game account
    pub async fn register_member(
        &self,
        identity: ChatIdentity,
        game_id: GameAccountId,
    ) -> EngineResult<MemberRecord> {
        RegistrationService::new(&self.ctx)
            .register(identity, game_id)
            .await
    }

    /// Roster lookup by display name (pre-registration flow)
    pub fn find_roster_member(&self, name: &str) -> Option<RosterHit> {
        RegistrationService::new(&self.ctx).find_roster_member(name)
    }

    /// Fetch a member's current record by chat id or display name
    pub async fn get_report(&self, query: &str) -> EngineResult<MemberRecord> {
        ReportService::new(&self.ctx).get_report(query).await
    }

    /// Force an immediate refresh of one member, or everyone
    pub async fn force_refresh(&self, query: Option<&str>) -> EngineResult<()> {
        self.refresh.force_refresh(query).await
    }

    /// Member counts per tracked clan, from the cached rosters
    pub fn roster_counts(&self) -> BTreeMap<String, usize> {
        ReportService::new(&self.ctx).roster_counts()
    }
}
