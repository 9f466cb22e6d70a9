//! Aggregation scheduler
//!
//! Three independent periodic tasks drive the refresh cycles, each on its
//! own timer. Shutdown is a watch signal: every task finishes the cycle step
//! it is in before exiting, so no record is left half-written.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::services::{EngineResult, RefreshService};

/// Periods for the recurring cycles
#[derive(Debug, Clone)]
pub struct SchedulePeriods {
    pub roster_refresh: Duration,
    pub name_refresh: Duration,
    pub activity_refresh: Duration,
}

impl Default for SchedulePeriods {
    fn default() -> Self {
        Self {
            roster_refresh: Duration::from_secs(3600),
            name_refresh: Duration::from_secs(3600),
            activity_refresh: Duration::from_secs(86_400),
        }
    }
}

/// Owns the periodic tasks and their shutdown signal
pub struct Scheduler {
    refresh: RefreshService,
    periods: SchedulePeriods,
    shutdown_tx: watch::Sender<bool>,
    tasks: JoinSet<()>,
}

impl Scheduler {
    /// Create a new Scheduler (tasks start on `start`)
    pub fn new(refresh: RefreshService, periods: SchedulePeriods) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            refresh,
            periods,
            shutdown_tx,
            tasks: JoinSet::new(),
        }
    }

    /// Spawn the three periodic tasks. Each fires immediately on start, then
    /// on its period.
    pub fn start(&mut self) {
        self.spawn_cycle("roster_refresh", self.periods.roster_refresh, |service| async move {
            service.refresh_rosters().await
        });
        self.spawn_cycle("name_refresh", self.periods.name_refresh, |service| async move {
            service.refresh_names().await
        });
        self.spawn_cycle(
            "activity_refresh",
            self.periods.activity_refresh,
            |service| async move { service.refresh_activity().await.map(|_| ()) },
        );
        info!("scheduler started");
    }

    fn spawn_cycle<F, Fut>(&mut self, name: &'static str, period: Duration, run: F)
    where
        F: Fn(RefreshService) -> Fut + Send + 'static,
        Fut: Future<Output = EngineResult<()>> + Send,
    {
        let refresh = self.refresh.clone();
        let mut shutdown = self.shutdown_tx.subscribe();

        self.tasks.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = run(refresh.clone()).await {
                            error!(task = name, error = %e, "cycle failed");
                        }
                    }
                    _ = shutdown.changed() => {
                        info!(task = name, "stopping");
                        break;
                    }
                }
            }
        });
    }

    /// Signal shutdown and wait for every task to finish its in-flight step
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);
        while self.tasks.join_next().await.is_some() {}
        info!("scheduler stopped");
    }
}
