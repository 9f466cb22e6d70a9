//! # clan-engine
//!
//! The activity aggregation engine: combines chat activity and play-session
//! telemetry into per-member activity scores, on a recurring schedule.
//!
//! The embedding bot supplies the chat-platform collaborator and drives the
//! command surface; everything else - roster cache, remote fetcher,
//! day-bucket reconciliation, scoring, scheduling - lives here.

pub mod engine;
pub mod scheduler;
pub mod services;

// Re-export the surface the embedding bot needs
pub use engine::Engine;
pub use scheduler::{SchedulePeriods, Scheduler};
pub use services::{
    EngineContext, EngineContextBuilder, EngineError, EngineResult, FetchError, RefreshService,
    RefreshSummary, RegistrationService, ReportService, RetryPolicy, RosterCache, RosterHit,
    TrackedClan, TrackingSettings,
};
