//! Engine services

pub mod chat_stats;
pub mod context;
pub mod day_buckets;
pub mod error;
pub mod fetcher;
pub mod locks;
pub mod participants;
pub mod refresh;
pub mod registration;
pub mod reports;
pub mod roster;
pub mod throttle;

pub use chat_stats::ChatStatsCollector;
pub use context::{EngineContext, EngineContextBuilder, TrackingSettings};
pub use day_buckets::{aggregate_day, DayBucketService};
pub use error::{EngineError, EngineResult, FetchError};
pub use fetcher::{ActivityFetcher, DayActivity, ProfileLookup, ResolvedProfile};
pub use locks::MemberLockMap;
pub use participants::{resolve, SessionCohort, SESSION_WEIGHT_CAP};
pub use refresh::{RefreshService, RefreshSummary};
pub use registration::RegistrationService;
pub use reports::ReportService;
pub use roster::{RosterCache, RosterHit, TrackedClan};
pub use throttle::{ApiThrottle, RetryPolicy};
