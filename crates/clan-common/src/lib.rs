//! # clan-common
//!
//! Shared infrastructure concerns for the clan tracker: environment-based
//! configuration and tracing setup.

pub mod config;
pub mod telemetry;

pub use config::{
    AppConfig, AppSettings, BungieConfig, ConfigError, DatabaseConfig, Environment,
    SchedulerConfig, TrackedClanConfig, TrackingConfig,
};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
