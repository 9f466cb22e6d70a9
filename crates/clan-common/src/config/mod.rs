//! Configuration loading

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BungieConfig, ConfigError, DatabaseConfig, Environment,
    SchedulerConfig, TrackedClanConfig, TrackingConfig,
};
