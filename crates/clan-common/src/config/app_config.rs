//! Application configuration structs
//!
//! Loads configuration from environment variables (with an optional `.env`
//! file for local development).

use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub bungie: BungieConfig,
    pub tracking: TrackingConfig,
    pub scheduler: SchedulerConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Game-statistics API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BungieConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Global ceiling on outbound API calls
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    #[serde(default = "default_retry_base_backoff_ms")]
    pub retry_base_backoff_ms: u64,
    #[serde(default = "default_retry_max_backoff_ms")]
    pub retry_max_backoff_ms: u64,
}

/// One clan tracked by the engine
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackedClanConfig {
    pub id: i64,
    pub name: String,
}

/// What is tracked and over which window
#[derive(Debug, Clone, Deserialize)]
pub struct TrackingConfig {
    pub clans: Vec<TrackedClanConfig>,
    #[serde(default = "default_reporting_window_days")]
    pub reporting_window_days: u32,
    /// Chat role whose holders count toward chat statistics
    #[serde(default = "default_member_role")]
    pub member_role: String,
}

/// Periods for the recurring cycles and sizing for the worker pool
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_roster_refresh_secs")]
    pub roster_refresh_secs: u64,
    #[serde(default = "default_name_refresh_secs")]
    pub name_refresh_secs: u64,
    #[serde(default = "default_activity_refresh_secs")]
    pub activity_refresh_secs: u64,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// Concurrent day fetches within one member's reconcile
    #[serde(default = "default_day_concurrency")]
    pub day_concurrency: usize,
}

// Default value functions
fn default_app_name() -> String {
    "clan-tracker".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_base_url() -> String {
    "https://bungie.net/Platform".to_string()
}

fn default_requests_per_second() -> u32 {
    20
}

fn default_retry_max_attempts() -> u32 {
    4
}

fn default_retry_base_backoff_ms() -> u64 {
    500
}

fn default_retry_max_backoff_ms() -> u64 {
    15_000
}

fn default_reporting_window_days() -> u32 {
    30
}

fn default_member_role() -> String {
    "Member".to_string()
}

fn default_roster_refresh_secs() -> u64 {
    3600
}

fn default_name_refresh_secs() -> u64 {
    3600
}

fn default_activity_refresh_secs() -> u64 {
    86_400
}

fn default_worker_count() -> usize {
    4
}

fn default_day_concurrency() -> usize {
    4
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", default_max_connections),
                min_connections: env_or("DATABASE_MIN_CONNECTIONS", default_min_connections),
            },
            bungie: BungieConfig {
                api_key: env::var("BUNGIE_API_KEY")
                    .map_err(|_| ConfigError::MissingVar("BUNGIE_API_KEY"))?,
                base_url: env::var("BUNGIE_BASE_URL").unwrap_or_else(|_| default_base_url()),
                requests_per_second: env_or(
                    "BUNGIE_REQUESTS_PER_SECOND",
                    default_requests_per_second,
                ),
                retry_max_attempts: env_or("BUNGIE_RETRY_MAX_ATTEMPTS", default_retry_max_attempts),
                retry_base_backoff_ms: env_or(
                    "BUNGIE_RETRY_BASE_BACKOFF_MS",
                    default_retry_base_backoff_ms,
                ),
                retry_max_backoff_ms: env_or(
                    "BUNGIE_RETRY_MAX_BACKOFF_MS",
                    default_retry_max_backoff_ms,
                ),
            },
            tracking: TrackingConfig {
                clans: parse_clans(
                    &env::var("CLANS").map_err(|_| ConfigError::MissingVar("CLANS"))?,
                )?,
                reporting_window_days: env_or(
                    "REPORTING_WINDOW_DAYS",
                    default_reporting_window_days,
                ),
                member_role: env::var("MEMBER_ROLE").unwrap_or_else(|_| default_member_role()),
            },
            scheduler: SchedulerConfig {
                roster_refresh_secs: env_or("ROSTER_REFRESH_SECS", default_roster_refresh_secs),
                name_refresh_secs: env_or("NAME_REFRESH_SECS", default_name_refresh_secs),
                activity_refresh_secs: env_or(
                    "ACTIVITY_REFRESH_SECS",
                    default_activity_refresh_secs,
                ),
                worker_count: env_or("WORKER_COUNT", default_worker_count),
                day_concurrency: env_or("DAY_CONCURRENCY", default_day_concurrency),
            },
        })
    }
}

/// Read an env var, falling back to the default when absent or unparseable
fn env_or<T: std::str::FromStr>(name: &str, default: fn() -> T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(default)
}

/// Parse the tracked-clan list from `id:name` pairs separated by commas,
/// e.g. `CLANS="2923394:Ace's Brew,3190950:Ace's Brew II"`.
fn parse_clans(raw: &str) -> Result<Vec<TrackedClanConfig>, ConfigError> {
    let mut clans = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (id, name) = entry
            .split_once(':')
            .ok_or_else(|| ConfigError::InvalidValue("CLANS", entry.to_string()))?;
        let id = id
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidValue("CLANS", entry.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::InvalidValue("CLANS", entry.to_string()));
        }
        clans.push(TrackedClanConfig {
            id,
            name: name.to_string(),
        });
    }
    if clans.is_empty() {
        return Err(ConfigError::InvalidValue("CLANS", raw.to_string()));
    }
    Ok(clans)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
