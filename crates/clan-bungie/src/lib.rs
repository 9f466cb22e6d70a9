//! # clan-bungie
//!
//! HTTP client for the game-statistics API, implementing the `GameStatsApi`
//! trait from `clan-core`.
//!
//! One pooled `reqwest::Client` is constructed at startup and reused for
//! every call. Rate limiting and retries are the engine's job; this crate
//! only speaks the wire protocol and normalizes the envelope.

mod client;
mod wire;

pub use client::BungieClient;
