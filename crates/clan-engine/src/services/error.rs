//! Engine error types
//!
//! `FetchError` is the remote-fetch taxonomy (retry exhaustion and
//! unresolvable profiles); `EngineError` is the unified error every service
//! operation returns.

use thiserror::Error;

use clan_core::error::DomainError;
use clan_core::traits::ChatError;
use clan_core::value_objects::GameAccountId;

/// Remote-fetch failures, after the bounded retry layer has given up.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transient-remote taxonomy: the call kept failing within its retry
    /// budget. The member's refresh fails for this cycle only.
    #[error("retry budget exhausted after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },

    /// The remote reported a non-success code the caller has no handling for
    #[error("remote returned code {code}: {message}")]
    UnexpectedCode { code: i32, message: String },

    /// No platform variant yielded a profile for this account
    #[error("no platform variant yielded a profile for {0}")]
    ProfileUnresolved(GameAccountId),
}

impl FetchError {
    /// Whether a later cycle could plausibly succeed without intervention
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Exhausted { .. } | Self::UnexpectedCode { .. })
    }
}

/// Unified error type for engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("chat platform error: {0}")]
    Chat(#[from] ChatError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Message safe to surface to a chat user. Distinct wording for the
    /// user-actionable cases; everything else collapses to a generic line
    /// rather than leaking internals.
    pub fn user_message(&self) -> String {
        match self {
            Self::Domain(e) if e.is_not_registered() => {
                "That member is not registered with the tracker.".to_string()
            }
            Self::Domain(e) if e.is_duplicate_registration() => {
                "That account is already registered. Contact an admin if this is unexpected."
                    .to_string()
            }
            Self::Domain(DomainError::RosterMembershipRequired) => {
                "You are not in our clan rosters. Please validate your membership before registering."
                    .to_string()
            }
            _ => "Something went wrong processing that request. Try again later.".to_string(),
        }
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
