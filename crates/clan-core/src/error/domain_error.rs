//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{ChatUserId, ClanId, GameAccountId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Lookup Errors
    // =========================================================================
    #[error("Member not registered: {0}")]
    NotRegistered(String),

    #[error("Roster snapshot not found for clan {0}")]
    RosterNotFound(ClanId),

    // =========================================================================
    // Registration Conflicts
    // =========================================================================
    #[error("Chat account {0} is already registered")]
    ChatAlreadyRegistered(ChatUserId),

    #[error("Game account {0} is already registered")]
    GameAlreadyRegistered(GameAccountId),

    #[error("Registration requires current clan roster membership")]
    RosterMembershipRequired,

    // =========================================================================
    // Stored-State Faults
    // =========================================================================
    #[error("Stored record for member {id} is unreadable: {reason}")]
    CorruptRecord { id: ChatUserId, reason: String },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for logs and command responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotRegistered(_) => "NOT_REGISTERED",
            Self::RosterNotFound(_) => "UNKNOWN_ROSTER",
            Self::ChatAlreadyRegistered(_) | Self::GameAlreadyRegistered(_) => {
                "ALREADY_REGISTERED"
            }
            Self::RosterMembershipRequired => "ROSTER_MEMBERSHIP_REQUIRED",
            Self::CorruptRecord { .. } => "CORRUPT_RECORD",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a duplicate-registration conflict
    pub fn is_duplicate_registration(&self) -> bool {
        matches!(
            self,
            Self::ChatAlreadyRegistered(_) | Self::GameAlreadyRegistered(_)
        )
    }

    /// Check if this is an unreadable-record fault (skip, never delete)
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::CorruptRecord { .. })
    }

    /// Check if this is a "not registered" lookup miss
    pub fn is_not_registered(&self) -> bool {
        matches!(self, Self::NotRegistered(_))
    }
}
