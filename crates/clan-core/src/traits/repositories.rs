//! Repository traits (ports) - define the interface for durable state
//!
//! The domain layer defines what it needs, and the storage layer provides
//! the implementation.

use async_trait::async_trait;

use crate::entities::{ClanRoster, MemberRecord};
use crate::error::DomainError;
use crate::value_objects::{ChatUserId, GameAccountId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Member Record Repository
// ============================================================================

#[async_trait]
pub trait MemberRecordRepository: Send + Sync {
    /// All tracked chat ids.
    ///
    /// Records are loaded individually afterwards so that one corrupt row
    /// only poisons its own member, not the whole batch.
    async fn list_ids(&self) -> RepoResult<Vec<ChatUserId>>;

    /// Load a record by chat identity.
    ///
    /// An unreadable stored row yields `DomainError::CorruptRecord`.
    async fn find_by_chat_id(&self, id: ChatUserId) -> RepoResult<Option<MemberRecord>>;

    /// Load a record by game identity
    async fn find_by_game_id(&self, id: GameAccountId) -> RepoResult<Option<MemberRecord>>;

    /// Case-insensitive lookup over chat and game display names
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<MemberRecord>>;

    /// Insert a new record. A duplicate chat or game identity is rejected
    /// and the existing record is never overwritten.
    async fn create(&self, record: &MemberRecord) -> RepoResult<()>;

    /// Replace the stored row for this member atomically
    async fn update(&self, record: &MemberRecord) -> RepoResult<()>;

    /// Remove a record (roster-reconciliation eviction only)
    async fn delete(&self, id: ChatUserId) -> RepoResult<()>;
}

// ============================================================================
// Roster Repository
// ============================================================================

#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Overwrite the stored snapshot for the roster's clan
    async fn save(&self, roster: &ClanRoster) -> RepoResult<()>;

    /// Load every persisted snapshot (cache seed at startup)
    async fn load_all(&self) -> RepoResult<Vec<ClanRoster>>;
}
