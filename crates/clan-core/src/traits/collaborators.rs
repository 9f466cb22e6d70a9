//! Collaborator traits - boundaries to the chat platform and the
//! game-statistics API
//!
//! Every game-API call returns a structured envelope whose application-level
//! error code is distinct from the transport status. Transport faults are
//! `ApiError` and are retried upstream; envelope codes are business outcomes
//! the caller must discriminate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_objects::{ChatUserId, ClanId, GameAccountId, MembershipType};

/// Application-level success code
pub const CODE_SUCCESS: i32 = 1;
/// Profile is privacy-restricted: a valid business outcome, not a fault
pub const CODE_PRIVACY_RESTRICTED: i32 = 1665;

// ============================================================================
// Game-Statistics API
// ============================================================================

/// Transport-level failure reaching the remote API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("malformed response body: {0}")]
    Decode(String),
}

/// Structured envelope wrapping every game-API payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub error_code: i32,
    /// Server throttle hint, seconds. Non-zero means back off at least this
    /// long before retrying.
    pub throttle_seconds: u32,
    pub message: String,
    pub response: Option<T>,
}

impl<T> ApiResponse<T> {
    /// A successful envelope carrying `response`
    pub fn success(response: T) -> Self {
        Self {
            error_code: CODE_SUCCESS,
            throttle_seconds: 0,
            message: "Ok".to_string(),
            response: Some(response),
        }
    }

    /// A well-formed failure envelope with no payload
    pub fn failure(error_code: i32, message: impl Into<String>) -> Self {
        Self {
            error_code,
            throttle_seconds: 0,
            message: message.into(),
            response: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error_code == CODE_SUCCESS
    }

    pub fn is_privacy_restricted(&self) -> bool {
        self.error_code == CODE_PRIVACY_RESTRICTED
    }
}

/// Profile lookup payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileData {
    pub display_name: String,
    pub character_ids: Vec<i64>,
}

/// One page of a character's activity history, newest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityPage {
    pub activities: Vec<ActivityEntry>,
}

/// One activity-history row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub instance_id: i64,
    pub period: DateTime<Utc>,
    pub seconds_played: u64,
}

/// Detailed per-participant report for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionReport {
    pub participants: Vec<ParticipantEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantEntry {
    pub account_id: GameAccountId,
    pub display_name: Option<String>,
    pub is_public: bool,
}

/// One page of a clan's membership
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupMemberPage {
    pub members: Vec<GroupMemberEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMemberEntry {
    pub account_id: GameAccountId,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}

/// Result type for game-API calls
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

#[async_trait]
pub trait GameStatsApi: Send + Sync {
    /// Profile lookup for one platform variant of an account
    async fn get_profile(
        &self,
        membership_type: MembershipType,
        account_id: GameAccountId,
    ) -> ApiResult<ProfileData>;

    /// One activity-history page. `page` starts at 0; entries come back
    /// newest first.
    async fn get_activity_page(
        &self,
        membership_type: MembershipType,
        account_id: GameAccountId,
        character_id: i64,
        page: u32,
    ) -> ApiResult<ActivityPage>;

    /// Detailed participant report for one session instance
    async fn get_session_report(&self, instance_id: i64) -> ApiResult<SessionReport>;

    /// Current membership of a clan group
    async fn get_group_members(&self, clan_id: ClanId) -> ApiResult<GroupMemberPage>;
}

// ============================================================================
// Chat Platform
// ============================================================================

/// Chat platform boundary errors
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat platform unavailable: {0}")]
    Unavailable(String),

    #[error("unknown chat member: {0}")]
    UnknownMember(ChatUserId),
}

/// A chat-platform identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatIdentity {
    pub id: ChatUserId,
    pub display_name: String,
}

/// Metadata of one chat message. Content itself never crosses this boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatMessageMeta {
    pub author_id: ChatUserId,
    pub content_length: u32,
    pub timestamp: DateTime<Utc>,
}

#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Every member currently holding `role`
    async fn list_role_members(&self, role: &str) -> Result<Vec<ChatIdentity>, ChatError>;

    /// Ids of every text channel visible to the tracker
    async fn list_text_channels(&self) -> Result<Vec<i64>, ChatError>;

    /// Messages in `channel` newer than `since`, oldest first. Finite.
    async fn channel_history(
        &self,
        channel: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<ChatMessageMeta>, ChatError>;

    /// Current display name of a chat member
    async fn resolve_display_name(&self, member: ChatUserId) -> Result<String, ChatError>;
}
