//! Wire format of the game-statistics API
//!
//! Field names mirror the remote JSON exactly; everything is converted into
//! the domain DTOs at the client boundary. Membership and instance ids come
//! back as strings and are parsed to i64 there.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Outer envelope wrapping every response body
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(rename = "ErrorCode")]
    pub error_code: i32,
    #[serde(rename = "ThrottleSeconds", default)]
    pub throttle_seconds: u32,
    #[serde(rename = "Message", default)]
    pub message: String,
    #[serde(rename = "Response")]
    pub response: Option<T>,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileResponse {
    pub profile: ProfileComponent,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileComponent {
    pub data: ProfileComponentData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileComponentData {
    #[serde(rename = "userInfo")]
    pub user_info: UserInfo,
    #[serde(rename = "characterIds", default)]
    pub character_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserInfo {
    #[serde(rename = "displayName", default)]
    pub display_name: String,
}

// ---------------------------------------------------------------------------
// Activity history
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ActivityHistoryResponse {
    #[serde(default)]
    pub activities: Vec<WireActivity>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireActivity {
    pub period: DateTime<Utc>,
    #[serde(rename = "activityDetails")]
    pub details: ActivityDetails,
    pub values: ActivityValues,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActivityDetails {
    #[serde(rename = "instanceId")]
    pub instance_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActivityValues {
    #[serde(rename = "timePlayedSeconds")]
    pub time_played_seconds: StatValue,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatValue {
    pub basic: BasicValue,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BasicValue {
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Carnage report
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CarnageReportResponse {
    #[serde(default)]
    pub entries: Vec<CarnageEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CarnageEntry {
    pub player: CarnagePlayer,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CarnagePlayer {
    #[serde(rename = "destinyUserInfo")]
    pub destiny_user_info: DestinyUserInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DestinyUserInfo {
    #[serde(rename = "membershipId")]
    pub membership_id: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "isPublic", default)]
    pub is_public: bool,
}

// ---------------------------------------------------------------------------
// Group members
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GroupMembersResponse {
    #[serde(default)]
    pub results: Vec<WireGroupMember>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireGroupMember {
    #[serde(rename = "destinyUserInfo")]
    pub destiny_user_info: DestinyUserInfo,
    #[serde(rename = "joinDate")]
    pub join_date: DateTime<Utc>,
}
