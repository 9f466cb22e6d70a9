//! Game-statistics API client

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use clan_core::traits::{
    ActivityEntry, ActivityPage, ApiError, ApiResponse, ApiResult, GameStatsApi, GroupMemberEntry,
    GroupMemberPage, ParticipantEntry, ProfileData, SessionReport,
};
use clan_core::value_objects::{ClanId, GameAccountId, MembershipType};

use crate::wire;

/// Activity-history page size. Fixed: pagination termination logic depends
/// on a full page meaning "there may be more".
const PAGE_SIZE: u32 = 25;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pooled HTTP client for the game-statistics API.
///
/// Construct once at startup and share; connections are reused across calls.
pub struct BungieClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl BungieClient {
    /// Create a new client. `base_url` has no trailing slash,
    /// e.g. `https://bungie.net/Platform`.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    async fn get_envelope<W: DeserializeOwned>(&self, url: &str) -> Result<wire::Envelope<W>, ApiError> {
        debug!(url, "api request");
        let response = self
            .http
            .get(url)
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Transport(format!("status {status}")));
        }

        response
            .json::<wire::Envelope<W>>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(e.to_string())
    }
}

fn parse_wire_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::Decode(format!("non-numeric id: {raw}")))
}

/// Carry the envelope over while converting its payload
fn convert_envelope<W, T>(
    envelope: wire::Envelope<W>,
    convert: impl FnOnce(W) -> Result<T, ApiError>,
) -> ApiResult<T> {
    let response = envelope.response.map(convert).transpose()?;
    Ok(ApiResponse {
        error_code: envelope.error_code,
        throttle_seconds: envelope.throttle_seconds,
        message: envelope.message,
        response,
    })
}

#[async_trait]
impl GameStatsApi for BungieClient {
    #[instrument(skip(self))]
    async fn get_profile(
        &self,
        membership_type: MembershipType,
        account_id: GameAccountId,
    ) -> ApiResult<ProfileData> {
        let url = format!(
            "{}/Destiny2/{}/Profile/{}/?components=100",
            self.base_url,
            membership_type.as_i32(),
            account_id
        );
        let envelope = self.get_envelope::<wire::ProfileResponse>(&url).await?;

        convert_envelope(envelope, |profile| {
            let data = profile.profile.data;
            let character_ids = data
                .character_ids
                .iter()
                .map(|id| parse_wire_id(id))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ProfileData {
                display_name: data.user_info.display_name,
                character_ids,
            })
        })
    }

    #[instrument(skip(self))]
    async fn get_activity_page(
        &self,
        membership_type: MembershipType,
        account_id: GameAccountId,
        character_id: i64,
        page: u32,
    ) -> ApiResult<ActivityPage> {
        let url = format!(
            "{}/Destiny2/{}/Account/{}/Character/{}/Stats/Activities/?count={}&page={}",
            self.base_url,
            membership_type.as_i32(),
            account_id,
            character_id,
            PAGE_SIZE,
            page
        );
        let envelope = self
            .get_envelope::<wire::ActivityHistoryResponse>(&url)
            .await?;

        convert_envelope(envelope, |history| {
            let activities = history
                .activities
                .into_iter()
                .map(|activity| {
                    Ok(ActivityEntry {
                        instance_id: parse_wire_id(&activity.details.instance_id)?,
                        period: activity.period,
                        seconds_played: activity.values.time_played_seconds.basic.value.max(0.0)
                            as u64,
                    })
                })
                .collect::<Result<Vec<_>, ApiError>>()?;
            Ok(ActivityPage { activities })
        })
    }

    #[instrument(skip(self))]
    async fn get_session_report(&self, instance_id: i64) -> ApiResult<SessionReport> {
        let url = format!(
            "{}/Destiny2/Stats/PostGameCarnageReport/{}/",
            self.base_url, instance_id
        );
        let envelope = self
            .get_envelope::<wire::CarnageReportResponse>(&url)
            .await?;

        convert_envelope(envelope, |report| {
            let participants = report
                .entries
                .into_iter()
                .map(|entry| {
                    let info = entry.player.destiny_user_info;
                    Ok(ParticipantEntry {
                        account_id: GameAccountId::new(parse_wire_id(&info.membership_id)?),
                        display_name: info.display_name,
                        is_public: info.is_public,
                    })
                })
                .collect::<Result<Vec<_>, ApiError>>()?;
            Ok(SessionReport { participants })
        })
    }

    #[instrument(skip(self))]
    async fn get_group_members(&self, clan_id: ClanId) -> ApiResult<GroupMemberPage> {
        let url = format!("{}/GroupV2/{}/Members/?currentPage=1", self.base_url, clan_id);
        let envelope = self
            .get_envelope::<wire::GroupMembersResponse>(&url)
            .await?;

        convert_envelope(envelope, |group| {
            let members = group
                .results
                .into_iter()
                .map(|member| {
                    let info = member.destiny_user_info;
                    Ok(GroupMemberEntry {
                        account_id: GameAccountId::new(parse_wire_id(&info.membership_id)?),
                        display_name: info.display_name.unwrap_or_default(),
                        joined_at: member.join_date,
                    })
                })
                .collect::<Result<Vec<_>, ApiError>>()?;
            Ok(GroupMemberPage { members })
        })
    }
}
