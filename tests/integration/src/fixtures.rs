//! In-memory repositories and scripted collaborator mocks

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use clan_core::entities::{ClanRoster, MemberRecord};
use clan_core::error::DomainError;
use clan_core::traits::{
    ActivityPage, ApiError, ApiResponse, ApiResult, ChatError, ChatIdentity, ChatMessageMeta,
    ChatPlatform, GameStatsApi, GroupMemberPage, MemberRecordRepository, ProfileData, RepoResult,
    RosterRepository, SessionReport,
};
use clan_core::value_objects::{ChatUserId, ClanId, GameAccountId, MembershipType};

// ============================================================================
// In-memory repositories
// ============================================================================

/// In-memory MemberRecordRepository with a corrupt-row switch per member
#[derive(Default)]
pub struct InMemoryMemberRepository {
    records: Mutex<HashMap<ChatUserId, MemberRecord>>,
    corrupt: Mutex<HashSet<ChatUserId>>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a record without going through registration
    pub fn seed(&self, record: MemberRecord) {
        self.records.lock().insert(record.chat_id, record);
    }

    /// Make this member's stored row unreadable
    pub fn mark_corrupt(&self, id: ChatUserId) {
        self.corrupt.lock().insert(id);
    }

    /// Direct read for assertions
    pub fn get(&self, id: ChatUserId) -> Option<MemberRecord> {
        self.records.lock().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl MemberRecordRepository for InMemoryMemberRepository {
    async fn list_ids(&self) -> RepoResult<Vec<ChatUserId>> {
        let mut ids: Vec<ChatUserId> = self.records.lock().keys().copied().collect();
        ids.sort();
        Ok(ids)
    }

    async fn find_by_chat_id(&self, id: ChatUserId) -> RepoResult<Option<MemberRecord>> {
        if self.corrupt.lock().contains(&id) {
            return Err(DomainError::CorruptRecord {
                id,
                reason: "simulated unreadable row".to_string(),
            });
        }
        Ok(self.records.lock().get(&id).cloned())
    }

    async fn find_by_game_id(&self, id: GameAccountId) -> RepoResult<Option<MemberRecord>> {
        Ok(self
            .records
            .lock()
            .values()
            .find(|record| record.game_id == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<MemberRecord>> {
        Ok(self
            .records
            .lock()
            .values()
            .find(|record| {
                record.chat_name.eq_ignore_ascii_case(name)
                    || record.game_name.eq_ignore_ascii_case(name)
            })
            .cloned())
    }

    async fn create(&self, record: &MemberRecord) -> RepoResult<()> {
        let mut records = self.records.lock();
        if records.contains_key(&record.chat_id) {
            return Err(DomainError::ChatAlreadyRegistered(record.chat_id));
        }
        if records.values().any(|r| r.game_id == record.game_id) {
            return Err(DomainError::GameAlreadyRegistered(record.game_id));
        }
        records.insert(record.chat_id, record.clone());
        Ok(())
    }

    async fn update(&self, record: &MemberRecord) -> RepoResult<()> {
        self.records.lock().insert(record.chat_id, record.clone());
        Ok(())
    }

    async fn delete(&self, id: ChatUserId) -> RepoResult<()> {
        self.records.lock().remove(&id);
        self.corrupt.lock().remove(&id);
        Ok(())
    }
}

/// In-memory RosterRepository
#[derive(Default)]
pub struct InMemoryRosterRepository {
    snapshots: Mutex<HashMap<ClanId, ClanRoster>>,
}

impl InMemoryRosterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, roster: ClanRoster) {
        self.snapshots.lock().insert(roster.clan_id, roster);
    }
}

#[async_trait]
impl RosterRepository for InMemoryRosterRepository {
    async fn save(&self, roster: &ClanRoster) -> RepoResult<()> {
        self.snapshots.lock().insert(roster.clan_id, roster.clone());
        Ok(())
    }

    async fn load_all(&self) -> RepoResult<Vec<ClanRoster>> {
        Ok(self.snapshots.lock().values().cloned().collect())
    }
}

// ============================================================================
// Scripted game-statistics API
// ============================================================================

type ProfileKey = (MembershipType, GameAccountId);
type PageKey = (GameAccountId, i64, u32);

/// Scripted GameStatsApi with per-endpoint call counters.
///
/// Unscripted lookups fall back to: generic failure for profiles and groups,
/// empty success for activity pages and session reports.
#[derive(Default)]
pub struct MockGameStatsApi {
    profiles: Mutex<HashMap<ProfileKey, ApiResponse<ProfileData>>>,
    pages: Mutex<HashMap<PageKey, ApiResponse<ActivityPage>>>,
    reports: Mutex<HashMap<i64, ApiResponse<SessionReport>>>,
    groups: Mutex<HashMap<ClanId, ApiResponse<GroupMemberPage>>>,
    transport_fail_profiles: Mutex<HashSet<GameAccountId>>,

    pub profile_calls: AtomicUsize,
    pub page_calls: AtomicUsize,
    pub report_calls: AtomicUsize,
    pub group_calls: AtomicUsize,
}

impl MockGameStatsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_profile(
        &self,
        membership_type: MembershipType,
        account: GameAccountId,
        response: ApiResponse<ProfileData>,
    ) {
        self.profiles
            .lock()
            .insert((membership_type, account), response);
    }

    pub fn set_page(
        &self,
        account: GameAccountId,
        character_id: i64,
        page: u32,
        response: ApiResponse<ActivityPage>,
    ) {
        self.pages
            .lock()
            .insert((account, character_id, page), response);
    }

    pub fn set_report(&self, instance_id: i64, response: ApiResponse<SessionReport>) {
        self.reports.lock().insert(instance_id, response);
    }

    pub fn set_group(&self, clan_id: ClanId, response: ApiResponse<GroupMemberPage>) {
        self.groups.lock().insert(clan_id, response);
    }

    /// Make every profile probe for this account fail at the transport layer
    pub fn fail_profile_transport(&self, account: GameAccountId) {
        self.transport_fail_profiles.lock().insert(account);
    }

    pub fn profile_call_count(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    pub fn page_call_count(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn report_call_count(&self) -> usize {
        self.report_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GameStatsApi for MockGameStatsApi {
    async fn get_profile(
        &self,
        membership_type: MembershipType,
        account_id: GameAccountId,
    ) -> ApiResult<ProfileData> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if self.transport_fail_profiles.lock().contains(&account_id) {
            return Err(ApiError::Transport("simulated outage".to_string()));
        }
        Ok(self
            .profiles
            .lock()
            .get(&(membership_type, account_id))
            .cloned()
            .unwrap_or_else(|| ApiResponse::failure(7, "SystemDisabled")))
    }

    async fn get_activity_page(
        &self,
        _membership_type: MembershipType,
        account_id: GameAccountId,
        character_id: i64,
        page: u32,
    ) -> ApiResult<ActivityPage> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .pages
            .lock()
            .get(&(account_id, character_id, page))
            .cloned()
            .unwrap_or_else(|| ApiResponse::success(ActivityPage::default())))
    }

    async fn get_session_report(&self, instance_id: i64) -> ApiResult<SessionReport> {
        self.report_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .reports
            .lock()
            .get(&instance_id)
            .cloned()
            .unwrap_or_else(|| ApiResponse::success(SessionReport::default())))
    }

    async fn get_group_members(&self, clan_id: ClanId) -> ApiResult<GroupMemberPage> {
        self.group_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .groups
            .lock()
            .get(&clan_id)
            .cloned()
            .unwrap_or_else(|| ApiResponse::failure(7, "SystemDisabled")))
    }
}

// ============================================================================
// Scripted chat platform
// ============================================================================

/// Scripted ChatPlatform
#[derive(Default)]
pub struct MockChatPlatform {
    role_members: Mutex<Vec<ChatIdentity>>,
    channels: Mutex<Vec<i64>>,
    history: Mutex<HashMap<i64, Vec<ChatMessageMeta>>>,
    names: Mutex<HashMap<ChatUserId, String>>,
    unavailable: Mutex<bool>,
}

impl MockChatPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_role_member(&self, id: ChatUserId, display_name: &str) {
        self.role_members.lock().push(ChatIdentity {
            id,
            display_name: display_name.to_string(),
        });
        self.names.lock().insert(id, display_name.to_string());
    }

    pub fn add_channel(&self, channel: i64, messages: Vec<ChatMessageMeta>) {
        self.channels.lock().push(channel);
        self.history.lock().insert(channel, messages);
    }

    pub fn set_name(&self, id: ChatUserId, name: &str) {
        self.names.lock().insert(id, name.to_string());
    }

    /// Simulate a platform outage for every call
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock() = unavailable;
    }

    fn check_available(&self) -> Result<(), ChatError> {
        if *self.unavailable.lock() {
            Err(ChatError::Unavailable("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChatPlatform for MockChatPlatform {
    async fn list_role_members(&self, _role: &str) -> Result<Vec<ChatIdentity>, ChatError> {
        self.check_available()?;
        Ok(self.role_members.lock().clone())
    }

    async fn list_text_channels(&self) -> Result<Vec<i64>, ChatError> {
        self.check_available()?;
        Ok(self.channels.lock().clone())
    }

    async fn channel_history(
        &self,
        channel: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<ChatMessageMeta>, ChatError> {
        self.check_available()?;
        Ok(self
            .history
            .lock()
            .get(&channel)
            .map(|messages| {
                messages
                    .iter()
                    .filter(|m| m.timestamp > since)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn resolve_display_name(&self, member: ChatUserId) -> Result<String, ChatError> {
        self.check_available()?;
        self.names
            .lock()
            .get(&member)
            .cloned()
            .ok_or(ChatError::UnknownMember(member))
    }
}
