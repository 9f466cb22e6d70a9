//! Traits (ports) - boundaries to storage and external collaborators

mod collaborators;
mod repositories;

pub use collaborators::{
    ActivityEntry, ActivityPage, ApiError, ApiResponse, ApiResult, ChatError, ChatIdentity,
    ChatMessageMeta, ChatPlatform, GameStatsApi, GroupMemberEntry, GroupMemberPage,
    ParticipantEntry, ProfileData, SessionReport, CODE_PRIVACY_RESTRICTED, CODE_SUCCESS,
};
pub use repositories::{MemberRecordRepository, RepoResult, RosterRepository};
