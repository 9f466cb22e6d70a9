//! Member registration
//!
//! Registration is gated on current roster membership, rejects duplicate
//! chat or game identities without touching the existing record, and seeds a
//! zeroed record that the next activity cycle fills in.

use chrono::Utc;
use tracing::{info, instrument};

use clan_core::entities::MemberRecord;
use clan_core::error::DomainError;
use clan_core::traits::ChatIdentity;
use clan_core::value_objects::GameAccountId;

use super::context::EngineContext;
use super::error::{EngineError, EngineResult};
use super::fetcher::ProfileLookup;
use super::roster::RosterHit;

/// Registration service
pub struct RegistrationService<'a> {
    ctx: &'a EngineContext,
}

impl<'a> RegistrationService<'a> {
    /// Create a new RegistrationService
    pub fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    /// Roster lookup by display name, for the "find me in the rosters"
    /// pre-registration flow.
    pub fn find_roster_member(&self, name: &str) -> Option<RosterHit> {
        self.ctx.roster_cache().find_by_name(name)
    }

    /// Register a chat identity against a game account.
    ///
    /// Idempotence is rejection: a second registration for either identity
    /// fails with a distinct conflict and the existing record stays as-is.
    #[instrument(skip(self), fields(chat = %identity.id, game = %game_id))]
    pub async fn register(
        &self,
        identity: ChatIdentity,
        game_id: GameAccountId,
    ) -> EngineResult<MemberRecord> {
        let Some(hit) = self.ctx.roster_cache().is_member(game_id) else {
            return Err(EngineError::Domain(DomainError::RosterMembershipRequired));
        };

        if self
            .ctx
            .member_repo()
            .find_by_chat_id(identity.id)
            .await?
            .is_some()
        {
            return Err(EngineError::Domain(DomainError::ChatAlreadyRegistered(
                identity.id,
            )));
        }
        if self
            .ctx
            .member_repo()
            .find_by_game_id(game_id)
            .await?
            .is_some()
        {
            return Err(EngineError::Domain(DomainError::GameAlreadyRegistered(
                game_id,
            )));
        }

        // Prefer the profile's own display name; a restricted profile falls
        // back to the roster row.
        let game_name = match self.ctx.fetcher().resolve_profile(game_id).await? {
            ProfileLookup::Resolved(profile) => profile.display_name,
            ProfileLookup::PrivacyRestricted => hit.member.display_name.clone(),
        };

        let record = MemberRecord::register(
            identity.id,
            identity.display_name,
            game_id,
            game_name,
            hit.clan_id,
            Utc::now(),
        );

        // The unique constraints backstop the checks above against races
        self.ctx.member_repo().create(&record).await?;

        info!(
            chat = %record.chat_id,
            game = %record.game_id,
            clan = %record.clan_id,
            "member registered"
        );
        Ok(record)
    }
}
