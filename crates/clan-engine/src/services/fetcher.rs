//! Remote activity fetcher
//!
//! Resolves which platform variant an account is active on, then walks the
//! paginated activity history for one calendar day and expands matching
//! sessions with their participant reports.
//!
//! Pagination within one day is strictly sequential: whether page N+1 is
//! needed depends on what page N contained. Every call goes through the
//! bounded throttle, and a failed call aborts the whole day, leaving any
//! previously cached buckets untouched.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, instrument};

use clan_core::entities::{PlaySession, SessionParticipant};
use clan_core::traits::{ActivityEntry, GameStatsApi};
use clan_core::value_objects::{GameAccountId, MembershipType};

use super::error::FetchError;
use super::throttle::ApiThrottle;

/// A resolved profile: the platform variant that answered, plus its data
#[derive(Debug, Clone)]
pub struct ResolvedProfile {
    pub membership_type: MembershipType,
    pub display_name: String,
    pub character_ids: Vec<i64>,
}

/// Outcome of a profile probe
#[derive(Debug, Clone)]
pub enum ProfileLookup {
    Resolved(ResolvedProfile),
    /// Every variant that knows the account reports it privacy-restricted
    PrivacyRestricted,
}

/// Sessions for one member on one calendar day
#[derive(Debug, Clone, Default)]
pub struct DayActivity {
    pub sessions: Vec<PlaySession>,
    pub privacy_restricted: bool,
}

impl DayActivity {
    /// The well-formed empty result for a privacy-restricted profile
    #[must_use]
    pub fn restricted() -> Self {
        Self {
            sessions: Vec::new(),
            privacy_restricted: true,
        }
    }
}

enum CharacterScan {
    Complete,
    PrivacyRestricted,
}

/// Paginated, throttled client over the activity-history surface
pub struct ActivityFetcher {
    api: Arc<dyn GameStatsApi>,
    throttle: Arc<ApiThrottle>,
}

impl ActivityFetcher {
    pub fn new(api: Arc<dyn GameStatsApi>, throttle: Arc<ApiThrottle>) -> Self {
        Self { api, throttle }
    }

    /// Probe platform variants in priority order until one owns the account.
    ///
    /// Generic failure codes move on to the next variant; a privacy code is
    /// remembered and reported only when no variant resolves.
    #[instrument(skip(self))]
    pub async fn resolve_profile(
        &self,
        account: GameAccountId,
    ) -> Result<ProfileLookup, FetchError> {
        let mut privacy_seen = false;

        for membership_type in MembershipType::PROBE_ORDER {
            let envelope = self
                .throttle
                .call(|| self.api.get_profile(membership_type, account))
                .await?;

            if envelope.is_success() {
                if let Some(profile) = envelope.response {
                    debug!(%account, %membership_type, "profile resolved");
                    return Ok(ProfileLookup::Resolved(ResolvedProfile {
                        membership_type,
                        display_name: profile.display_name,
                        character_ids: profile.character_ids,
                    }));
                }
            } else if envelope.is_privacy_restricted() {
                privacy_seen = true;
            }
        }

        if privacy_seen {
            Ok(ProfileLookup::PrivacyRestricted)
        } else {
            Err(FetchError::ProfileUnresolved(account))
        }
    }

    /// All play sessions for `account` dated exactly `target_date` (UTC).
    ///
    /// A privacy-restricted profile yields `DayActivity::restricted()`: a
    /// valid zero result, never an error.
    #[instrument(skip(self))]
    pub async fn fetch_day(
        &self,
        account: GameAccountId,
        target_date: NaiveDate,
    ) -> Result<DayActivity, FetchError> {
        let profile = match self.resolve_profile(account).await? {
            ProfileLookup::Resolved(profile) => profile,
            ProfileLookup::PrivacyRestricted => return Ok(DayActivity::restricted()),
        };

        let mut sessions = Vec::new();
        for character_id in &profile.character_ids {
            let scan = self
                .scan_character(&profile, account, *character_id, target_date, &mut sessions)
                .await?;
            if matches!(scan, CharacterScan::PrivacyRestricted) {
                return Ok(DayActivity::restricted());
            }
        }

        debug!(%account, %target_date, sessions = sessions.len(), "day fetched");
        Ok(DayActivity {
            sessions,
            privacy_restricted: false,
        })
    }

    /// Walk one character's history pages until the target day is exhausted.
    ///
    /// Entries come back newest first, so a page whose oldest entry predates
    /// the target day ends the scan. An empty page or a non-success envelope
    /// ends it too; the privacy code bubbles up to zero the whole day.
    async fn scan_character(
        &self,
        profile: &ResolvedProfile,
        account: GameAccountId,
        character_id: i64,
        target_date: NaiveDate,
        sessions: &mut Vec<PlaySession>,
    ) -> Result<CharacterScan, FetchError> {
        let mut page = 0u32;

        loop {
            let envelope = self
                .throttle
                .call(|| {
                    self.api.get_activity_page(
                        profile.membership_type,
                        account,
                        character_id,
                        page,
                    )
                })
                .await?;

            if envelope.is_privacy_restricted() {
                return Ok(CharacterScan::PrivacyRestricted);
            }
            if !envelope.is_success() {
                return Ok(CharacterScan::Complete);
            }
            let history = match envelope.response {
                Some(history) if !history.activities.is_empty() => history,
                _ => return Ok(CharacterScan::Complete),
            };

            page += 1;

            for entry in &history.activities {
                let day = entry.period.date_naive();
                if day == target_date {
                    let participants = self.session_report(entry, account).await?;
                    sessions.push(PlaySession {
                        instance_id: entry.instance_id,
                        started_at: entry.period,
                        seconds_played: entry.seconds_played,
                        participants,
                    });
                } else if day < target_date {
                    return Ok(CharacterScan::Complete);
                }
            }
        }
    }

    async fn session_report(
        &self,
        entry: &ActivityEntry,
        account: GameAccountId,
    ) -> Result<Vec<SessionParticipant>, FetchError> {
        let envelope = self
            .throttle
            .call(|| self.api.get_session_report(entry.instance_id))
            .await?;

        let participants = envelope
            .response
            .map(|report| report.participants)
            .unwrap_or_default()
            .into_iter()
            .map(|p| SessionParticipant {
                account_id: p.account_id,
                // Hidden profiles keep their name to themselves
                display_name: if p.is_public { p.display_name } else { None },
                is_public: p.is_public,
            })
            .collect();

        debug!(instance = entry.instance_id, %account, "session report fetched");
        Ok(participants)
    }
}
