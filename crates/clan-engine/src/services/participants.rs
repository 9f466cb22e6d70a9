//! Co-participant resolution
//!
//! Determines which of a session's teammates are clan members and how much
//! the session contributes to the day's clan-cohesion weight.

use std::collections::HashSet;

use clan_core::entities::PlaySession;
use clan_core::value_objects::GameAccountId;

use super::roster::RosterCache;

/// Per-session clan-teammate weight ceiling.
///
/// Large-party activities (public events, matchmade PvP) fill the report with
/// incidental teammates; the cap keeps them from dominating the weight. The
/// unique-teammate set is never capped.
pub const SESSION_WEIGHT_CAP: f64 = 2.9;

/// Clan-teammate contribution of one session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionCohort {
    pub clan_weight: f64,
    pub unique: HashSet<GameAccountId>,
}

/// Resolve one session's clan cohort against the cached rosters.
///
/// `self_id` is excluded; every other participant is checked against the
/// roster union.
pub fn resolve(
    session: &PlaySession,
    self_id: GameAccountId,
    roster: &RosterCache,
) -> SessionCohort {
    let mut unique = HashSet::new();
    let mut count = 0u32;

    for participant in &session.participants {
        if participant.account_id == self_id {
            continue;
        }
        if roster.is_member(participant.account_id).is_some() {
            count += 1;
            unique.insert(participant.account_id);
        }
    }

    let clan_weight = if count > 2 {
        SESSION_WEIGHT_CAP
    } else {
        f64::from(count)
    };

    SessionCohort { clan_weight, unique }
}
