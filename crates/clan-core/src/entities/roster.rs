//! Clan roster - point-in-time snapshot of one clan's membership

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ClanId, GameAccountId};

/// One member row of a clan roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterMember {
    pub account_id: GameAccountId,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}

/// Snapshot of one clan's membership.
///
/// Rebuilt wholesale on every refresh, never diffed in place. Owned by the
/// roster cache; everything else reads it through a shared handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClanRoster {
    pub clan_id: ClanId,
    pub clan_name: String,
    pub last_updated: DateTime<Utc>,
    pub members: Vec<RosterMember>,
}

impl ClanRoster {
    #[must_use]
    pub fn new(
        clan_id: ClanId,
        clan_name: impl Into<String>,
        members: Vec<RosterMember>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            clan_id,
            clan_name: clan_name.into(),
            last_updated,
            members,
        }
    }

    #[must_use]
    pub fn contains(&self, account_id: GameAccountId) -> bool {
        self.find(account_id).is_some()
    }

    #[must_use]
    pub fn find(&self, account_id: GameAccountId) -> Option<&RosterMember> {
        self.members.iter().find(|m| m.account_id == account_id)
    }

    /// Case-insensitive display-name lookup (used by the name-based
    /// registration flow).
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&RosterMember> {
        self.members
            .iter()
            .find(|m| m.display_name.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
