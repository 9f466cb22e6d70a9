//! Clan roster cache
//!
//! Holds one shared snapshot per tracked clan. A refresh builds a complete
//! new roster and swaps it in; readers keep the `Arc` they grabbed, so a
//! partially written roster is never observable.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;

use clan_core::entities::{ClanRoster, RosterMember};
use clan_core::value_objects::{ClanId, GameAccountId};

/// One clan tracked by the engine (id plus its configured display name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedClan {
    pub id: ClanId,
    pub name: String,
}

/// A roster-membership match
#[derive(Debug, Clone, PartialEq)]
pub struct RosterHit {
    pub clan_id: ClanId,
    pub clan_name: String,
    pub member: RosterMember,
}

/// In-process cache of every tracked clan's current roster
#[derive(Default)]
pub struct RosterCache {
    rosters: DashMap<ClanId, Arc<ClanRoster>>,
}

impl RosterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from persisted snapshots at startup (stale-but-available until
    /// the first refresh lands)
    pub fn seed(&self, snapshots: Vec<ClanRoster>) {
        for roster in snapshots {
            self.rosters.insert(roster.clan_id, Arc::new(roster));
        }
    }

    /// Swap in a freshly built roster, returning the shared handle
    pub fn install(&self, roster: ClanRoster) -> Arc<ClanRoster> {
        let shared = Arc::new(roster);
        self.rosters.insert(shared.clan_id, shared.clone());
        shared
    }

    pub fn get(&self, clan_id: ClanId) -> Option<Arc<ClanRoster>> {
        self.rosters.get(&clan_id).map(|entry| entry.value().clone())
    }

    /// Scan the union of all cached rosters for an account
    pub fn is_member(&self, account_id: GameAccountId) -> Option<RosterHit> {
        for entry in &self.rosters {
            if let Some(member) = entry.value().find(account_id) {
                return Some(RosterHit {
                    clan_id: entry.value().clan_id,
                    clan_name: entry.value().clan_name.clone(),
                    member: member.clone(),
                });
            }
        }
        None
    }

    /// Case-insensitive display-name scan across all rosters
    pub fn find_by_name(&self, name: &str) -> Option<RosterHit> {
        for entry in &self.rosters {
            if let Some(member) = entry.value().find_by_name(name) {
                return Some(RosterHit {
                    clan_id: entry.value().clan_id,
                    clan_name: entry.value().clan_name.clone(),
                    member: member.clone(),
                });
            }
        }
        None
    }

    /// Every account id on any cached roster
    pub fn union_ids(&self) -> HashSet<GameAccountId> {
        self.rosters
            .iter()
            .flat_map(|entry| {
                entry
                    .value()
                    .members
                    .iter()
                    .map(|m| m.account_id)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Member count per clan name
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.rosters
            .iter()
            .map(|entry| (entry.value().clan_name.clone(), entry.value().len()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rosters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rosters.is_empty()
    }
}
