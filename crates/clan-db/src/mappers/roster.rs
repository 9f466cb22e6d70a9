//! ClanRoster entity <-> model mapper

use clan_core::entities::{ClanRoster, RosterMember};
use clan_core::error::DomainError;
use clan_core::value_objects::ClanId;

use crate::models::RosterSnapshotModel;

impl TryFrom<RosterSnapshotModel> for ClanRoster {
    type Error = DomainError;

    fn try_from(model: RosterSnapshotModel) -> Result<Self, Self::Error> {
        let members: Vec<RosterMember> = serde_json::from_value(model.members).map_err(|e| {
            DomainError::DatabaseError(format!(
                "undecodable roster snapshot for clan {}: {e}",
                model.clan_id
            ))
        })?;

        Ok(ClanRoster {
            clan_id: ClanId::new(model.clan_id),
            clan_name: model.clan_name,
            last_updated: model.last_updated,
            members,
        })
    }
}

/// Column values for snapshot upsert
pub struct RosterSnapshotRow {
    pub clan_id: i64,
    pub clan_name: String,
    pub last_updated: chrono::DateTime<chrono::Utc>,
    pub members: serde_json::Value,
}

impl RosterSnapshotRow {
    pub fn new(roster: &ClanRoster) -> Result<Self, DomainError> {
        let members = serde_json::to_value(&roster.members)
            .map_err(|e| DomainError::InternalError(format!("encode roster members: {e}")))?;

        Ok(Self {
            clan_id: roster.clan_id.into_inner(),
            clan_name: roster.clan_name.clone(),
            last_updated: roster.last_updated,
            members,
        })
    }
}
