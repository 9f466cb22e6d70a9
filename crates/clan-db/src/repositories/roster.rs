//! PostgreSQL implementation of RosterRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{instrument, warn};

use clan_core::entities::ClanRoster;
use clan_core::traits::{RepoResult, RosterRepository};

use crate::mappers::RosterSnapshotRow;
use crate::models::RosterSnapshotModel;

use super::error::map_db_error;

/// PostgreSQL implementation of RosterRepository
#[derive(Clone)]
pub struct PgRosterRepository {
    pool: PgPool,
}

impl PgRosterRepository {
    /// Create a new PgRosterRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RosterRepository for PgRosterRepository {
    #[instrument(skip(self, roster), fields(clan = %roster.clan_id))]
    async fn save(&self, roster: &ClanRoster) -> RepoResult<()> {
        let row = RosterSnapshotRow::new(roster)?;

        // Upsert: the snapshot is rebuilt wholesale, never diffed
        sqlx::query(
            r"
            INSERT INTO roster_snapshots (clan_id, clan_name, last_updated, members)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (clan_id) DO UPDATE
            SET clan_name = EXCLUDED.clan_name,
                last_updated = EXCLUDED.last_updated,
                members = EXCLUDED.members
            ",
        )
        .bind(row.clan_id)
        .bind(row.clan_name)
        .bind(row.last_updated)
        .bind(row.members)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_all(&self) -> RepoResult<Vec<ClanRoster>> {
        let models = sqlx::query_as::<_, RosterSnapshotModel>(
            r"
            SELECT clan_id, clan_name, last_updated, members
            FROM roster_snapshots
            ORDER BY clan_id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        // An undecodable snapshot is dropped with a warning; the next roster
        // refresh overwrites it anyway.
        let mut rosters = Vec::with_capacity(models.len());
        for model in models {
            let clan_id = model.clan_id;
            match ClanRoster::try_from(model) {
                Ok(roster) => rosters.push(roster),
                Err(e) => warn!(clan = clan_id, error = %e, "skipping stored roster snapshot"),
            }
        }

        Ok(rosters)
    }
}
