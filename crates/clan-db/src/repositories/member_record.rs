//! PostgreSQL implementation of MemberRecordRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use clan_core::entities::MemberRecord;
use clan_core::error::DomainError;
use clan_core::traits::{MemberRecordRepository, RepoResult};
use clan_core::value_objects::{ChatUserId, GameAccountId};

use crate::mappers::MemberRecordRow;
use crate::models::MemberRecordModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of MemberRecordRepository
#[derive(Clone)]
pub struct PgMemberRecordRepository {
    pool: PgPool,
}

impl PgMemberRecordRepository {
    /// Create a new PgMemberRecordRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRecordRepository for PgMemberRecordRepository {
    #[instrument(skip(self))]
    async fn list_ids(&self) -> RepoResult<Vec<ChatUserId>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r"
            SELECT chat_id FROM member_records ORDER BY chat_id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(ChatUserId::new).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_chat_id(&self, id: ChatUserId) -> RepoResult<Option<MemberRecord>> {
        let result = sqlx::query_as::<_, MemberRecordModel>(
            r"
            SELECT chat_id, game_id, chat_name, game_name, clan_id,
                   chat_events, characters_typed, voice_minutes,
                   game_activity, activity_score, status_tier,
                   created_at, updated_at
            FROM member_records
            WHERE chat_id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(MemberRecord::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_game_id(&self, id: GameAccountId) -> RepoResult<Option<MemberRecord>> {
        let result = sqlx::query_as::<_, MemberRecordModel>(
            r"
            SELECT chat_id, game_id, chat_name, game_name, clan_id,
                   chat_events, characters_typed, voice_minutes,
                   game_activity, activity_score, status_tier,
                   created_at, updated_at
            FROM member_records
            WHERE game_id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(MemberRecord::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<MemberRecord>> {
        let result = sqlx::query_as::<_, MemberRecordModel>(
            r"
            SELECT chat_id, game_id, chat_name, game_name, clan_id,
                   chat_events, characters_typed, voice_minutes,
                   game_activity, activity_score, status_tier,
                   created_at, updated_at
            FROM member_records
            WHERE LOWER(chat_name) = LOWER($1) OR LOWER(game_name) = LOWER($1)
            LIMIT 1
            ",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(MemberRecord::try_from).transpose()
    }

    #[instrument(skip(self, record), fields(member = %record.chat_id))]
    async fn create(&self, record: &MemberRecord) -> RepoResult<()> {
        let row = MemberRecordRow::new(record)?;

        sqlx::query(
            r"
            INSERT INTO member_records
                (chat_id, game_id, chat_name, game_name, clan_id,
                 chat_events, characters_typed, voice_minutes,
                 game_activity, activity_score, status_tier,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(row.chat_id)
        .bind(row.game_id)
        .bind(row.chat_name)
        .bind(row.game_name)
        .bind(row.clan_id)
        .bind(row.chat_events)
        .bind(row.characters_typed)
        .bind(row.voice_minutes)
        .bind(row.game_activity)
        .bind(row.activity_score)
        .bind(row.status_tier)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, |constraint| {
                if constraint.contains("game_id") {
                    DomainError::GameAlreadyRegistered(record.game_id)
                } else {
                    DomainError::ChatAlreadyRegistered(record.chat_id)
                }
            })
        })?;

        Ok(())
    }

    #[instrument(skip(self, record), fields(member = %record.chat_id))]
    async fn update(&self, record: &MemberRecord) -> RepoResult<()> {
        let row = MemberRecordRow::new(record)?;

        // Single-row UPDATE: the atomic replace the per-member write
        // isolation contract relies on. Identity columns are never touched.
        sqlx::query(
            r"
            UPDATE member_records
            SET chat_name = $2,
                game_name = $3,
                chat_events = $4,
                characters_typed = $5,
                voice_minutes = $6,
                game_activity = $7,
                activity_score = $8,
                status_tier = $9,
                updated_at = $10
            WHERE chat_id = $1
            ",
        )
        .bind(row.chat_id)
        .bind(row.chat_name)
        .bind(row.game_name)
        .bind(row.chat_events)
        .bind(row.characters_typed)
        .bind(row.voice_minutes)
        .bind(row.game_activity)
        .bind(row.activity_score)
        .bind(row.status_tier)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ChatUserId) -> RepoResult<()> {
        sqlx::query(
            r"
            DELETE FROM member_records WHERE chat_id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
