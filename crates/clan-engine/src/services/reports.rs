//! Report lookups exposed to the command layer

use std::collections::BTreeMap;

use tracing::instrument;

use clan_core::entities::MemberRecord;
use clan_core::error::DomainError;
use clan_core::value_objects::ChatUserId;

use super::context::EngineContext;
use super::error::{EngineError, EngineResult};

/// Report service
pub struct ReportService<'a> {
    ctx: &'a EngineContext,
}

impl<'a> ReportService<'a> {
    /// Create a new ReportService
    pub fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    /// Find a member record by chat id or display name (chat or game).
    #[instrument(skip(self))]
    pub async fn get_report(&self, query: &str) -> EngineResult<MemberRecord> {
        let repo = self.ctx.member_repo();

        let by_id = match ChatUserId::parse(query) {
            Ok(id) => repo.find_by_chat_id(id).await?,
            Err(_) => None,
        };
        let found = match by_id {
            Some(record) => Some(record),
            None => repo.find_by_name(query).await?,
        };

        found.ok_or_else(|| EngineError::Domain(DomainError::NotRegistered(query.to_string())))
    }

    /// Member count per tracked clan, from the cached rosters
    pub fn roster_counts(&self) -> BTreeMap<String, usize> {
        self.ctx.roster_cache().counts()
    }
}
