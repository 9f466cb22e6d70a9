//! Chat activity collection
//!
//! Walks every text channel's history since the window start and accumulates
//! per-author message counts and typed-character sums for role holders.
//! Voice telemetry has no boundary surface yet, so `voice_minutes` stays 0.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use clan_core::entities::ChatStats;
use clan_core::traits::ChatPlatform;
use clan_core::value_objects::ChatUserId;

use super::error::EngineResult;

/// Collects rolling-window chat counters from the chat platform
pub struct ChatStatsCollector {
    chat: Arc<dyn ChatPlatform>,
}

impl ChatStatsCollector {
    pub fn new(chat: Arc<dyn ChatPlatform>) -> Self {
        Self { chat }
    }

    /// Count messages and characters per holder of `role`, over every text
    /// channel, bounded by `since`.
    ///
    /// Members who posted nothing still get a zeroed entry so their stale
    /// counters are replaced, not carried forward.
    #[instrument(skip(self))]
    pub async fn collect(
        &self,
        role: &str,
        since: DateTime<Utc>,
    ) -> EngineResult<HashMap<ChatUserId, ChatStats>> {
        let members = self.chat.list_role_members(role).await?;
        let mut stats: HashMap<ChatUserId, ChatStats> = members
            .iter()
            .map(|member| (member.id, ChatStats::default()))
            .collect();

        for channel in self.chat.list_text_channels().await? {
            let history = self.chat.channel_history(channel, since).await?;
            debug!(channel, messages = history.len(), "channel history walked");
            for message in history {
                if let Some(entry) = stats.get_mut(&message.author_id) {
                    entry.chat_events += 1;
                    entry.characters_typed += u64::from(message.content_length);
                }
            }
        }

        Ok(stats)
    }
}
