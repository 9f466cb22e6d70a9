//! Play session - one recorded activity instance with its participants

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::GameAccountId;

/// A participant entry from a session's detailed report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParticipant {
    pub account_id: GameAccountId,
    /// None when the participant's profile hides their name.
    pub display_name: Option<String>,
    pub is_public: bool,
}

/// One recorded play session for a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaySession {
    pub instance_id: i64,
    pub started_at: DateTime<Utc>,
    pub seconds_played: u64,
    pub participants: Vec<SessionParticipant>,
}

impl PlaySession {
    /// UTC calendar day this session is bucketed under.
    #[must_use]
    pub fn calendar_day(&self) -> NaiveDate {
        self.started_at.date_naive()
    }
}
