//! Domain entities

mod day_stat;
mod member_record;
mod play_session;
mod roster;

pub use day_stat::{DayStat, WindowTotals};
pub use member_record::{ChatStats, MemberRecord, StatusTier};
pub use play_session::{PlaySession, SessionParticipant};
pub use roster::{ClanRoster, RosterMember};
