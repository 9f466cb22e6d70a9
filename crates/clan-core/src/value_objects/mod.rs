//! Value objects - identifiers, platform variants, and the reporting window

mod ids;
mod membership_type;
mod reporting_window;

pub use ids::{ChatUserId, ClanId, GameAccountId, IdParseError};
pub use membership_type::MembershipType;
pub use reporting_window::ReportingWindow;
