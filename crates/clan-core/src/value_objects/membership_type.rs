//! Membership type - the platform variant a game account lives on

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform variant of a game account.
///
/// The numeric values are the wire values of the statistics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum MembershipType {
    Xbox,
    Psn,
    Steam,
    Stadia,
}

impl MembershipType {
    /// Probe priority when resolving which variant an account is active on.
    /// Steam first: the overwhelming majority of tracked accounts live there.
    pub const PROBE_ORDER: [MembershipType; 4] =
        [Self::Steam, Self::Psn, Self::Xbox, Self::Stadia];

    /// Wire value used in API paths
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Xbox => 1,
            Self::Psn => 2,
            Self::Steam => 3,
            Self::Stadia => 5,
        }
    }

    /// Parse a wire value
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Xbox),
            2 => Some(Self::Psn),
            3 => Some(Self::Steam),
            5 => Some(Self::Stadia),
            _ => None,
        }
    }
}

impl fmt::Display for MembershipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xbox => write!(f, "xbox"),
            Self::Psn => write!(f, "psn"),
            Self::Steam => write!(f, "steam"),
            Self::Stadia => write!(f, "stadia"),
        }
    }
}

impl From<MembershipType> for i32 {
    fn from(value: MembershipType) -> Self {
        value.as_i32()
    }
}

impl TryFrom<i32> for MembershipType {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_i32(value).ok_or_else(|| format!("unknown membership type: {value}"))
    }
}
