use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Privilege ladder: `Anonymous < User < Admin`
///
/// Stored as a small integer in `tokens.role`. Levels below 1 are anonymous,
/// 1 and 2 are regular users, 3 and above are administrators.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Anonymous,
    User,
    Admin,
}

impl Role {
    pub const ADMIN_LEVEL: i16 = 3;

    pub fn from_level(level: i16) -> Self {
        match level {
            i16::MIN..=0 => Role::Anonymous,
            1..=2 => Role::User,
            _ => Role::Admin,
        }
    }

    /// Canonical stored level
    pub fn level(self) -> i16 {
        match self {
            Role::Anonymous => 0,
            Role::User => 1,
            Role::Admin => Self::ADMIN_LEVEL,
        }
    }
}
