use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Role;

/// A stored short link
///
/// `owner_token` is a back-reference to the token that created the link. It is
/// only consulted for ownership checks and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub symbol: String,
    pub destination: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub deleted: bool,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub owner_token: Option<String>,
}

impl Link {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    /// Visible to non-admin callers
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        !self.deleted && !self.is_expired_at(now)
    }
}

/// Insert payload; `created_at` and `deleted` are set by storage
#[derive(Debug, Clone)]
pub struct NewLink {
    pub symbol: String,
    pub destination: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub owner_token: Option<String>,
}

/// A provisioned bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: i64,
    pub value: String,
    pub role: Role,
    /// Raw stored level, kept so listings show what is actually persisted
    pub level: i16,
    pub description: String,
    /// Invites this token may still create; `None` is unlimited
    pub invites_left: Option<i32>,
}

impl Token {
    /// First few characters followed by an ellipsis, for listings and logs
    pub fn masked(&self) -> String {
        let prefix: String = self.value.chars().take(6).collect();
        format!("{}…", prefix)
    }
}

/// A single-use invite; redeeming it creates a token with `level`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invite {
    pub id: i64,
    pub code: String,
    pub inviter_id: i64,
    pub level: i16,
    pub used: bool,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}
