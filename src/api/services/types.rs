use serde::{Deserialize, Serialize};

/// Error body; `message` is always the generic public text
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ErrorBody {
    pub code: i32,
    pub message: String,
}

/// `POST /links/` body
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PostNewLink {
    #[serde(default)]
    pub symbol: Option<String>,
    pub destination: String,
    #[serde(default, alias = "expires_at")]
    pub expiry: Option<String>,
}

impl From<PostNewLink> for crate::services::CreateLinkRequest {
    fn from(body: PostNewLink) -> Self {
        Self {
            symbol: body.symbol,
            destination: body.destination,
            expiry: body.expiry,
        }
    }
}

/// `POST /invites` body
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PostInvite {
    #[serde(default, alias = "auth-level")]
    pub level: Option<i16>,
}

/// `POST /invites` 201 body
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct InviteCreated {
    pub invite: String,
    pub level: i16,
}

/// `POST /invite/{code}` body
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PostRedeem {
    #[serde(default, alias = "user")]
    pub description: String,
}

/// `POST /invite/{code}` 201 body; the only time the token value is shown
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TokenIssued {
    pub token: String,
    pub role: crate::auth::Role,
    pub level: i16,
}

impl From<crate::storage::Token> for TokenIssued {
    fn from(token: crate::storage::Token) -> Self {
        Self {
            token: token.value,
            role: token.role,
            level: token.level,
        }
    }
}
