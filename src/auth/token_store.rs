//! Bearer token resolution
//!
//! Tokens are provisioned out of band (see the `token` CLI command) and only
//! read on the request path. Every lookup goes to storage: there is no cache,
//! so revoking a token takes effect on the very next request.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{Caller, Role};
use crate::errors::{Result, ShortkeyError};
use crate::storage::{SeaOrmStorage, Token};
use crate::utils::generate_token;

/// Length of tokens issued by [`TokenStore::issue`]
pub const ISSUED_TOKEN_LENGTH: usize = 42;

/// How the CLI names a token: its full value, or `#<id>` as shown by `token list`
///
/// Issued values are URL-safe base64 and never start with `#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenRef {
    Id(i64),
    Value(String),
}

impl std::str::FromStr for TokenRef {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix('#') {
            Some(id) => id
                .parse()
                .map(TokenRef::Id)
                .map_err(|_| format!("invalid token id: '{}'", s)),
            None if s.is_empty() => Err("token cannot be empty".to_string()),
            None => Ok(TokenRef::Value(s.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<SeaOrmStorage>,
}

impl TokenStore {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// Resolve a presented token to a role.
    ///
    /// This never fails. A missing token, an unknown token and a storage
    /// error all resolve to [`Role::Anonymous`]; the request then falls
    /// through to the authorization policy, which denies every management
    /// operation to anonymous callers. Callers must not turn this into an
    /// error path.
    pub async fn resolve(&self, token: Option<&str>) -> Role {
        let Some(value) = token.filter(|t| !t.is_empty()) else {
            return Role::Anonymous;
        };

        match self.storage.find_token(value).await {
            Ok(Some(found)) => found.role,
            Ok(None) => {
                debug!("Presented token is unknown, treating caller as anonymous");
                Role::Anonymous
            }
            Err(e) => {
                warn!("Token lookup failed, treating caller as anonymous: {}", e);
                Role::Anonymous
            }
        }
    }

    /// Resolve a presented token to a full [`Caller`]
    pub async fn resolve_caller(&self, token: Option<&str>) -> Caller {
        let role = self.resolve(token).await;
        match token {
            Some(value) => Caller::new(value, role),
            None => Caller::anonymous(),
        }
    }

    /// Create a new token with a random value
    pub async fn issue(&self, role: Role, description: &str) -> Result<Token> {
        if role == Role::Anonymous {
            return Err(ShortkeyError::bad_input(
                "issuing an anonymous token is pointless",
            ));
        }

        let value = generate_token(ISSUED_TOKEN_LENGTH);
        let token = self.storage.insert_token(&value, role, description).await?;
        info!("Issued {} token #{} ({})", role, token.id, description);
        Ok(token)
    }

    pub async fn list(&self) -> Result<Vec<Token>> {
        self.storage.list_tokens().await
    }

    /// Remove a token; links it created keep their `owner_token` back-reference
    pub async fn revoke(&self, value: &str) -> Result<()> {
        self.revoke_ref(&TokenRef::Value(value.to_string())).await
    }

    pub async fn revoke_ref(&self, token: &TokenRef) -> Result<()> {
        let removed = match token {
            TokenRef::Id(id) => self.storage.delete_token_by_id(*id).await?,
            TokenRef::Value(value) => self.storage.delete_token(value).await?,
        };
        if removed == 0 {
            return Err(ShortkeyError::not_found("token does not exist"));
        }
        info!("Token revoked");
        Ok(())
    }
}
