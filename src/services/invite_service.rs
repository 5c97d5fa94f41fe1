//! Invite service
//!
//! An invite is a one-shot code that turns into a fresh bearer token. Admins
//! may invite at any user or admin level; users hand out level-1 invites and
//! spend one unit of their quota for each.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::auth::token_store::ISSUED_TOKEN_LENGTH;
use crate::auth::{Caller, Operation, Role, permit};
use crate::errors::{Result, ShortkeyError};
use crate::storage::{Invite, SeaOrmStorage, Token};
use crate::utils::generate_token;

/// Length of generated invite codes
pub const INVITE_CODE_LENGTH: usize = 32;

/// Level an invite grants when the request does not name one
pub const DEFAULT_INVITE_LEVEL: i16 = 1;

#[derive(Clone)]
pub struct InviteService {
    storage: Arc<SeaOrmStorage>,
    enabled: bool,
    quota: i32,
}

impl InviteService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        let config = crate::config::get_config();
        Self::with_settings(storage, config.invites.enabled, config.invites.quota)
    }

    pub fn with_settings(storage: Arc<SeaOrmStorage>, enabled: bool, quota: i32) -> Self {
        Self {
            storage,
            enabled,
            quota: quota.max(0),
        }
    }

    /// Invite quota a freshly redeemed token starts with
    ///
    /// Level 1 cannot invite, level 2 gets the configured quota, admin levels
    /// are unlimited.
    pub fn quota_for_level(&self, level: i16) -> Option<i32> {
        match level {
            i16::MIN..=1 => Some(0),
            2 => Some(self.quota),
            _ => None,
        }
    }

    /// Issue an invite for `level` (defaults to 1)
    pub async fn create_invite(&self, caller: &Caller, level: Option<i16>) -> Result<Invite> {
        if !permit(caller.role, Operation::Invite, false) {
            return Err(ShortkeyError::unauthorized(format!(
                "{} not permitted for {}",
                Operation::Invite,
                caller.role
            )));
        }
        if !self.enabled {
            return Err(ShortkeyError::forbidden("Invites are disabled"));
        }

        let level = level.unwrap_or(DEFAULT_INVITE_LEVEL);
        if caller.is_admin() {
            if !(1..=Role::ADMIN_LEVEL).contains(&level) {
                return Err(ShortkeyError::bad_input(format!(
                    "Invite level must be between 1 and {}",
                    Role::ADMIN_LEVEL
                )));
            }
        } else if level != DEFAULT_INVITE_LEVEL {
            return Err(ShortkeyError::unauthorized(format!(
                "{} callers may only invite at level {}",
                caller.role, DEFAULT_INVITE_LEVEL
            )));
        }

        let token_value = caller
            .token
            .as_deref()
            .ok_or_else(|| ShortkeyError::unauthorized("invite needs a bearer token"))?;
        // 令牌可能在身份解析之后被吊销
        let inviter = self
            .storage
            .find_token(token_value)
            .await?
            .ok_or_else(|| ShortkeyError::unauthorized("inviting token no longer exists"))?;

        let code = generate_token(INVITE_CODE_LENGTH);
        let invite = self
            .storage
            .create_invite(inviter.id, level, &code, !caller.is_admin(), Utc::now())
            .await?
            .ok_or_else(|| {
                debug!("Token #{} tried to invite with an exhausted quota", inviter.id);
                ShortkeyError::forbidden("No invites left")
            })?;

        info!(
            "Invite #{} at level {} issued by token #{}",
            invite.id, invite.level, inviter.id
        );
        Ok(invite)
    }

    /// Exchange an unused invite code for a new token
    ///
    /// Any caller may redeem; the code is the credential.
    pub async fn redeem(&self, code: &str, description: &str) -> Result<Token> {
        let code = code.trim();
        if !self.enabled || code.is_empty() {
            return Err(ShortkeyError::not_found("no such invite"));
        }

        let value = generate_token(ISSUED_TOKEN_LENGTH);
        let token = self
            .storage
            .redeem_invite(code, &value, description, Utc::now(), |level| {
                self.quota_for_level(level)
            })
            .await?
            .ok_or_else(|| ShortkeyError::not_found("invite unknown or already used"))?;

        info!(
            "Invite redeemed: token #{} at level {} ({})",
            token.id, token.level, token.description
        );
        Ok(token)
    }
}
