//! Link repository service
//!
//! Every management operation goes through here: the caller's role picks the
//! visibility scope, the authorization policy gates the operation, and the
//! storage backend runs a single statement.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::auth::{Caller, Operation, permit};
use crate::errors::{Result, ShortkeyError};
use crate::storage::{Link, LinkScope, NewLink, SeaOrmStorage};
use crate::utils::{TimeParser, generate_random_code, validate_destination, validate_symbol};

/// Generated symbols are retried this many times on collision
const GENERATED_SYMBOL_ATTEMPTS: usize = 5;

/// Request to create a new link
#[derive(Debug, Clone, Default)]
pub struct CreateLinkRequest {
    /// Short symbol (optional, generated if missing or empty)
    pub symbol: Option<String>,
    pub destination: String,
    /// RFC3339 or relative ("30m", "1d12h"); past instants are allowed
    pub expiry: Option<String>,
}

/// Result of link creation
#[derive(Debug, Clone)]
pub struct LinkCreateResult {
    pub link: Link,
    /// Whether the symbol was generated
    pub generated_symbol: bool,
}

#[derive(Clone)]
pub struct LinkService {
    storage: Arc<SeaOrmStorage>,
    random_symbol_length: usize,
    admin_symbol_length: usize,
}

impl LinkService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        let config = crate::config::get_config();
        Self::with_symbol_length(storage, config.links.random_symbol_length)
            .with_admin_symbol_length(config.links.admin_symbol_length)
    }

    /// Same generated length for every role
    pub fn with_symbol_length(storage: Arc<SeaOrmStorage>, random_symbol_length: usize) -> Self {
        let length = random_symbol_length.max(1);
        Self {
            storage,
            random_symbol_length: length,
            admin_symbol_length: length,
        }
    }

    /// Admins get shorter generated symbols
    pub fn with_admin_symbol_length(mut self, admin_symbol_length: usize) -> Self {
        self.admin_symbol_length = admin_symbol_length.max(1);
        self
    }

    fn generated_length(&self, caller: &Caller) -> usize {
        if caller.is_admin() {
            self.admin_symbol_length
        } else {
            self.random_symbol_length
        }
    }

    fn ensure_permitted(caller: &Caller, operation: Operation, is_owner: bool) -> Result<()> {
        if permit(caller.role, operation, is_owner) {
            Ok(())
        } else {
            debug!("{} denied for {} caller", operation, caller.role);
            Err(ShortkeyError::unauthorized(format!(
                "{} not permitted for {}",
                operation, caller.role
            )))
        }
    }

    /// Public redirect lookup; always the live scope, whatever the caller
    pub async fn resolve_redirect(&self, symbol: &str) -> Result<Link> {
        let scope = LinkScope::Live { now: Utc::now() };
        self.storage
            .find_link(symbol, scope)
            .await?
            .ok_or_else(|| ShortkeyError::not_found(format!("no live link '{}'", symbol)))
    }

    /// Admins see every stored row, everyone else live links only
    pub async fn list_visible(&self, caller: &Caller) -> Result<Vec<Link>> {
        Self::ensure_permitted(caller, Operation::List, false)?;
        let scope = LinkScope::for_role(caller.role, Utc::now());
        self.storage.list_links(scope).await
    }

    /// `HEAD /links/`: authorization only, no rows are read
    pub fn check_access(&self, caller: &Caller) -> Result<()> {
        Self::ensure_permitted(caller, Operation::Head, false)
    }

    pub async fn get_by_symbol(&self, symbol: &str, caller: &Caller) -> Result<Link> {
        Self::ensure_permitted(caller, Operation::Read, false)?;
        let scope = LinkScope::for_role(caller.role, Utc::now());
        self.storage
            .find_link(symbol, scope)
            .await?
            .ok_or_else(|| ShortkeyError::not_found(format!("link '{}' not visible", symbol)))
    }

    pub async fn create(&self, req: CreateLinkRequest, caller: &Caller) -> Result<LinkCreateResult> {
        Self::ensure_permitted(caller, Operation::Create, false)?;

        // 存储解析后的规范形式；原始字符串可能含 Url::parse 会静默去掉的控制字符
        let destination = validate_destination(&req.destination)
            .map_err(|e| ShortkeyError::bad_input(e.to_string()))?
            .to_string();

        let expires_at = match req.expiry.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                TimeParser::parse_expire_time(raw)
                    .map_err(|e| ShortkeyError::bad_input(format!("invalid expiry: {}", e)))?,
            ),
        };

        let requested = req.symbol.filter(|s| !s.is_empty());
        if let Some(symbol) = requested.as_deref() {
            validate_symbol(symbol).map_err(|e| ShortkeyError::bad_input(e.to_string()))?;
        }

        let generated_symbol = requested.is_none();
        let attempts = if generated_symbol {
            GENERATED_SYMBOL_ATTEMPTS
        } else {
            1
        };

        let generated_length = self.generated_length(caller);
        let mut last_err = None;
        for _ in 0..attempts {
            let symbol = match requested.clone() {
                Some(s) => s,
                None => generate_random_code(generated_length),
            };

            let new_link = NewLink {
                symbol,
                destination: destination.clone(),
                expires_at,
                owner_token: caller.token.clone(),
            };

            // 唯一性完全交给数据库的部分唯一索引
            match self.storage.insert_link(new_link).await {
                Ok(link) => {
                    info!(
                        "LinkService: created link '{}' -> '{}' ({})",
                        link.symbol, link.destination, caller.role
                    );
                    return Ok(LinkCreateResult {
                        link,
                        generated_symbol,
                    });
                }
                Err(e @ ShortkeyError::Conflict(_)) => last_err = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| ShortkeyError::conflict("symbol already exists")))
    }

    /// Bulk soft delete. Admins mark every live link; any other permitted
    /// caller only the links created with their own token.
    pub async fn soft_delete_all(&self, caller: &Caller) -> Result<u64> {
        Self::ensure_permitted(caller, Operation::BulkDelete, false)?;

        let owner = if caller.is_admin() {
            None
        } else {
            match caller.token.as_deref() {
                Some(token) => Some(token),
                // 没有 token 就不可能拥有任何链接
                None => return Ok(0),
            }
        };

        let affected = self.storage.soft_delete_links(owner, Utc::now()).await?;
        info!(
            "LinkService: {} caller soft-deleted {} links",
            caller.role, affected
        );
        Ok(affected)
    }

    /// Permanently remove one link the caller can see and owns (or any, for admins)
    pub async fn hard_delete(&self, symbol: &str, caller: &Caller) -> Result<()> {
        // 连自己的链接都不能删的角色（匿名）直接拒绝，不触碰存储
        Self::ensure_permitted(caller, Operation::Delete, true)?;

        let scope = LinkScope::for_role(caller.role, Utc::now());
        let link = self
            .storage
            .find_link(symbol, scope)
            .await?
            .ok_or_else(|| ShortkeyError::not_found(format!("link '{}' not visible", symbol)))?;

        let is_owner = caller.owns(link.owner_token.as_deref());
        Self::ensure_permitted(caller, Operation::Delete, is_owner)?;

        let removed = self.storage.delete_link_by_id(link.id).await?;
        if removed == 0 {
            // 与清理任务或并发删除竞争失败
            return Err(ShortkeyError::not_found(format!(
                "link '{}' already removed",
                symbol
            )));
        }

        info!(
            "LinkService: hard-deleted link '{}' (#{}) by {} caller",
            link.symbol, link.id, caller.role
        );
        Ok(())
    }
}
