//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations. Each one is a single
//! statement; uniqueness and atomicity are left to the database.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    SqlErr, sea_query::Expr,
};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{model_to_link, model_to_token};
use crate::auth::Role;
use crate::errors::{Result, ShortkeyError};
use crate::storage::{Link, NewLink, Token};

use migration::entities::{link, token};

/// 唯一约束冲突 → Conflict，其余仍是存储错误
pub(super) fn map_insert_error(err: DbErr, what: &str) -> ShortkeyError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            debug!("Unique constraint violated on {}: {}", what, detail);
            ShortkeyError::conflict(format!("{} already exists", what))
        }
        _ => ShortkeyError::storage_failure(format!("插入 {} 失败: {}", what, err)),
    }
}

impl SeaOrmStorage {
    /// Insert a live link; a live row with the same symbol yields `Conflict`
    pub async fn insert_link(&self, new: NewLink) -> Result<Link> {
        use sea_orm::ActiveValue::*;

        let active_model = link::ActiveModel {
            id: NotSet,
            symbol: Set(new.symbol),
            destination: Set(new.destination),
            created_at: Set(Utc::now()),
            expires_at: Set(new.expires_at),
            deleted: Set(false),
            deleted_at: Set(None),
            owner_token: Set(new.owner_token),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| map_insert_error(e, "symbol"))?;

        info!("Link created: {} (#{})", model.symbol, model.id);
        Ok(model_to_link(model))
    }

    /// Mark live links deleted. `owner` restricts the update to links created
    /// by that token; `None` touches every live link.
    pub async fn soft_delete_links(&self, owner: Option<&str>, now: DateTime<Utc>) -> Result<u64> {
        let mut condition = Condition::all().add(link::Column::Deleted.eq(false));
        if let Some(owner) = owner {
            condition = condition.add(link::Column::OwnerToken.eq(owner));
        }

        let result = link::Entity::update_many()
            .col_expr(link::Column::Deleted, Expr::value(true))
            .col_expr(link::Column::DeletedAt, Expr::value(now))
            .filter(condition)
            .exec(&self.db)
            .await?;

        info!("Soft-deleted {} links", result.rows_affected);
        Ok(result.rows_affected)
    }

    /// Remove one row; zero affected rows means someone else got there first
    pub async fn delete_link_by_id(&self, id: i64) -> Result<u64> {
        let result = link::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    /// Remove links that expired, or were soft-deleted, before `cutoff`
    pub async fn purge_stale(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let expired = Condition::all()
            .add(link::Column::ExpiresAt.is_not_null())
            .add(link::Column::ExpiresAt.lt(cutoff));
        let deleted = Condition::all()
            .add(link::Column::Deleted.eq(true))
            .add(link::Column::DeletedAt.is_not_null())
            .add(link::Column::DeletedAt.lt(cutoff));

        let result = link::Entity::delete_many()
            .filter(Condition::any().add(expired).add(deleted))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Insert a token at the canonical level for `role`; admins get unlimited invites
    pub async fn insert_token(&self, value: &str, role: Role, description: &str) -> Result<Token> {
        let invites_left = if role == Role::Admin { None } else { Some(0) };
        insert_token_on(&self.db, value, role.level(), invites_left, description).await
    }

    /// Insert a token with an explicit stored level and invite quota
    pub async fn insert_token_with(
        &self,
        value: &str,
        level: i16,
        invites_left: Option<i32>,
        description: &str,
    ) -> Result<Token> {
        insert_token_on(&self.db, value, level, invites_left, description).await
    }

    pub async fn delete_token(&self, value: &str) -> Result<u64> {
        let result = token::Entity::delete_many()
            .filter(token::Column::Token.eq(value))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_token_by_id(&self, id: i64) -> Result<u64> {
        let result = token::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}

/// Token insert shared by the plain connection and invite redemption transactions
pub(super) async fn insert_token_on<C: ConnectionTrait>(
    conn: &C,
    value: &str,
    level: i16,
    invites_left: Option<i32>,
    description: &str,
) -> Result<Token> {
    use sea_orm::ActiveValue::*;

    let active_model = token::ActiveModel {
        id: NotSet,
        token: Set(value.to_string()),
        role: Set(level),
        description: Set(description.to_string()),
        invites_left: Set(invites_left),
    };

    let model = active_model
        .insert(conn)
        .await
        .map_err(|e| map_insert_error(e, "token"))?;

    Ok(model_to_token(model))
}
