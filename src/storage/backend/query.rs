//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use super::{LinkScope, SeaOrmStorage};
use super::converters::{model_to_link, model_to_token};
use crate::errors::Result;
use crate::storage::{Link, Token};

use migration::entities::{link, token};

/// 可见性过滤条件；`All` 不加任何限制
fn scope_condition(scope: LinkScope) -> Condition {
    match scope {
        LinkScope::All => Condition::all(),
        LinkScope::Live { now } => Condition::all()
            .add(link::Column::Deleted.eq(false))
            .add(
                Condition::any()
                    .add(link::Column::ExpiresAt.is_null())
                    .add(link::Column::ExpiresAt.gt(now)),
            ),
    }
}

impl SeaOrmStorage {
    /// All links in `scope`, in insertion order
    pub async fn list_links(&self, scope: LinkScope) -> Result<Vec<Link>> {
        let models = link::Entity::find()
            .filter(scope_condition(scope))
            .order_by_asc(link::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_link).collect())
    }

    /// Look up a link by exact symbol.
    ///
    /// Under `LinkScope::All` several rows may share a symbol (one live plus
    /// any number of soft-deleted ones); the live row wins, then the newest.
    pub async fn find_link(&self, symbol: &str, scope: LinkScope) -> Result<Option<Link>> {
        let model = link::Entity::find()
            .filter(link::Column::Symbol.eq(symbol))
            .filter(scope_condition(scope))
            .order_by_asc(link::Column::Deleted)
            .order_by_desc(link::Column::Id)
            .one(&self.db)
            .await?;

        Ok(model.map(model_to_link))
    }

    pub async fn count_links(&self, scope: LinkScope) -> Result<u64> {
        let count = link::Entity::find()
            .filter(scope_condition(scope))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// Exact-match token lookup, no caching
    pub async fn find_token(&self, value: &str) -> Result<Option<Token>> {
        let model = token::Entity::find()
            .filter(token::Column::Token.eq(value))
            .one(&self.db)
            .await?;

        Ok(model.map(model_to_token))
    }

    pub async fn list_tokens(&self) -> Result<Vec<Token>> {
        let models = token::Entity::find()
            .order_by_asc(token::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_token).collect())
    }
}
