//! Invite operations for SeaOrmStorage
//!
//! Quota consumption and invite insertion share one transaction, as do
//! claiming an invite and creating the token it grants.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ExprTrait, QueryFilter, TransactionTrait,
    sea_query::Expr,
};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::model_to_invite;
use super::mutations::{insert_token_on, map_insert_error};
use crate::errors::Result;
use crate::storage::{Invite, Token};

use migration::entities::{invite, token};

impl SeaOrmStorage {
    /// Store a new invite issued by token `inviter_id`.
    ///
    /// With `consume_quota` the inviter's `invites_left` is decremented first;
    /// `Ok(None)` means the quota was already exhausted and nothing was written.
    pub async fn create_invite(
        &self,
        inviter_id: i64,
        level: i16,
        code: &str,
        consume_quota: bool,
        now: DateTime<Utc>,
    ) -> Result<Option<Invite>> {
        use sea_orm::ActiveValue::*;

        let txn = self.db.begin().await?;

        if consume_quota {
            // NULL 配额不满足 > 0，只有管理员跳过这一步
            let result = token::Entity::update_many()
                .col_expr(
                    token::Column::InvitesLeft,
                    Expr::col(token::Column::InvitesLeft).sub(1),
                )
                .filter(token::Column::Id.eq(inviter_id))
                .filter(token::Column::InvitesLeft.gt(0))
                .exec(&txn)
                .await?;

            if result.rows_affected == 0 {
                txn.rollback().await?;
                debug!("Token #{} has no invites left", inviter_id);
                return Ok(None);
            }
        }

        let model = invite::ActiveModel {
            id: NotSet,
            code: Set(code.to_string()),
            inviter_id: Set(inviter_id),
            role: Set(level),
            used: Set(false),
            created_at: Set(now),
            used_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| map_insert_error(e, "invite"))?;

        txn.commit().await?;

        info!("Invite #{} created by token #{}", model.id, inviter_id);
        Ok(Some(model_to_invite(model)))
    }

    pub async fn find_invite(&self, code: &str) -> Result<Option<Invite>> {
        let model = invite::Entity::find()
            .filter(invite::Column::Code.eq(code))
            .one(&self.db)
            .await?;

        Ok(model.map(model_to_invite))
    }

    /// Claim an unused invite and create the token it grants.
    ///
    /// `invites_for` maps the invite's level to the new token's quota.
    /// `Ok(None)` when the code is unknown or was already redeemed.
    pub async fn redeem_invite<F>(
        &self,
        code: &str,
        value: &str,
        description: &str,
        now: DateTime<Utc>,
        invites_for: F,
    ) -> Result<Option<Token>>
    where
        F: FnOnce(i16) -> Option<i32>,
    {
        let txn = self.db.begin().await?;

        let Some(pending) = invite::Entity::find()
            .filter(invite::Column::Code.eq(code))
            .filter(invite::Column::Used.eq(false))
            .one(&txn)
            .await?
        else {
            txn.rollback().await?;
            return Ok(None);
        };

        // 条件更新，保证同一邀请码只能兑换一次
        let claimed = invite::Entity::update_many()
            .col_expr(invite::Column::Used, Expr::value(true))
            .col_expr(invite::Column::UsedAt, Expr::value(now))
            .filter(invite::Column::Id.eq(pending.id))
            .filter(invite::Column::Used.eq(false))
            .exec(&txn)
            .await?;

        if claimed.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        let token = insert_token_on(
            &txn,
            value,
            pending.role,
            invites_for(pending.role),
            description,
        )
        .await?;

        txn.commit().await?;

        info!("Invite #{} redeemed as token #{}", pending.id, token.id);
        Ok(Some(token))
    }
}
