use crate::auth::Role;
use crate::storage::{Invite, Link, Token};
use migration::entities::{invite, link, token};

/// 将 Sea-ORM Model 转换为 Link
pub fn model_to_link(model: link::Model) -> Link {
    Link {
        id: model.id,
        symbol: model.symbol,
        destination: model.destination,
        created_at: model.created_at,
        expires_at: model.expires_at,
        deleted: model.deleted,
        deleted_at: model.deleted_at,
        owner_token: model.owner_token,
    }
}

/// 将 Sea-ORM Model 转换为 Token，role 由存储的等级推导
pub fn model_to_token(model: token::Model) -> Token {
    Token {
        id: model.id,
        value: model.token,
        role: Role::from_level(model.role),
        level: model.role,
        description: model.description,
        invites_left: model.invites_left,
    }
}

pub fn model_to_invite(model: invite::Model) -> Invite {
    Invite {
        id: model.id,
        code: model.code,
        inviter_id: model.inviter_id,
        level: model.role,
        used: model.used,
        created_at: model.created_at,
        used_at: model.used_at,
    }
}
