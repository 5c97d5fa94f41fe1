//! 邀请码 API
//!
//! - POST /invites - 创建邀请码（需要令牌）
//! - POST /invite/{code} - 兑换邀请码，返回新令牌

use actix_web::{HttpRequest, HttpResponse, Resource, web};
use tracing::trace;

use crate::api::middleware::caller_of;
use crate::services::InviteService;

use super::helpers::{error_from_shortkey, json_created, method_not_allowed};
use super::types::{InviteCreated, PostInvite, PostRedeem, TokenIssued};

pub const INVITE_ALLOW: &str = "POST";

pub async fn post_invite(
    req: HttpRequest,
    invites: web::Data<InviteService>,
    body: web::Json<PostInvite>,
) -> HttpResponse {
    let caller = caller_of(&req);
    trace!("API: create invite as {}", caller.role);

    match invites.create_invite(&caller, body.level).await {
        Ok(invite) => json_created(&InviteCreated {
            invite: invite.code,
            level: invite.level,
        }),
        Err(e) => error_from_shortkey(&e),
    }
}

pub async fn redeem_invite(
    invites: web::Data<InviteService>,
    path: web::Path<String>,
    body: web::Json<PostRedeem>,
) -> HttpResponse {
    let code = path.into_inner();

    match invites.redeem(&code, &body.description).await {
        Ok(token) => json_created(&TokenIssued::from(token)),
        Err(e) => error_from_shortkey(&e),
    }
}

async fn invite_not_allowed() -> HttpResponse {
    method_not_allowed(INVITE_ALLOW)
}

pub fn invites_collection(path: &str) -> Resource {
    web::resource(path)
        .route(web::post().to(post_invite))
        .default_service(web::to(invite_not_allowed))
}

pub fn invite_item() -> Resource {
    web::resource("/invite/{code}")
        .route(web::post().to(redeem_invite))
        .default_service(web::to(invite_not_allowed))
}
