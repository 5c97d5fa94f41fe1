//! `/links` management API
//!
//! - GET/HEAD/POST/DELETE /links/ - 列表、鉴权检查、创建、批量软删除
//! - GET/DELETE /links/{symbol} - 获取、硬删除

use actix_web::{HttpRequest, HttpResponse, Resource, web};
use tracing::{info, trace};

use crate::api::middleware::caller_of;
use crate::services::LinkService;

use super::helpers::{bare_error, error_from_shortkey, json_ok, method_not_allowed};
use super::types::PostNewLink;

pub const COLLECTION_ALLOW: &str = "GET, HEAD, POST, DELETE";
pub const ITEM_ALLOW: &str = "GET, DELETE";

/// 获取调用者可见的所有链接
pub async fn get_all_links(req: HttpRequest, links: web::Data<LinkService>) -> HttpResponse {
    let caller = caller_of(&req);
    trace!("API: list links as {}", caller.role);

    match links.list_visible(&caller).await {
        Ok(list) => {
            info!("API: returning {} links to {} caller", list.len(), caller.role);
            json_ok(&list)
        }
        Err(e) => error_from_shortkey(&e),
    }
}

/// HEAD：只做鉴权
pub async fn head_links(req: HttpRequest, links: web::Data<LinkService>) -> HttpResponse {
    match links.check_access(&caller_of(&req)) {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(e) => bare_error(&e),
    }
}

pub async fn post_link(
    req: HttpRequest,
    links: web::Data<LinkService>,
    body: web::Json<PostNewLink>,
) -> HttpResponse {
    let caller = caller_of(&req);

    match links.create(body.into_inner().into(), &caller).await {
        Ok(result) => json_ok(&result.link),
        Err(e) => error_from_shortkey(&e),
    }
}

/// 批量软删除；非管理员只影响自己创建的链接
pub async fn delete_all_links(req: HttpRequest, links: web::Data<LinkService>) -> HttpResponse {
    match links.soft_delete_all(&caller_of(&req)).await {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(e) => error_from_shortkey(&e),
    }
}

pub async fn get_link(
    req: HttpRequest,
    links: web::Data<LinkService>,
    path: web::Path<String>,
) -> HttpResponse {
    let symbol = path.into_inner();

    match links.get_by_symbol(&symbol, &caller_of(&req)).await {
        Ok(link) => json_ok(&link),
        Err(e) => error_from_shortkey(&e),
    }
}

pub async fn delete_link(
    req: HttpRequest,
    links: web::Data<LinkService>,
    path: web::Path<String>,
) -> HttpResponse {
    let symbol = path.into_inner();

    match links.hard_delete(&symbol, &caller_of(&req)).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_from_shortkey(&e),
    }
}

async fn collection_not_allowed() -> HttpResponse {
    method_not_allowed(COLLECTION_ALLOW)
}

async fn item_not_allowed() -> HttpResponse {
    method_not_allowed(ITEM_ALLOW)
}

/// `/links` 与 `/links/` 共用同一组 handler
pub fn links_collection(path: &str) -> Resource {
    web::resource(path)
        .route(web::get().to(get_all_links))
        .route(web::head().to(head_links))
        .route(web::post().to(post_link))
        .route(web::delete().to(delete_all_links))
        .default_service(web::to(collection_not_allowed))
}

pub fn link_item() -> Resource {
    web::resource("/links/{symbol}")
        .route(web::get().to(get_link))
        .route(web::delete().to(delete_link))
        .default_service(web::to(item_not_allowed))
}
