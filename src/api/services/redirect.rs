use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use tracing::{debug, error, trace};

use crate::config::get_config;
use crate::errors::ShortkeyError;
use crate::services::LinkService;
use crate::utils::validate_symbol;

/// Landing body for `GET /` when no root redirect is configured
pub const ROOT_BODY: &str = "shortkey";

pub struct RedirectService {}

impl RedirectService {
    pub async fn handle_root() -> HttpResponse {
        match get_config().links.root_redirect.as_deref() {
            Some(target) if !target.is_empty() => HttpResponse::TemporaryRedirect()
                .insert_header(("Location", target))
                .finish(),
            _ => HttpResponse::Ok()
                .insert_header(("Content-Type", "text/plain; charset=utf-8"))
                .body(ROOT_BODY),
        }
    }

    /// 匿名跳转：只看未删除且未过期的链接
    pub async fn handle_redirect(
        path: web::Path<String>,
        links: web::Data<LinkService>,
    ) -> HttpResponse {
        let symbol = path.into_inner();

        if validate_symbol(&symbol).is_err() {
            // 非法短码，直接 404，不查库
            trace!("Invalid symbol rejected: {}", &symbol);
            return Self::not_found_response();
        }

        match links.resolve_redirect(&symbol).await {
            Ok(link) => {
                debug!("Redirecting {} -> {}", link.symbol, link.destination);
                HttpResponse::TemporaryRedirect()
                    .insert_header(("Location", link.destination))
                    .finish()
            }
            Err(ShortkeyError::NotFound(_)) => {
                debug!("Redirect link not found: {}", &symbol);
                Self::not_found_response()
            }
            Err(e) => {
                error!("Database error during redirect lookup: {}", e);
                Self::error_response()
            }
        }
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("Not Found")
    }

    #[inline]
    fn error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("Internal Server Error")
    }
}

pub fn redirect_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(RedirectService::handle_root))
            .route(web::head().to(RedirectService::handle_root)),
    )
    .service(
        web::resource("/{symbol}")
            .route(web::get().to(RedirectService::handle_redirect))
            .route(web::head().to(RedirectService::handle_redirect)),
    );
}
