//! API 帮助函数

use actix_web::http::StatusCode;
use actix_web::http::header::ALLOW;
use actix_web::{HttpRequest, HttpResponse, error, web};
use serde::Serialize;
use tracing::{debug, error};

use crate::errors::ShortkeyError;

use super::error_code::ErrorCode;
use super::types::ErrorBody;

/// JSON bodies above this size are rejected with 400
pub const JSON_BODY_LIMIT: usize = 64 * 1024;

/// 构建 JSON 成功响应
pub fn json_ok<T: Serialize>(data: &T) -> HttpResponse {
    HttpResponse::Ok()
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(data)
}

/// 201 JSON 响应
pub fn json_created<T: Serialize>(data: &T) -> HttpResponse {
    HttpResponse::Created()
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(data)
}

/// 构建错误响应
pub fn error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ErrorBody {
            code: code as i32,
            message: message.to_string(),
        })
}

/// 从 ShortkeyError 构建错误响应；细节只进日志，不进响应体
pub fn error_from_shortkey(err: &ShortkeyError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("Request failed: {}", err);
    } else {
        debug!("Request rejected: {}", err);
    }
    error_response(status, ErrorCode::from(err), err.public_message())
}

/// Same status as [`error_from_shortkey`], without a body (for HEAD)
pub fn bare_error(err: &ShortkeyError) -> HttpResponse {
    if err.http_status().is_server_error() {
        error!("Request failed: {}", err);
    }
    HttpResponse::build(err.http_status()).finish()
}

pub fn method_not_allowed(allow: &'static str) -> HttpResponse {
    HttpResponse::build(StatusCode::METHOD_NOT_ALLOWED)
        .insert_header((ALLOW, allow))
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ErrorBody {
            code: ErrorCode::MethodNotAllowed as i32,
            message: "Method Not Allowed".to_string(),
        })
}

/// JSON extractor config: size limit and a uniform 400 on malformed bodies
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req: &HttpRequest| {
            debug!("Malformed JSON body: {}", err);
            let response =
                error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, "Bad Request");
            error::InternalError::from_response(err, response).into()
        })
}
