//! 统一 API 错误码定义
//!
//! 按千位分域：
//! - 0: 成功
//! - 1000-1099: 通用错误
//! - 3000-3099: 链接错误

use crate::errors::ShortkeyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    MethodNotAllowed = 1006,

    // 链接错误 3000-3099
    LinkAlreadyExists = 3001,
}

impl From<&ShortkeyError> for ErrorCode {
    fn from(err: &ShortkeyError) -> Self {
        match err {
            ShortkeyError::NotFound(_) => ErrorCode::NotFound,
            ShortkeyError::Unauthorized(_) => ErrorCode::Unauthorized,
            ShortkeyError::Forbidden(_) => ErrorCode::Forbidden,
            ShortkeyError::Conflict(_) => ErrorCode::LinkAlreadyExists,
            ShortkeyError::BadInput(_) => ErrorCode::BadRequest,
            ShortkeyError::StorageFailure(_)
            | ShortkeyError::DatabaseConfig(_)
            | ShortkeyError::DatabaseConnection(_)
            | ShortkeyError::Config(_) => ErrorCode::InternalServerError,
        }
    }
}
