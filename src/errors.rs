use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum ShortkeyError {
    /// Absent, or filtered out by the caller's visibility scope
    NotFound(String),
    /// Authenticated (or anonymous) caller lacks the rights for the operation
    Unauthorized(String),
    /// Permitted operation refused by a limit, e.g. an exhausted invite quota
    Forbidden(String),
    /// Symbol already taken by a live link
    Conflict(String),
    BadInput(String),
    StorageFailure(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    Config(String),
}

impl ShortkeyError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortkeyError::NotFound(_) => "E001",
            ShortkeyError::Unauthorized(_) => "E002",
            ShortkeyError::Conflict(_) => "E003",
            ShortkeyError::BadInput(_) => "E004",
            ShortkeyError::StorageFailure(_) => "E005",
            ShortkeyError::DatabaseConfig(_) => "E006",
            ShortkeyError::DatabaseConnection(_) => "E007",
            ShortkeyError::Config(_) => "E008",
            ShortkeyError::Forbidden(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortkeyError::NotFound(_) => "Resource Not Found",
            ShortkeyError::Unauthorized(_) => "Unauthorized",
            ShortkeyError::Forbidden(_) => "Forbidden",
            ShortkeyError::Conflict(_) => "Conflict",
            ShortkeyError::BadInput(_) => "Bad Input",
            ShortkeyError::StorageFailure(_) => "Storage Failure",
            ShortkeyError::DatabaseConfig(_) => "Database Configuration Error",
            ShortkeyError::DatabaseConnection(_) => "Database Connection Error",
            ShortkeyError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortkeyError::NotFound(msg)
            | ShortkeyError::Unauthorized(msg)
            | ShortkeyError::Forbidden(msg)
            | ShortkeyError::Conflict(msg)
            | ShortkeyError::BadInput(msg)
            | ShortkeyError::StorageFailure(msg)
            | ShortkeyError::DatabaseConfig(msg)
            | ShortkeyError::DatabaseConnection(msg)
            | ShortkeyError::Config(msg) => msg,
        }
    }

    /// HTTP status the dispatcher answers with.
    ///
    /// Conflict maps to 400: a taken symbol is reported as bad input.
    pub fn http_status(&self) -> StatusCode {
        match self {
            ShortkeyError::NotFound(_) => StatusCode::NOT_FOUND,
            ShortkeyError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ShortkeyError::Forbidden(_) => StatusCode::FORBIDDEN,
            ShortkeyError::Conflict(_) | ShortkeyError::BadInput(_) => StatusCode::BAD_REQUEST,
            ShortkeyError::StorageFailure(_)
            | ShortkeyError::DatabaseConfig(_)
            | ShortkeyError::DatabaseConnection(_)
            | ShortkeyError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to hand to an HTTP client.
    ///
    /// Storage and startup errors never leak their detail; the others carry
    /// only what the caller already sent.
    pub fn public_message(&self) -> &str {
        match self {
            ShortkeyError::NotFound(_) => "Not Found",
            ShortkeyError::Unauthorized(_) => "Unauthorized",
            ShortkeyError::Forbidden(msg) => msg,
            ShortkeyError::Conflict(_) => "Symbol already in use",
            ShortkeyError::BadInput(msg) => msg,
            ShortkeyError::StorageFailure(_)
            | ShortkeyError::DatabaseConfig(_)
            | ShortkeyError::DatabaseConnection(_)
            | ShortkeyError::Config(_) => "Internal Server Error",
        }
    }

    /// 格式化为彩色输出（用于 CLI）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortkeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortkeyError {}

// 便捷的构造函数
impl ShortkeyError {
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::NotFound(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::Unauthorized(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::Forbidden(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::Conflict(msg.into())
    }

    pub fn bad_input<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::BadInput(msg.into())
    }

    pub fn storage_failure<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::StorageFailure(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::DatabaseConnection(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::Config(msg.into())
    }
}

impl From<sea_orm::DbErr> for ShortkeyError {
    fn from(err: sea_orm::DbErr) -> Self {
        ShortkeyError::StorageFailure(err.to_string())
    }
}

impl From<serde_json::Error> for ShortkeyError {
    fn from(err: serde_json::Error) -> Self {
        ShortkeyError::BadInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortkeyError>;
