use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::error;

/// Body returned for every 5xx response; the cause is only logged.
pub const GENERIC_INTERNAL_ERROR: &str = "Internal Server Error";

/// Body returned when the PIN gate rejects a request.
pub const INVALID_PIN: &str = "Invalid PIN";

#[derive(Debug, Clone)]
pub enum LinkboardError {
    Config(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Migration(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Unauthorized(String),
    Shutdown(String),
}

impl LinkboardError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkboardError::Config(_) => "E001",
            LinkboardError::DatabaseConfig(_) => "E002",
            LinkboardError::DatabaseConnection(_) => "E003",
            LinkboardError::DatabaseOperation(_) => "E004",
            LinkboardError::Migration(_) => "E005",
            LinkboardError::FileOperation(_) => "E006",
            LinkboardError::Validation(_) => "E007",
            LinkboardError::NotFound(_) => "E008",
            LinkboardError::Unauthorized(_) => "E009",
            LinkboardError::Shutdown(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkboardError::Config(_) => "Configuration Error",
            LinkboardError::DatabaseConfig(_) => "Database Configuration Error",
            LinkboardError::DatabaseConnection(_) => "Database Connection Error",
            LinkboardError::DatabaseOperation(_) => "Database Operation Error",
            LinkboardError::Migration(_) => "Migration Error",
            LinkboardError::FileOperation(_) => "File Operation Error",
            LinkboardError::Validation(_) => "Validation Error",
            LinkboardError::NotFound(_) => "Resource Not Found",
            LinkboardError::Unauthorized(_) => "Unauthorized",
            LinkboardError::Shutdown(_) => "Shutdown Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkboardError::Config(msg)
            | LinkboardError::DatabaseConfig(msg)
            | LinkboardError::DatabaseConnection(msg)
            | LinkboardError::DatabaseOperation(msg)
            | LinkboardError::Migration(msg)
            | LinkboardError::FileOperation(msg)
            | LinkboardError::Validation(msg)
            | LinkboardError::NotFound(msg)
            | LinkboardError::Unauthorized(msg)
            | LinkboardError::Shutdown(msg) => msg,
        }
    }

    /// Whether the message may be shown to the client as-is.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            LinkboardError::Validation(_)
                | LinkboardError::NotFound(_)
                | LinkboardError::Unauthorized(_)
        )
    }

    /// 格式化为彩色输出（用于启动失败时的终端提示）
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

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkboardError {}

impl ResponseError for LinkboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            LinkboardError::Validation(_) => StatusCode::BAD_REQUEST,
            LinkboardError::NotFound(_) => StatusCode::NOT_FOUND,
            LinkboardError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = if self.is_client_error() {
            self.message().to_string()
        } else {
            error!(code = self.code(), "{}", self.format_simple());
            GENERIC_INTERNAL_ERROR.to_string()
        };

        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(body)
    }
}

// 便捷的构造函数
impl LinkboardError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinkboardError::Config(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinkboardError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkboardError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkboardError::DatabaseOperation(msg.into())
    }

    pub fn migration<T: Into<String>>(msg: T) -> Self {
        LinkboardError::Migration(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkboardError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkboardError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkboardError::NotFound(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        LinkboardError::Unauthorized(msg.into())
    }

    pub fn shutdown<T: Into<String>>(msg: T) -> Self {
        LinkboardError::Shutdown(msg.into())
    }
}

impl From<sea_orm::DbErr> for LinkboardError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkboardError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LinkboardError {
    fn from(err: std::io::Error) -> Self {
        LinkboardError::FileOperation(err.to_string())
    }
}

impl From<config::ConfigError> for LinkboardError {
    fn from(err: config::ConfigError) -> Self {
        LinkboardError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkboardError>;
