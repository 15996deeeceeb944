use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadlineError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Validation(String),
    NotFound(String),
    ItemNotFound(String),
    UserAlreadyExists(String),
    InvalidCredentials(String),
    Unauthorized(String),
    InvalidToken(String),
    CommentsDisabled(String),
    PasswordHash(String),
    TokenGeneration(String),
}

impl ThreadlineError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ThreadlineError::DatabaseConfig(_) => "E001",
            ThreadlineError::DatabaseConnection(_) => "E002",
            ThreadlineError::DatabaseOperation(_) => "E003",
            ThreadlineError::Validation(_) => "E004",
            ThreadlineError::NotFound(_) => "E005",
            ThreadlineError::ItemNotFound(_) => "E006",
            ThreadlineError::UserAlreadyExists(_) => "E007",
            ThreadlineError::InvalidCredentials(_) => "E008",
            ThreadlineError::Unauthorized(_) => "E009",
            ThreadlineError::InvalidToken(_) => "E010",
            ThreadlineError::CommentsDisabled(_) => "E011",
            ThreadlineError::PasswordHash(_) => "E012",
            ThreadlineError::TokenGeneration(_) => "E013",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ThreadlineError::DatabaseConfig(_) => "Database Configuration Error",
            ThreadlineError::DatabaseConnection(_) => "Database Connection Error",
            ThreadlineError::DatabaseOperation(_) => "Database Operation Error",
            ThreadlineError::Validation(_) => "Validation Error",
            ThreadlineError::NotFound(_) => "Resource Not Found",
            ThreadlineError::ItemNotFound(_) => "Item Not Found",
            ThreadlineError::UserAlreadyExists(_) => "User Already Exists",
            ThreadlineError::InvalidCredentials(_) => "Invalid Credentials",
            ThreadlineError::Unauthorized(_) => "Unauthorized",
            ThreadlineError::InvalidToken(_) => "Invalid Token",
            ThreadlineError::CommentsDisabled(_) => "Comments Disabled",
            ThreadlineError::PasswordHash(_) => "Password Hash Error",
            ThreadlineError::TokenGeneration(_) => "Token Generation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ThreadlineError::DatabaseConfig(msg)
            | ThreadlineError::DatabaseConnection(msg)
            | ThreadlineError::DatabaseOperation(msg)
            | ThreadlineError::Validation(msg)
            | ThreadlineError::NotFound(msg)
            | ThreadlineError::ItemNotFound(msg)
            | ThreadlineError::UserAlreadyExists(msg)
            | ThreadlineError::InvalidCredentials(msg)
            | ThreadlineError::Unauthorized(msg)
            | ThreadlineError::InvalidToken(msg)
            | ThreadlineError::CommentsDisabled(msg)
            | ThreadlineError::PasswordHash(msg)
            | ThreadlineError::TokenGeneration(msg) => msg,
        }
    }

    /// HTTP status for API responses
    pub fn http_status(&self) -> StatusCode {
        match self {
            ThreadlineError::Validation(_) => StatusCode::BAD_REQUEST,
            ThreadlineError::Unauthorized(_) | ThreadlineError::InvalidCredentials(_) => {
                StatusCode::UNAUTHORIZED
            }
            ThreadlineError::InvalidToken(_) | ThreadlineError::CommentsDisabled(_) => {
                StatusCode::FORBIDDEN
            }
            ThreadlineError::NotFound(_) | ThreadlineError::ItemNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ThreadlineError::UserAlreadyExists(_) => StatusCode::CONFLICT,
            ThreadlineError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式启动失败）
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

impl fmt::Display for ThreadlineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ThreadlineError {}

impl ResponseError for ThreadlineError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        crate::api::services::error_from_threadline(self)
    }
}

// 便捷的构造函数
impl ThreadlineError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ThreadlineError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ThreadlineError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ThreadlineError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ThreadlineError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ThreadlineError::NotFound(msg.into())
    }

    pub fn item_not_found<T: Into<String>>(msg: T) -> Self {
        ThreadlineError::ItemNotFound(msg.into())
    }

    pub fn user_already_exists<T: Into<String>>(msg: T) -> Self {
        ThreadlineError::UserAlreadyExists(msg.into())
    }

    pub fn invalid_credentials<T: Into<String>>(msg: T) -> Self {
        ThreadlineError::InvalidCredentials(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        ThreadlineError::Unauthorized(msg.into())
    }

    pub fn invalid_token<T: Into<String>>(msg: T) -> Self {
        ThreadlineError::InvalidToken(msg.into())
    }

    pub fn comments_disabled<T: Into<String>>(msg: T) -> Self {
        ThreadlineError::CommentsDisabled(msg.into())
    }

    pub fn token_generation<T: Into<String>>(msg: T) -> Self {
        ThreadlineError::TokenGeneration(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ThreadlineError {
    fn from(err: sea_orm::DbErr) -> Self {
        ThreadlineError::DatabaseOperation(err.to_string())
    }
}

impl From<crate::utils::password::PasswordError> for ThreadlineError {
    fn from(err: crate::utils::password::PasswordError) -> Self {
        ThreadlineError::PasswordHash(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ThreadlineError>;
