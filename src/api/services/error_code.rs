//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::ThreadlineError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 用户错误
/// - 4000-4099: 帖子 / 评论错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenInvalid = 2002,

    // 用户错误 3000-3099
    UserAlreadyExists = 3001,

    // 帖子 / 评论错误 4000-4099
    ItemNotFound = 4000,
    CommentsDisabled = 4001,
}

impl From<&ThreadlineError> for ErrorCode {
    fn from(err: &ThreadlineError) -> Self {
        match err {
            ThreadlineError::Validation(_) => ErrorCode::BadRequest,
            ThreadlineError::NotFound(_) => ErrorCode::NotFound,
            ThreadlineError::ItemNotFound(_) => ErrorCode::ItemNotFound,
            ThreadlineError::UserAlreadyExists(_) => ErrorCode::UserAlreadyExists,
            ThreadlineError::InvalidCredentials(_) => ErrorCode::AuthFailed,
            ThreadlineError::Unauthorized(_) => ErrorCode::Unauthorized,
            ThreadlineError::InvalidToken(_) => ErrorCode::TokenInvalid,
            ThreadlineError::CommentsDisabled(_) => ErrorCode::CommentsDisabled,
            ThreadlineError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            ThreadlineError::DatabaseConfig(_)
            | ThreadlineError::DatabaseOperation(_)
            | ThreadlineError::PasswordHash(_)
            | ThreadlineError::TokenGeneration(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::TokenInvalid).unwrap(), "2002");
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
    }

    #[test]
    fn test_from_error() {
        assert_eq!(
            ErrorCode::from(&ThreadlineError::comments_disabled("x")),
            ErrorCode::CommentsDisabled
        );
        assert_eq!(
            ErrorCode::from(&ThreadlineError::database_operation("x")),
            ErrorCode::InternalServerError
        );
    }
}
