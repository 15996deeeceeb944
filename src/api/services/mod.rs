//! JSON API 服务模块
//!
//! - 查询：用户 / 帖子 / 评论的嵌套视图
//! - 变更：注册、登录、发帖、评论
//! - 健康检查

pub mod error_code;
pub mod health;
mod helpers;
mod mutations;
mod queries;
pub mod routes;
mod types;

pub use types::*;

pub use helpers::{
    api_result, created_response, error_from_threadline, error_response, success_response,
};

pub use error_code::ErrorCode;

pub use health::{AppStartTime, health_check};
pub use mutations::{create_comment, create_post, login, register};
pub use queries::{
    get_comment, get_post, get_user, get_user_by_username, get_user_posts, list_comments,
    list_posts, list_users,
};
pub use routes::ApiContext;
