//! API 请求 / 响应类型定义

use serde::{Deserialize, Serialize};

use crate::storage::Pagination;

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// `?limit=&offset=`
#[derive(Deserialize, Clone, Copy, Debug, Default)]
pub struct PageQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl PageQuery {
    /// 转换为分页参数，`limit` 不超过 `max_page_size`
    pub fn to_pagination(self, max_page_size: u64) -> Pagination {
        Pagination::new(self.limit, self.offset).capped(max_page_size)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CreatePostRequest {
    pub text: String,
    #[serde(default = "default_commentable")]
    pub commentable: bool,
}

fn default_commentable() -> bool {
    true
}

/// `item_id` is a post id (top-level comment) or a comment id (reply).
#[derive(Deserialize, Clone, Debug)]
pub struct CreateCommentRequest {
    pub comment: String,
    pub item_id: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub storage: HealthStorageCheck,
    pub response_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commentable_defaults_true() {
        let req: CreatePostRequest = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();
        assert!(req.commentable);
        let req: CreatePostRequest =
            serde_json::from_str(r#"{"text":"hi","commentable":false}"#).unwrap();
        assert!(!req.commentable);
    }

    #[test]
    fn test_empty_data_is_omitted() {
        let json = serde_json::to_string(&ApiResponse::<()> {
            code: 2002,
            message: "Invalid token".to_string(),
            data: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"code":2002,"message":"Invalid token"}"#);
    }

    #[test]
    fn test_page_query_capping() {
        let page = PageQuery {
            limit: Some(1000),
            offset: Some(3),
        }
        .to_pagination(50);
        assert_eq!(page, Pagination::new(Some(50), Some(3)));
    }
}
