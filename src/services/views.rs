use serde::Serialize;

use crate::storage::{Comment, Post, User};

/// A user with their posts
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    #[serde(flatten)]
    pub user: User,
    pub posts: Vec<PostView>,
}

/// A post with its author and top-level comments
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub author: User,
    pub comments: Vec<CommentView>,
}

/// A comment with its author and direct replies
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: User,
    pub replies: Vec<CommentView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenView {
    pub token: String,
    pub token_type: &'static str,
    /// seconds
    pub expires_in: u64,
}

impl TokenView {
    pub fn bearer(token: String, token_hours: u64) -> Self {
        Self {
            token,
            token_type: "Bearer",
            expires_in: token_hours * 3600,
        }
    }
}
