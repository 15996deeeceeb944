use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ThreadlineError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Argon2id PHC string，永远不会序列化到响应中
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub commentable: bool,
    pub created_at: DateTime<Utc>,
}

/// A node of the comment tree.
///
/// `post_id` is always the owning post, replies included. `parent_comment_id`
/// is only set when the comment answers another comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: String,
    pub comment: String,
    pub author_id: String,
    pub post_id: String,
    pub parent_comment_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_comment_id.is_some()
    }
}

/// 创建评论的输入，`item_id` 可能是 post id 也可能是 comment id
#[derive(Debug, Clone)]
pub struct NewComment {
    pub id: String,
    pub comment: String,
    pub author_id: String,
    pub item_id: String,
}

impl NewComment {
    pub fn into_comment(self, placement: CommentPlacement, created_at: DateTime<Utc>) -> Comment {
        Comment {
            id: self.id,
            comment: self.comment,
            author_id: self.author_id,
            post_id: placement.post_id,
            parent_comment_id: placement.parent_comment_id,
            created_at,
        }
    }
}

/// Where a new comment lands in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentPlacement {
    pub post_id: String,
    pub parent_comment_id: Option<String>,
}

impl CommentPlacement {
    /// Decide placement from the lookups of `item_id` in both tables.
    ///
    /// A post match wins over a comment match. Replies are accepted even when
    /// the owning post has comments turned off; only direct comments on such
    /// a post are rejected.
    pub fn resolve(item_id: &str, post: Option<&Post>, parent: Option<&Comment>) -> Result<Self> {
        match (post, parent) {
            (Some(post), _) if post.commentable => Ok(Self {
                post_id: post.id.clone(),
                parent_comment_id: None,
            }),
            (Some(_), _) => Err(ThreadlineError::comments_disabled(
                "author turned off comments under this post",
            )),
            (None, Some(parent)) => Ok(Self {
                post_id: parent.post_id.clone(),
                parent_comment_id: Some(item_id.to_string()),
            }),
            (None, None) => Err(ThreadlineError::item_not_found(format!(
                "no post or comment with id {}",
                item_id
            ))),
        }
    }
}

/// `limit` / `offset` 分页参数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Pagination {
    pub fn new(limit: Option<u64>, offset: Option<u64>) -> Self {
        Self { limit, offset }
    }

    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }

    /// Clamp `limit` to `max`. A missing limit becomes `max`.
    pub fn capped(self, max: u64) -> Self {
        Self {
            limit: Some(self.limit.map_or(max, |l| l.min(max))),
            offset: self.offset,
        }
    }

    /// 对已排序的结果切片
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let iter = items.into_iter().skip(offset);
        match self.limit {
            Some(limit) => iter
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .collect(),
            None => iter.collect(),
        }
    }
}

/// 存储健康检查结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct StorageStats {
    pub users: u64,
    pub posts: u64,
    pub comments: u64,
}
