use std::sync::Arc;

use crate::errors::{Result, ThreadlineError};
use crate::storage::{Pagination, Post, Storage};
use crate::utils::non_blank;

#[derive(Clone)]
pub struct PostService {
    storage: Arc<dyn Storage>,
}

impl PostService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Publish a post. `commentable = false` closes it to direct comments.
    pub async fn create_post(&self, author_id: &str, text: &str, commentable: bool) -> Result<Post> {
        if non_blank(text).is_none() {
            return Err(ThreadlineError::validation("post text must not be empty"));
        }
        if self.storage.get_user_by_id(author_id).await?.is_none() {
            // token 仍有效但用户已不存在（例如内存存储重启后）
            return Err(ThreadlineError::unauthorized(format!(
                "user {} no longer exists",
                author_id
            )));
        }

        let id = uuid::Uuid::new_v4().to_string();
        self.storage
            .create_post(&id, text, author_id, commentable)
            .await
    }

    pub async fn get_post_by_id(&self, id: &str) -> Result<Post> {
        self.storage
            .get_post_by_id(id)
            .await?
            .ok_or_else(|| ThreadlineError::not_found(format!("post {} not found", id)))
    }

    pub async fn get_posts_by_user_id(&self, user_id: &str, page: Pagination) -> Result<Vec<Post>> {
        self.storage.get_posts_by_user_id(user_id, page).await
    }

    pub async fn get_all_posts(&self, page: Pagination) -> Result<Vec<Post>> {
        self.storage.get_all_posts(page).await
    }
}
