use std::sync::Arc;

use crate::errors::{Result, ThreadlineError};
use crate::storage::{Comment, NewComment, Pagination, Storage};
use crate::utils::non_blank;

pub const COMMENT_MAX_CHARS: usize = 2000;

#[derive(Clone)]
pub struct CommentService {
    storage: Arc<dyn Storage>,
}

impl CommentService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Comment on a post, or reply to a comment, depending on what `item_id` names.
    pub async fn create_comment(&self, author_id: &str, item_id: &str, text: &str) -> Result<Comment> {
        let chars = text.chars().count();
        if text.trim().is_empty() || chars > COMMENT_MAX_CHARS {
            return Err(ThreadlineError::validation(format!(
                "comment must be 1 to {} characters",
                COMMENT_MAX_CHARS
            )));
        }
        if non_blank(item_id).is_none() {
            return Err(ThreadlineError::validation("item_id must not be empty"));
        }
        if self.storage.get_user_by_id(author_id).await?.is_none() {
            return Err(ThreadlineError::unauthorized(format!(
                "user {} no longer exists",
                author_id
            )));
        }

        self.storage
            .create_comment(NewComment {
                id: uuid::Uuid::new_v4().to_string(),
                comment: text.to_string(),
                author_id: author_id.to_string(),
                item_id: item_id.to_string(),
            })
            .await
    }

    pub async fn get_all_comments(&self, page: Pagination) -> Result<Vec<Comment>> {
        self.storage.get_all_comments(page).await
    }

    pub async fn get_comment_by_id(&self, id: &str) -> Result<Comment> {
        self.storage
            .get_comment_by_id(id)
            .await?
            .ok_or_else(|| ThreadlineError::not_found(format!("comment {} not found", id)))
    }

    pub async fn get_comments_by_post_id(
        &self,
        post_id: &str,
        page: Pagination,
    ) -> Result<Vec<Comment>> {
        self.storage.get_comments_by_post_id(post_id, page).await
    }

    pub async fn get_comments_by_parent_id(
        &self,
        parent_id: &str,
        page: Pagination,
    ) -> Result<Vec<Comment>> {
        self.storage.get_comments_by_parent_id(parent_id, page).await
    }

    pub async fn get_comments_by_user_id(
        &self,
        user_id: &str,
        page: Pagination,
    ) -> Result<Vec<Comment>> {
        self.storage.get_comments_by_user_id(user_id, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    /// 返回 (service, commenter id, replier id)
    async fn setup() -> (CommentService, String, String) {
        let storage = Arc::new(MemoryStorage::new());
        let owner = storage.create_user("owner", "h").await.unwrap();
        let commenter = storage.create_user("commenter", "h").await.unwrap();
        let replier = storage.create_user("replier", "h").await.unwrap();
        storage.create_post("open", "open", &owner.id, true).await.unwrap();
        storage.create_post("closed", "closed", &owner.id, false).await.unwrap();
        (CommentService::new(storage), commenter.id, replier.id)
    }

    #[tokio::test]
    async fn test_length_limits() {
        let (svc, u2, _) = setup().await;
        assert!(svc.create_comment(&u2, "open", "").await.is_err());
        let long = "x".repeat(COMMENT_MAX_CHARS + 1);
        assert!(svc.create_comment(&u2, "open", &long).await.is_err());
        let max = "x".repeat(COMMENT_MAX_CHARS);
        assert!(svc.create_comment(&u2, "open", &max).await.is_ok());
    }

    #[tokio::test]
    async fn test_closed_post_and_replies() {
        let (svc, u2, u3) = setup().await;
        assert!(matches!(
            svc.create_comment(&u2, "closed", "hi").await.unwrap_err(),
            ThreadlineError::CommentsDisabled(_)
        ));

        let top = svc.create_comment(&u2, "open", "top").await.unwrap();
        let reply = svc.create_comment(&u3, &top.id, "reply").await.unwrap();
        assert_eq!(reply.parent_comment_id.as_deref(), Some(top.id.as_str()));
        assert_eq!(reply.post_id, "open");

        let replies = svc
            .get_comments_by_parent_id(&top.id, Pagination::default())
            .await
            .unwrap();
        assert_eq!(replies, vec![reply]);
    }

    #[tokio::test]
    async fn test_unknown_item() {
        let (svc, u2, _) = setup().await;
        assert!(matches!(
            svc.create_comment(&u2, "ghost", "hi").await.unwrap_err(),
            ThreadlineError::ItemNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_unknown_author_rejected() {
        let (svc, _, _) = setup().await;
        assert!(matches!(
            svc.create_comment("ghost-user", "open", "hi").await.unwrap_err(),
            ThreadlineError::Unauthorized(_)
        ));
        assert!(svc
            .get_comments_by_post_id("open", Pagination::default())
            .await
            .unwrap()
            .is_empty());
    }
}
