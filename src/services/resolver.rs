//! Nested read model
//!
//! Every query walks the tree the naive way: fetch the parent, then its
//! children, then the grandchildren, attaching the author at each level.
//! The caller's pagination is applied at every level of the walk.

use std::sync::Arc;

use crate::errors::{Result, ThreadlineError};
use crate::storage::{Comment, Pagination, Post, Storage, User};

use super::views::{CommentView, PostView, UserView};

#[derive(Clone)]
pub struct FeedResolver {
    storage: Arc<dyn Storage>,
}

impl FeedResolver {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn users(&self, page: Pagination) -> Result<Vec<UserView>> {
        let users = self.storage.get_all_users(page).await?;
        let mut views = Vec::with_capacity(users.len());
        for user in users {
            views.push(self.user_view(user, page).await?);
        }
        Ok(views)
    }

    pub async fn user(&self, id: &str, page: Pagination) -> Result<UserView> {
        let user = self
            .storage
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| ThreadlineError::not_found(format!("user {} not found", id)))?;
        self.user_view(user, page).await
    }

    pub async fn user_by_username(&self, username: &str, page: Pagination) -> Result<UserView> {
        let user = self
            .storage
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| ThreadlineError::not_found(format!("user {} not found", username)))?;
        self.user_view(user, page).await
    }

    pub async fn posts(&self, page: Pagination) -> Result<Vec<PostView>> {
        let posts = self.storage.get_all_posts(page).await?;
        self.post_views(posts, page).await
    }

    pub async fn posts_by_user_id(&self, user_id: &str, page: Pagination) -> Result<Vec<PostView>> {
        if self.storage.get_user_by_id(user_id).await?.is_none() {
            return Err(ThreadlineError::not_found(format!(
                "user {} not found",
                user_id
            )));
        }
        let posts = self.storage.get_posts_by_user_id(user_id, page).await?;
        self.post_views(posts, page).await
    }

    pub async fn post(&self, id: &str, page: Pagination) -> Result<PostView> {
        let post = self
            .storage
            .get_post_by_id(id)
            .await?
            .ok_or_else(|| ThreadlineError::not_found(format!("post {} not found", id)))?;
        self.post_view(post, page).await
    }

    pub async fn comments(&self, page: Pagination) -> Result<Vec<CommentView>> {
        let comments = self.storage.get_all_comments(page).await?;
        self.comment_views(comments, page).await
    }

    pub async fn comment(&self, id: &str, page: Pagination) -> Result<CommentView> {
        let comment = self
            .storage
            .get_comment_by_id(id)
            .await?
            .ok_or_else(|| ThreadlineError::not_found(format!("comment {} not found", id)))?;
        self.comment_view(comment, page).await
    }

    async fn author(&self, author_id: &str, owner: &str) -> Result<User> {
        self.storage.get_user_by_id(author_id).await?.ok_or_else(|| {
            ThreadlineError::not_found(format!("author {} of {} not found", author_id, owner))
        })
    }

    async fn user_view(&self, user: User, page: Pagination) -> Result<UserView> {
        let posts = self.storage.get_posts_by_user_id(&user.id, page).await?;
        let posts = self.post_views(posts, page).await?;
        Ok(UserView { user, posts })
    }

    async fn post_views(&self, posts: Vec<Post>, page: Pagination) -> Result<Vec<PostView>> {
        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            views.push(self.post_view(post, page).await?);
        }
        Ok(views)
    }

    async fn post_view(&self, post: Post, page: Pagination) -> Result<PostView> {
        let author = self
            .author(&post.author_id, &format!("post {}", post.id))
            .await?;
        let comments = self.storage.get_comments_by_post_id(&post.id, page).await?;
        let comments = self.comment_views(comments, page).await?;
        Ok(PostView {
            post,
            author,
            comments,
        })
    }

    async fn comment_views(
        &self,
        comments: Vec<Comment>,
        page: Pagination,
    ) -> Result<Vec<CommentView>> {
        let mut views = Vec::with_capacity(comments.len());
        for comment in comments {
            views.push(self.comment_view(comment, page).await?);
        }
        Ok(views)
    }

    /// 评论 + 作者 + 直接回复（回复只展开一层，更深的层级通过 `comment(id)` 继续查询）
    async fn comment_view(&self, comment: Comment, page: Pagination) -> Result<CommentView> {
        let author = self
            .author(&comment.author_id, &format!("comment {}", comment.id))
            .await?;

        let replies = self
            .storage
            .get_comments_by_parent_id(&comment.id, page)
            .await?;
        let mut reply_views = Vec::with_capacity(replies.len());
        for reply in replies {
            let author = self
                .author(&reply.author_id, &format!("comment {}", reply.id))
                .await?;
            reply_views.push(CommentView {
                comment: reply,
                author,
                replies: Vec::new(),
            });
        }

        Ok(CommentView {
            comment,
            author,
            replies: reply_views,
        })
    }
}
