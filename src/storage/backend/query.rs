//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use super::SeaOrmStorage;
use super::converters::{model_to_comment, model_to_post, model_to_user};
use super::retry::with_retry;
use crate::errors::Result;
use crate::storage::models::{Comment, Pagination, Post, StorageStats, User};

use migration::entities::{comment, post, user};

/// 评论列表的过滤维度
#[derive(Debug, Clone, Copy)]
pub(super) enum CommentScope<'a> {
    All,
    /// 帖子下的顶层评论（不含回复）
    TopLevelOf(&'a str),
    RepliesTo(&'a str),
    AuthoredBy(&'a str),
}

impl SeaOrmStorage {
    pub(super) async fn find_user(&self, id: &str) -> Result<Option<User>> {
        let db = &self.db;
        let model = with_retry("find_user", self.retry_config, || {
            user::Entity::find_by_id(id.to_string()).one(db)
        })
        .await?;
        Ok(model.map(model_to_user))
    }

    pub(super) async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let db = &self.db;
        let model = with_retry("find_user_by_username", self.retry_config, || {
            user::Entity::find()
                .filter(user::Column::Username.eq(username))
                .one(db)
        })
        .await?;
        Ok(model.map(model_to_user))
    }

    pub(super) async fn list_users(&self, page: Pagination) -> Result<Vec<User>> {
        let db = &self.db;
        let models = with_retry("list_users", self.retry_config, || {
            user::Entity::find()
                .order_by_asc(user::Column::CreatedAt)
                .order_by_asc(user::Column::Id)
                .offset(page.offset)
                .limit(page.limit)
                .all(db)
        })
        .await?;
        Ok(models.into_iter().map(model_to_user).collect())
    }

    pub(super) async fn find_post(&self, id: &str) -> Result<Option<Post>> {
        let db = &self.db;
        let model = with_retry("find_post", self.retry_config, || {
            post::Entity::find_by_id(id.to_string()).one(db)
        })
        .await?;
        Ok(model.map(model_to_post))
    }

    pub(super) async fn list_posts(
        &self,
        author_id: Option<&str>,
        page: Pagination,
    ) -> Result<Vec<Post>> {
        let db = &self.db;
        let models = with_retry("list_posts", self.retry_config, || {
            let mut query = post::Entity::find();
            if let Some(author_id) = author_id {
                query = query.filter(post::Column::AuthorId.eq(author_id));
            }
            query
                .order_by_asc(post::Column::CreatedAt)
                .order_by_asc(post::Column::Id)
                .offset(page.offset)
                .limit(page.limit)
                .all(db)
        })
        .await?;
        Ok(models.into_iter().map(model_to_post).collect())
    }

    pub(super) async fn find_comment(&self, id: &str) -> Result<Option<Comment>> {
        let db = &self.db;
        let model = with_retry("find_comment", self.retry_config, || {
            comment::Entity::find_by_id(id.to_string()).one(db)
        })
        .await?;
        Ok(model.map(model_to_comment))
    }

    pub(super) async fn list_comments(
        &self,
        scope: CommentScope<'_>,
        page: Pagination,
    ) -> Result<Vec<Comment>> {
        let db = &self.db;
        let models = with_retry("list_comments", self.retry_config, || {
            let query = match scope {
                CommentScope::All => comment::Entity::find(),
                CommentScope::TopLevelOf(post_id) => comment::Entity::find()
                    .filter(comment::Column::PostId.eq(post_id))
                    .filter(comment::Column::ParentCommentId.is_null()),
                CommentScope::RepliesTo(parent_id) => comment::Entity::find()
                    .filter(comment::Column::ParentCommentId.eq(parent_id)),
                CommentScope::AuthoredBy(author_id) => comment::Entity::find()
                    .filter(comment::Column::AuthorId.eq(author_id)),
            };
            query
                .order_by_asc(comment::Column::CreatedAt)
                .order_by_asc(comment::Column::Id)
                .offset(page.offset)
                .limit(page.limit)
                .all(db)
        })
        .await?;
        Ok(models.into_iter().map(model_to_comment).collect())
    }

    pub(super) async fn count_rows(&self) -> Result<StorageStats> {
        let db = &self.db;
        let users = user::Entity::find().count(db).await?;
        let posts = post::Entity::find().count(db).await?;
        let comments = comment::Entity::find().count(db).await?;
        Ok(StorageStats {
            users,
            posts,
            comments,
        })
    }
}
