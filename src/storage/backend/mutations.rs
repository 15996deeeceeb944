//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use chrono::Utc;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, SqlErr, TransactionTrait};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{
    comment_to_active_model, model_to_comment, model_to_post, post_to_active_model,
    user_to_active_model,
};
use super::retry::with_retry;
use crate::errors::{Result, ThreadlineError};
use crate::storage::models::{Comment, CommentPlacement, NewComment, Post, User};

use migration::entities::{comment, post, user};

impl SeaOrmStorage {
    pub(super) async fn insert_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };

        let db = &self.db;
        with_retry("insert_user", self.retry_config, || {
            user::Entity::insert(user_to_active_model(&user)).exec(db)
        })
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ThreadlineError::user_already_exists(
                format!("user with username {} already exists", username),
            ),
            _ => ThreadlineError::database_operation(format!("创建用户失败: {}", e)),
        })?;

        info!("User registered: {} ({})", user.username, user.id);
        Ok(user)
    }

    pub(super) async fn insert_post(
        &self,
        id: &str,
        text: &str,
        author_id: &str,
        commentable: bool,
    ) -> Result<Post> {
        let post = Post {
            id: id.to_string(),
            text: text.to_string(),
            author_id: author_id.to_string(),
            commentable,
            created_at: Utc::now(),
        };

        let db = &self.db;
        with_retry("insert_post", self.retry_config, || {
            post::Entity::insert(post_to_active_model(&post)).exec(db)
        })
        .await
        .map_err(|e| ThreadlineError::database_operation(format!("创建帖子失败: {}", e)))?;

        debug!("Post created: {}", post.id);
        Ok(post)
    }

    /// 在一个事务内判断 `item_id` 的归属并插入评论
    ///
    /// 外层 `Result` 只承载可重试的数据库错误，
    /// 放置失败（帖子关闭评论、条目不存在）作为内层错误原样返回。
    pub(super) async fn insert_comment(&self, new_comment: NewComment) -> Result<Comment> {
        let db = &self.db;
        let outcome = with_retry("insert_comment", self.retry_config, || {
            place_and_insert(db, new_comment.clone())
        })
        .await
        .map_err(|e| ThreadlineError::database_operation(format!("创建评论失败: {}", e)))?;

        let comment = outcome?;
        debug!(
            "Comment created: {} (post {}, parent {:?})",
            comment.id, comment.post_id, comment.parent_comment_id
        );
        Ok(comment)
    }
}

async fn place_and_insert(
    db: &DatabaseConnection,
    new_comment: NewComment,
) -> std::result::Result<Result<Comment>, DbErr> {
    let txn = db.begin().await?;
    let item_id = new_comment.item_id.clone();

    let post = post::Entity::find_by_id(item_id.clone())
        .one(&txn)
        .await?
        .map(model_to_post);
    // 帖子优先；只有不是帖子时才查评论表
    let parent = match post {
        Some(_) => None,
        None => comment::Entity::find_by_id(item_id.clone())
            .one(&txn)
            .await?
            .map(model_to_comment),
    };

    let placement = match CommentPlacement::resolve(&item_id, post.as_ref(), parent.as_ref()) {
        Ok(placement) => placement,
        Err(e) => {
            txn.rollback().await?;
            return Ok(Err(e));
        }
    };

    let comment = new_comment.into_comment(placement, Utc::now());
    comment::Entity::insert(comment_to_active_model(&comment))
        .exec(&txn)
        .await?;
    txn.commit().await?;

    Ok(Ok(comment))
}
