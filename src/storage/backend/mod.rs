//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
mod mutations;
mod query;
pub mod retry;

use sea_orm::DatabaseConnection;
use strum::AsRefStr;
use tracing::warn;

use crate::config::DatabaseConfig;
use crate::errors::{Result, ThreadlineError};
use crate::storage::Storage;
use crate::storage::models::{Comment, NewComment, Pagination, Post, StorageStats, User};

pub use connection::{connect_generic, connect_sqlite, run_migrations};

/// SQL 方言
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SqlDialect {
    Sqlite,
    Mysql,
    Postgres,
}

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<SqlDialect> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok(SqlDialect::Sqlite)
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok(SqlDialect::Mysql)
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok(SqlDialect::Postgres)
    } else {
        Err(ThreadlineError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    dialect: SqlDialect,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let database_url = config.database_url.trim();
        if database_url.is_empty() {
            return Err(ThreadlineError::database_config(
                "database.database_url 未设置",
            ));
        }

        let dialect = infer_backend_from_url(database_url)?;

        // 根据不同数据库类型配置连接选项
        let db = match dialect {
            SqlDialect::Sqlite => connect_sqlite(database_url).await?,
            SqlDialect::Mysql | SqlDialect::Postgres => {
                connect_generic(database_url, dialect, config).await?
            }
        };

        let storage = SeaOrmStorage {
            db,
            dialect,
            retry_config: retry::RetryConfig::from(config),
        };

        // 运行迁移
        run_migrations(&storage.db).await?;

        warn!("{} Storage initialized.", dialect.as_ref().to_uppercase());
        Ok(storage)
    }
}

#[async_trait::async_trait]
impl Storage for SeaOrmStorage {
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.find_user_by_username(username).await
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        self.insert_user(username, password_hash).await
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.find_user(id).await
    }

    async fn get_all_users(&self, page: Pagination) -> Result<Vec<User>> {
        self.list_users(page).await
    }

    async fn get_posts_by_user_id(&self, user_id: &str, page: Pagination) -> Result<Vec<Post>> {
        self.list_posts(Some(user_id), page).await
    }

    async fn get_all_posts(&self, page: Pagination) -> Result<Vec<Post>> {
        self.list_posts(None, page).await
    }

    async fn get_post_by_id(&self, id: &str) -> Result<Option<Post>> {
        self.find_post(id).await
    }

    async fn create_post(
        &self,
        id: &str,
        text: &str,
        author_id: &str,
        commentable: bool,
    ) -> Result<Post> {
        self.insert_post(id, text, author_id, commentable).await
    }

    async fn get_all_comments(&self, page: Pagination) -> Result<Vec<Comment>> {
        self.list_comments(query::CommentScope::All, page).await
    }

    async fn get_comments_by_post_id(
        &self,
        post_id: &str,
        page: Pagination,
    ) -> Result<Vec<Comment>> {
        self.list_comments(query::CommentScope::TopLevelOf(post_id), page)
            .await
    }

    async fn get_comments_by_parent_id(
        &self,
        parent_id: &str,
        page: Pagination,
    ) -> Result<Vec<Comment>> {
        self.list_comments(query::CommentScope::RepliesTo(parent_id), page)
            .await
    }

    async fn get_comments_by_user_id(
        &self,
        user_id: &str,
        page: Pagination,
    ) -> Result<Vec<Comment>> {
        self.list_comments(query::CommentScope::AuthoredBy(user_id), page)
            .await
    }

    async fn get_comment_by_id(&self, id: &str) -> Result<Option<Comment>> {
        self.find_comment(id).await
    }

    async fn create_comment(&self, new_comment: NewComment) -> Result<Comment> {
        self.insert_comment(new_comment).await
    }

    fn backend_name(&self) -> &str {
        self.dialect.as_ref()
    }

    async fn health_check(&self) -> Result<StorageStats> {
        self.count_rows().await
    }
}
