use std::sync::Arc;

use tracing::info;

use crate::config::{DatabaseConfig, StorageBackendKind};
use crate::errors::Result;

pub mod backend;
pub mod memory;
pub mod models;

pub use backend::SeaOrmStorage;
pub use memory::MemoryStorage;
pub use models::{
    Comment, CommentPlacement, NewComment, Pagination, Post, StorageStats, User,
};

/// 存储抽象：用户、帖子、评论三张表
///
/// 按 id / username 查找时，不存在返回 `Ok(None)`；
/// 列表按 `created_at`、`id` 升序排列，分页结果稳定。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    // users
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User>;
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn get_all_users(&self, page: Pagination) -> Result<Vec<User>>;

    // posts
    async fn get_posts_by_user_id(&self, user_id: &str, page: Pagination) -> Result<Vec<Post>>;
    async fn get_all_posts(&self, page: Pagination) -> Result<Vec<Post>>;
    async fn get_post_by_id(&self, id: &str) -> Result<Option<Post>>;
    async fn create_post(
        &self,
        id: &str,
        text: &str,
        author_id: &str,
        commentable: bool,
    ) -> Result<Post>;

    // comments
    async fn get_all_comments(&self, page: Pagination) -> Result<Vec<Comment>>;
    /// Top-level comments of a post; replies are reached through
    /// [`Storage::get_comments_by_parent_id`].
    async fn get_comments_by_post_id(&self, post_id: &str, page: Pagination)
    -> Result<Vec<Comment>>;
    async fn get_comments_by_parent_id(
        &self,
        parent_id: &str,
        page: Pagination,
    ) -> Result<Vec<Comment>>;
    async fn get_comments_by_user_id(&self, user_id: &str, page: Pagination)
    -> Result<Vec<Comment>>;
    async fn get_comment_by_id(&self, id: &str) -> Result<Option<Comment>>;
    /// 判断 `item_id` 是帖子还是评论，再插入，两步在同一临界区 / 事务内完成
    async fn create_comment(&self, new_comment: NewComment) -> Result<Comment>;

    fn backend_name(&self) -> &str;
    async fn health_check(&self) -> Result<StorageStats>;
}

pub struct StorageFactory;

impl StorageFactory {
    /// Build the backend named in the global `database` config section.
    pub async fn create() -> Result<Arc<dyn Storage>> {
        let config = crate::config::get_config();
        Self::create_with(&config.database).await
    }

    pub async fn create_with(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
        let storage: Arc<dyn Storage> = match config.backend {
            StorageBackendKind::Memory => Arc::new(MemoryStorage::new()),
            StorageBackendKind::Sql => Arc::new(SeaOrmStorage::new(config).await?),
        };
        info!("Using storage backend: {}", storage.backend_name());
        Ok(storage)
    }
}
