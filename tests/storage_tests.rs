//! Storage backend tests
//!
//! The same scenarios run against `MemoryStorage` and against `SeaOrmStorage`
//! over a temporary SQLite database.

use std::collections::HashSet;
use std::sync::Arc;

use tempfile::TempDir;
use threadline::config::{DatabaseConfig, StorageBackendKind};
use threadline::errors::ThreadlineError;
use threadline::storage::backend::{SqlDialect, infer_backend_from_url};
use threadline::storage::{
    MemoryStorage, NewComment, Pagination, SeaOrmStorage, Storage, StorageFactory,
};

/// 创建临时 SQLite 数据库的存储实例
async fn create_temp_sqlite() -> (Arc<dyn Storage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let config = DatabaseConfig {
        backend: StorageBackendKind::Sql,
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..Default::default()
    };

    let storage = SeaOrmStorage::new(&config)
        .await
        .expect("Failed to create storage");
    (Arc::new(storage), temp_dir)
}

fn memory() -> Arc<dyn Storage> {
    Arc::new(MemoryStorage::new())
}

fn new_comment(id: &str, author_id: &str, item_id: &str) -> NewComment {
    NewComment {
        id: id.to_string(),
        comment: format!("comment {}", id),
        author_id: author_id.to_string(),
        item_id: item_id.to_string(),
    }
}

// =============================================================================
// 共享场景
// =============================================================================

async fn users_scenario(storage: Arc<dyn Storage>) {
    let alice = storage.create_user("alice", "hash-a").await.unwrap();
    assert!(!alice.id.is_empty());
    assert_eq!(alice.username, "alice");

    let by_id = storage.get_user_by_id(&alice.id).await.unwrap().unwrap();
    assert_eq!(by_id.username, "alice");
    assert_eq!(by_id.password_hash, "hash-a");

    let by_name = storage.get_user_by_username("alice").await.unwrap().unwrap();
    assert_eq!(by_name.id, alice.id);

    assert!(storage.get_user_by_id("nope").await.unwrap().is_none());
    assert!(storage.get_user_by_username("bob").await.unwrap().is_none());

    let err = storage.create_user("alice", "hash-b").await.unwrap_err();
    assert!(matches!(err, ThreadlineError::UserAlreadyExists(_)));

    storage.create_user("bob", "hash-b").await.unwrap();
    let all = storage.get_all_users(Pagination::default()).await.unwrap();
    assert_eq!(all.len(), 2);
}

async fn comment_tree_scenario(storage: Arc<dyn Storage>) {
    let author = storage.create_user("author", "h").await.unwrap();
    let open = storage
        .create_post("post-open", "hello", &author.id, true)
        .await
        .unwrap();
    let closed = storage
        .create_post("post-closed", "quiet", &author.id, false)
        .await
        .unwrap();
    assert!(open.commentable);
    assert!(!closed.commentable);

    // 顶层评论
    let top = storage
        .create_comment(new_comment("c-top", &author.id, &open.id))
        .await
        .unwrap();
    assert_eq!(top.post_id, open.id);
    assert_eq!(top.parent_comment_id, None);

    // 回复评论：post_id 继承自父评论
    let reply = storage
        .create_comment(new_comment("c-reply", &author.id, &top.id))
        .await
        .unwrap();
    assert_eq!(reply.post_id, open.id);
    assert_eq!(reply.parent_comment_id.as_deref(), Some("c-top"));

    // 回复的回复仍然挂在同一个帖子下
    let nested = storage
        .create_comment(new_comment("c-nested", &author.id, &reply.id))
        .await
        .unwrap();
    assert_eq!(nested.post_id, open.id);
    assert_eq!(nested.parent_comment_id.as_deref(), Some("c-reply"));

    let err = storage
        .create_comment(new_comment("c-closed", &author.id, &closed.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ThreadlineError::CommentsDisabled(_)));

    let err = storage
        .create_comment(new_comment("c-orphan", &author.id, "missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, ThreadlineError::ItemNotFound(_)));

    // 失败的插入不应留下数据
    assert!(storage.get_comment_by_id("c-closed").await.unwrap().is_none());
    assert!(storage.get_comment_by_id("c-orphan").await.unwrap().is_none());

    let all = Pagination::default();
    let top_level = storage
        .get_comments_by_post_id(&open.id, all)
        .await
        .unwrap();
    assert_eq!(top_level.len(), 1);
    assert_eq!(top_level[0].id, "c-top");

    let replies = storage.get_comments_by_parent_id("c-top", all).await.unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].id, "c-reply");

    let by_user = storage
        .get_comments_by_user_id(&author.id, all)
        .await
        .unwrap();
    assert_eq!(by_user.len(), 3);

    let posts = storage.get_posts_by_user_id(&author.id, all).await.unwrap();
    assert_eq!(posts.len(), 2);

    let stats = storage.health_check().await.unwrap();
    assert_eq!(stats.users, 1);
    assert_eq!(stats.posts, 2);
    assert_eq!(stats.comments, 3);
}

async fn pagination_scenario(storage: Arc<dyn Storage>) {
    let author = storage.create_user("pager", "h").await.unwrap();
    for i in 0..5 {
        storage
            .create_post(&format!("p{}", i), "text", &author.id, true)
            .await
            .unwrap();
    }

    let first = storage
        .get_all_posts(Pagination::new(Some(2), None))
        .await
        .unwrap();
    let second = storage
        .get_all_posts(Pagination::new(Some(2), Some(2)))
        .await
        .unwrap();
    let third = storage
        .get_all_posts(Pagination::new(Some(2), Some(4)))
        .await
        .unwrap();
    let past_end = storage
        .get_all_posts(Pagination::new(Some(2), Some(10)))
        .await
        .unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_eq!(third.len(), 1);
    assert!(past_end.is_empty());

    let ids: HashSet<String> = first
        .iter()
        .chain(&second)
        .chain(&third)
        .map(|p| p.id.clone())
        .collect();
    assert_eq!(ids.len(), 5);

    let zero = storage
        .get_all_posts(Pagination::new(Some(0), None))
        .await
        .unwrap();
    assert!(zero.is_empty());
}

// =============================================================================
// MemoryStorage
// =============================================================================

#[cfg(test)]
mod memory_tests {
    use super::*;

    #[tokio::test]
    async fn test_users() {
        users_scenario(memory()).await;
    }

    #[tokio::test]
    async fn test_comment_tree() {
        comment_tree_scenario(memory()).await;
    }

    #[tokio::test]
    async fn test_pagination() {
        pagination_scenario(memory()).await;
    }

    #[tokio::test]
    async fn test_concurrent_replies_all_land() {
        let storage = memory();
        let author = storage.create_user("busy", "h").await.unwrap();
        storage
            .create_post("post", "text", &author.id, true)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..20 {
            let storage = storage.clone();
            let author_id = author.id.clone();
            handles.push(tokio::spawn(async move {
                storage
                    .create_comment(new_comment(&format!("c{}", i), &author_id, "post"))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let comments = storage
            .get_comments_by_post_id("post", Pagination::default())
            .await
            .unwrap();
        assert_eq!(comments.len(), 20);
    }
}

// =============================================================================
// SeaOrmStorage (SQLite)
// =============================================================================

#[cfg(test)]
mod sqlite_tests {
    use super::*;

    #[tokio::test]
    async fn test_users() {
        let (storage, _dir) = create_temp_sqlite().await;
        users_scenario(storage).await;
    }

    #[tokio::test]
    async fn test_comment_tree() {
        let (storage, _dir) = create_temp_sqlite().await;
        comment_tree_scenario(storage).await;
    }

    #[tokio::test]
    async fn test_pagination() {
        let (storage, _dir) = create_temp_sqlite().await;
        pagination_scenario(storage).await;
    }

    #[tokio::test]
    async fn test_post_requires_existing_author() {
        let (storage, _dir) = create_temp_sqlite().await;
        let err = storage
            .create_post("p", "text", "ghost", true)
            .await
            .unwrap_err();
        assert!(matches!(err, ThreadlineError::DatabaseOperation(_)));
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("reopen.db");
        let config = DatabaseConfig {
            database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
            ..Default::default()
        };

        {
            let storage = SeaOrmStorage::new(&config).await.unwrap();
            storage.create_user("keeper", "h").await.unwrap();
        }

        let storage = SeaOrmStorage::new(&config).await.unwrap();
        assert!(
            storage
                .get_user_by_username("keeper")
                .await
                .unwrap()
                .is_some()
        );
        assert_eq!(storage.backend_name(), "sqlite");
    }
}

// =============================================================================
// Factory 与 URL 推断
// =============================================================================

#[cfg(test)]
mod factory_tests {
    use super::*;

    #[tokio::test]
    async fn test_factory_builds_memory_backend() {
        let config = DatabaseConfig {
            backend: StorageBackendKind::Memory,
            ..Default::default()
        };
        let storage = StorageFactory::create_with(&config).await.unwrap();
        assert_eq!(storage.backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_factory_builds_sqlite_backend() {
        let temp_dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            backend: StorageBackendKind::Sql,
            database_url: temp_dir.path().join("factory.db").display().to_string(),
            ..Default::default()
        };
        let storage = StorageFactory::create_with(&config).await.unwrap();
        assert_eq!(storage.backend_name(), "sqlite");
    }

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(
            infer_backend_from_url("sqlite://data.db").unwrap(),
            SqlDialect::Sqlite
        );
        assert_eq!(
            infer_backend_from_url("postgres://u:p@localhost/db").unwrap(),
            SqlDialect::Postgres
        );
        assert_eq!(
            infer_backend_from_url("mysql://u:p@localhost/db").unwrap(),
            SqlDialect::Mysql
        );
    }
}
