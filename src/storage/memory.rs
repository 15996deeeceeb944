//! In-memory storage backend
//!
//! Three insertion-ordered tables behind one `RwLock`. Used by tests and by
//! `database.backend = "memory"` for local runs; nothing survives a restart.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use super::Storage;
use super::models::{Comment, CommentPlacement, NewComment, Pagination, Post, StorageStats, User};
use crate::errors::{Result, ThreadlineError};

trait Row: Clone {
    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
}

impl Row for User {
    fn id(&self) -> &str {
        &self.id
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Row for Post {
    fn id(&self) -> &str {
        &self.id
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Row for Comment {
    fn id(&self) -> &str {
        &self.id
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

struct Table<T> {
    rows: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T: Row> Table<T> {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.rows[i])
    }

    fn insert(&mut self, row: T) -> Result<()> {
        if self.index.contains_key(row.id()) {
            return Err(ThreadlineError::database_operation(format!(
                "duplicate primary key: {}",
                row.id()
            )));
        }
        self.index.insert(row.id().to_string(), self.rows.len());
        self.rows.push(row);
        Ok(())
    }

    fn select(&self, page: Pagination, pred: impl Fn(&T) -> bool) -> Vec<T> {
        let mut matched: Vec<T> = self.rows.iter().filter(|r| pred(r)).cloned().collect();
        // 插入顺序基本已按时间排列，这里只处理同一时刻的 id 次序
        matched.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        page.apply(matched)
    }

    fn len(&self) -> u64 {
        self.rows.len() as u64
    }
}

struct Tables {
    users: Table<User>,
    // username -> user id
    usernames: HashMap<String, String>,
    posts: Table<Post>,
    comments: Table<Comment>,
}

pub struct MemoryStorage {
    inner: RwLock<Tables>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Tables {
                users: Table::new(),
                usernames: HashMap::new(),
                posts: Table::new(),
                comments: Table::new(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.inner.read();
        Ok(tables
            .usernames
            .get(username)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let mut tables = self.inner.write();
        if tables.usernames.contains_key(username) {
            return Err(ThreadlineError::user_already_exists(format!(
                "user with username {} already exists",
                username
            )));
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.clone())?;
        tables
            .usernames
            .insert(user.username.clone(), user.id.clone());
        debug!("User created: {}", user.id);
        Ok(user)
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.inner.read().users.get(id).cloned())
    }

    async fn get_all_users(&self, page: Pagination) -> Result<Vec<User>> {
        Ok(self.inner.read().users.select(page, |_| true))
    }

    async fn get_posts_by_user_id(&self, user_id: &str, page: Pagination) -> Result<Vec<Post>> {
        Ok(self
            .inner
            .read()
            .posts
            .select(page, |p| p.author_id == user_id))
    }

    async fn get_all_posts(&self, page: Pagination) -> Result<Vec<Post>> {
        Ok(self.inner.read().posts.select(page, |_| true))
    }

    async fn get_post_by_id(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.inner.read().posts.get(id).cloned())
    }

    async fn create_post(
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
        self.inner.write().posts.insert(post.clone())?;
        debug!("Post created: {}", post.id);
        Ok(post)
    }

    async fn get_all_comments(&self, page: Pagination) -> Result<Vec<Comment>> {
        Ok(self.inner.read().comments.select(page, |_| true))
    }

    async fn get_comments_by_post_id(
        &self,
        post_id: &str,
        page: Pagination,
    ) -> Result<Vec<Comment>> {
        Ok(self
            .inner
            .read()
            .comments
            .select(page, |c| c.post_id == post_id && !c.is_reply()))
    }

    async fn get_comments_by_parent_id(
        &self,
        parent_id: &str,
        page: Pagination,
    ) -> Result<Vec<Comment>> {
        Ok(self.inner.read().comments.select(page, |c| {
            c.parent_comment_id.as_deref() == Some(parent_id)
        }))
    }

    async fn get_comments_by_user_id(
        &self,
        user_id: &str,
        page: Pagination,
    ) -> Result<Vec<Comment>> {
        Ok(self
            .inner
            .read()
            .comments
            .select(page, |c| c.author_id == user_id))
    }

    async fn get_comment_by_id(&self, id: &str) -> Result<Option<Comment>> {
        Ok(self.inner.read().comments.get(id).cloned())
    }

    async fn create_comment(&self, new_comment: NewComment) -> Result<Comment> {
        // 判断与插入在同一把写锁下完成
        let mut tables = self.inner.write();
        let placement = CommentPlacement::resolve(
            &new_comment.item_id,
            tables.posts.get(&new_comment.item_id),
            tables.comments.get(&new_comment.item_id),
        )?;

        let comment = new_comment.into_comment(placement, Utc::now());
        tables.comments.insert(comment.clone())?;
        debug!(
            "Comment created: {} (post {}, parent {:?})",
            comment.id, comment.post_id, comment.parent_comment_id
        );
        Ok(comment)
    }

    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> Result<StorageStats> {
        let tables = self.inner.read();
        Ok(StorageStats {
            users: tables.users.len(),
            posts: tables.posts.len(),
            comments: tables.comments.len(),
        })
    }
}
