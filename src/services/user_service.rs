//! User registration, login and lookups

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::jwt::JwtService;
use crate::errors::{Result, ThreadlineError};
use crate::storage::{Pagination, Storage, User};
use crate::utils::password::{hash_password, verify_password};

pub const USERNAME_MAX_CHARS: usize = 20;

#[derive(Clone)]
pub struct UserService {
    storage: Arc<dyn Storage>,
    jwt: Arc<JwtService>,
}

impl UserService {
    pub fn new(storage: Arc<dyn Storage>, jwt: Arc<JwtService>) -> Self {
        Self { storage, jwt }
    }

    pub async fn get_all_users(&self, page: Pagination) -> Result<Vec<User>> {
        self.storage.get_all_users(page).await
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<User> {
        self.storage
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| ThreadlineError::not_found(format!("user {} not found", id)))
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<User> {
        self.storage
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| ThreadlineError::not_found(format!("user {} not found", username)))
    }

    /// 注册新用户，密码以 Argon2id 哈希保存
    pub async fn register(&self, username: &str, password: &str) -> Result<User> {
        validate_username(username)?;
        if password.is_empty() {
            return Err(ThreadlineError::validation("password must not be empty"));
        }

        if self.storage.get_user_by_username(username).await?.is_some() {
            return Err(ThreadlineError::user_already_exists(format!(
                "user with username {} already exists",
                username
            )));
        }

        let password_hash = hash_password(password)?;
        // 并发注册同名用户时由存储层的唯一约束兜底
        let user = self.storage.create_user(username, &password_hash).await?;
        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// 校验用户名密码，返回 access token
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let Some(user) = self.storage.get_user_by_username(username).await? else {
            warn!("Login failed: unknown user {}", username);
            return Err(invalid_credentials());
        };

        if !verify_password(password, &user.password_hash)? {
            warn!("Login failed: wrong password for {}", username);
            return Err(invalid_credentials());
        }

        self.jwt.generate_token(&user.id)
    }

    pub fn token_hours(&self) -> u64 {
        self.jwt.token_hours()
    }
}

fn invalid_credentials() -> ThreadlineError {
    ThreadlineError::invalid_credentials("invalid username or password")
}

fn validate_username(username: &str) -> Result<()> {
    let chars = username.chars().count();
    if username.trim().is_empty() || chars > USERNAME_MAX_CHARS {
        return Err(ThreadlineError::validation(format!(
            "username must be 1 to {} characters",
            USERNAME_MAX_CHARS
        )));
    }
    Ok(())
}
