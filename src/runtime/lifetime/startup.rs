use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::jwt::JwtService;
use crate::api::services::ApiContext;
use crate::config::get_config;
use crate::storage::{Storage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub api: ApiContext,
}

/// 准备服务器启动的上下文
/// 包括存储后端和 API 路由上下文（内含 JWT 签名器）
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    // sqlx 的 rustls 连接（PostgreSQL / MySQL TLS）需要进程级 crypto provider
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install rustls crypto provider: {:?}", e))?;

    let config = get_config();

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;

    let stats = storage
        .health_check()
        .await
        .context("Storage is not reachable")?;
    debug!(
        "Storage holds {} users, {} posts, {} comments",
        stats.users, stats.posts, stats.comments
    );

    let jwt = Arc::new(JwtService::from_config(&config.auth));
    let api = ApiContext::new(storage.clone(), jwt, config.api.prefix.clone());

    info!(
        "Pre-startup processing completed in {} ms, API mounted at {}",
        start_time.elapsed().as_millis(),
        config.api.prefix
    );

    Ok(StartupContext { storage, api })
}
