use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::storage::Storage;

/// 关闭时存储检查的超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// 等待 Ctrl+C，然后做最后一次存储检查并返回
pub async fn listen_for_shutdown(storage: Arc<dyn Storage>) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, stopping server...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    match timeout(
        Duration::from_secs(SHUTDOWN_TIMEOUT_SECS),
        storage.health_check(),
    )
    .await
    {
        Ok(Ok(stats)) => {
            info!(
                "Final state: {} users, {} posts, {} comments",
                stats.users, stats.posts, stats.comments
            );
        }
        Ok(Err(e)) => {
            error!("Storage check on shutdown failed: {}", e);
        }
        Err(_) => {
            error!(
                "Storage check on shutdown timed out after {} seconds",
                SHUTDOWN_TIMEOUT_SECS
            );
        }
    }
}
