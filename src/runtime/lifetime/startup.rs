use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::auth::TokenStore;
use crate::services::{InviteService, LinkService};
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub tokens: TokenStore,
    pub link_service: LinkService,
    pub invite_service: InviteService,
}

/// 准备服务器启动的上下文：存储、token 解析、链接与邀请服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = prepare_storage().await?;

    let tokens = TokenStore::new(storage.clone());
    let link_service = LinkService::new(storage.clone());
    let invite_service = InviteService::new(storage.clone());

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        storage,
        tokens,
        link_service,
        invite_service,
    })
}

/// Open the configured database and run migrations; shared with CLI commands
pub async fn prepare_storage() -> Result<Arc<SeaOrmStorage>> {
    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );
    Ok(storage)
}
