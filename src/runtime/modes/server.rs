//! Server mode
//!
//! Starts the storage backend, the expiry sweeper and the HTTP server, then
//! waits for the server to stop or for Ctrl+C.

use actix_web::{App, HttpServer, middleware::Compress, web};
use anyhow::Result;
use tracing::warn;

use crate::api::{CallerIdentity, configure_routes};
use crate::runtime::lifetime;
use crate::services::{ExpirySweeper, SweeperSettings};

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let config = crate::config::get_config();

    let sweeper = ExpirySweeper::spawn(
        startup.storage.clone(),
        SweeperSettings::from(&config.sweeper),
    );

    let tokens = startup.tokens.clone();
    let link_service = web::Data::new(startup.link_service.clone());
    let invite_service = web::Data::new(startup.invite_service.clone());

    let workers = config.server.workers.clamp(1, 32);
    warn!("Using {} workers for the server", workers);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(CallerIdentity::new(tokens.clone()))
            .wrap(Compress::default())
            .app_data(link_service.clone())
            .app_data(invite_service.clone())
            .configure(configure_routes)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(workers)
    .disable_signals();

    let server = match server.bind(&bind_address) {
        Ok(server) => server,
        Err(e) => {
            lifetime::shutdown::perform_shutdown_tasks(sweeper).await;
            return Err(e.into());
        }
    };
    warn!("Starting server at http://{}", bind_address);

    let server = server.run();
    let server_handle = server.handle();

    // Wait for server or shutdown signal
    let result = tokio::select! {
        res = server => res.map_err(anyhow::Error::from),
        _ = lifetime::shutdown::listen_for_shutdown() => {
            server_handle.stop(true).await;
            Ok(())
        }
    };

    lifetime::shutdown::perform_shutdown_tasks(sweeper).await;
    warn!("Graceful shutdown: all tasks completed");

    result
}
