use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    auth::jwt::TokenIssuer,
    config::{ApiServerConfig, AuthConfig},
    errors::Error,
    storage::DbPool,
};

use super::routes::build_router;

/// Bind the HTTP listener and serve until Ctrl-C.
pub async fn start_api_server(
    config: ApiServerConfig,
    auth: &AuthConfig,
    pool: DbPool,
) -> crate::Result<()> {
    let addr: SocketAddr = config
        .socket_address()
        .parse()
        .map_err(|e| Error::config(format!("Invalid API address: {}", e)))?;

    let issuer = Arc::new(TokenIssuer::new(auth.jwt_secret.as_bytes()));
    let router: Router = build_router(pool, issuer, &config.cors_origins);

    let listener = TcpListener::bind(addr).await.map_err(|e| Error::Io {
        source: e,
        context: format!("Failed to bind API server on {}", addr),
    })?;

    info!(address = %addr, "Starting HTTP API server");
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "API server shutdown listener failed");
            }
        })
        .await
        .map_err(|e| Error::Io { source: e, context: "API server error".to_string() })?;

    info!("API server shutdown completed");
    Ok(())
}
