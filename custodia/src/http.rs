pub mod middleware;
mod response;

use crate::config::ServerConfig;

/// Wraps `router` with the standard middleware stack: request tracing
/// outermost, then JSON normalization of client errors.
pub fn with_middleware(router: axum::Router) -> axum::Router {
    router
        .layer(axum::middleware::from_fn(middleware::response_mapper_layer))
        .layer(axum::middleware::from_fn(middleware::trace_layer))
}

/// Binds `host:port` from `config` and serves `router` until the process
/// stops.
pub async fn run(
    router: axum::Router,
    config: &ServerConfig,
) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        config.host.as_str(),
        config.port
    ))
    .await
    .map_err(|e| anyhow::anyhow!("tcp bind failed: {:?}", e))?;
    serve(listener, router).await
}

pub async fn serve(
    listener: tokio::net::TcpListener,
    router: axum::Router,
) -> crate::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "http server listening");
    }
    axum::serve(listener, router)
        .await
        .map_err(|e| anyhow::anyhow!("http serve failed: {:?}", e))?;
    Ok(())
}
