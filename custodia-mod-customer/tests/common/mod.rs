use std::sync::Arc;

use custodia::config::{DatabaseConfig, LoggingConfig, LoggingFormat};
use custodia::db::{AppDbPool, Handle};
use custodia_mod_customer::{
    handler::{CustomerState, router},
    infra::{SqlxCustomerRepository, ensure_schema},
    service::CustomerServiceImpl,
};

pub async fn setup_db() -> AppDbPool {
    let pool = custodia::db::connect(&DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        ensure_schema: true,
    })
    .await
    .expect("Failed to open in-memory sqlite");
    ensure_schema(&mut Handle::Pool(pool.clone()))
        .await
        .expect("Failed to create schema");
    pool
}

pub fn init_tracing() {
    let _ = custodia::logging::init_tracing(&LoggingConfig {
        filter: "debug".into(),
        format: LoggingFormat::Compact,
        file: None,
        buffer_limit: 256_000,
        lossy: true,
    });
}

/// The production wiring (store, service, handler, middleware) over an
/// empty in-memory database.
pub async fn app() -> axum::Router {
    init_tracing();
    let pool = setup_db().await;
    let service = Arc::new(CustomerServiceImpl::new(Arc::new(
        SqlxCustomerRepository,
    )));
    custodia::http::with_middleware(router(CustomerState::new(pool, service)))
}
