use std::sync::Arc;

use custodia::db::Handle;
use custodia_mod_customer::{
    handler::{CustomerState, router},
    infra::{SqlxCustomerRepository, ensure_schema},
    service::CustomerServiceImpl,
};

#[tokio::main]
async fn main() {
    let config_dir = std::env::var("APP_CONFIG_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| custodia::util::workspace_dir().join("configs"));
    let config = custodia::config::AppConfig::new(config_dir)
        .expect("Failed to load config");

    custodia::logging::init_tracing(&config.logging)
        .expect("Failed to initialize logger");

    tracing::info!("app config: {:?}", config);

    if let Err(e) = run(config).await {
        tracing::error!(error = ?e, "server stopped");
        std::process::exit(1);
    }
}

async fn run(config: custodia::config::AppConfig) -> custodia::Result<()> {
    let pool = custodia::db::connect(&config.database).await?;
    if config.database.ensure_schema {
        ensure_schema(&mut Handle::Pool(pool.clone())).await?;
    }

    let repo = Arc::new(SqlxCustomerRepository);
    let service = Arc::new(CustomerServiceImpl::new(repo));
    let app = custodia::http::with_middleware(router(CustomerState::new(
        pool, service,
    )));

    custodia::http::run(app, &config.server).await
}
