mod handle;
mod repository;

use std::str::FromStr;

pub use handle::*;
pub use repository::*;

use crate::config::DatabaseConfig;

// Application default db driver
// if required change this
pub type AppDbDriver = sqlx::Sqlite;
pub type AppDbHandle = Handle<AppDbDriver>;
pub type AppDbPool = sqlx::Pool<AppDbDriver>;

/// Classifies a driver error into the framework taxonomy.
///
/// "no rows" becomes `NotFound`, failures to map a row onto a type become
/// `Decode`, anything else is a `Database` error.
pub fn map_err(e: sqlx::Error) -> crate::Error {
    match e {
        sqlx::Error::RowNotFound => crate::Error::NotFound("row".into()),
        sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::Decode(_) => {
            crate::Error::Decode(anyhow::Error::new(e))
        }
        e => crate::Error::Database(anyhow::Error::new(e)),
    }
}

/// Opens the application pool described by `config`.
///
/// Every connection to `:memory:` opens its own private database, so an
/// in-memory pool is pinned to a single connection that is never retired.
pub async fn connect(config: &DatabaseConfig) -> crate::Result<AppDbPool> {
    let options = sqlx::sqlite::SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| crate::Error::Config(anyhow::Error::new(e)))?
        .create_if_missing(true);

    let in_memory = is_in_memory(&config.url);
    let max_connections = if in_memory { 1 } else { config.max_connections };
    if in_memory && config.max_connections > 1 {
        tracing::warn!(
            requested = config.max_connections,
            "in-memory database limited to one connection"
        );
    }

    let mut pool_options = sqlx::pool::PoolOptions::<AppDbDriver>::new()
        .max_connections(max_connections);
    if in_memory {
        pool_options = pool_options
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await.map_err(map_err)?;
    tracing::info!(url = %config.url, max_connections, "database pool ready");
    Ok(pool)
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
