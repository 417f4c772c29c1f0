use config::{Config, Environment, File};
use serde::Deserialize;
use std::{collections::HashMap, env, path::Path};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub format: LoggingFormat,
    pub filter: String,
    pub file: Option<LoggingFileConfig>,
    pub buffer_limit: usize,
    pub lossy: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingFileConfig {
    pub format: LoggingFormat,
    pub directory: String,
    pub filename: String,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFormat {
    Json,
    Pretty,
    Full,
    Compact,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Run the idempotent `CREATE TABLE IF NOT EXISTS` bootstrap on startup.
    #[serde(default)]
    pub ensure_schema: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

fn env_source() -> Environment {
    Environment::with_prefix("CUSTODIA").prefix_separator("_").separator("__")
}

impl AppConfig {
    pub fn new<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let run_mode = env::var("APP_ENV").unwrap_or_default();
        Self::load_with_options(path, Some(run_mode), None)
    }

    /// Layers `default` < `{run_mode}` < `local` < `CUSTODIA_*` env vars <
    /// `overrides`. Nested keys in env vars are separated by `__`, e.g.
    /// `CUSTODIA_SERVER__PORT=9000`.
    pub fn load_with_options<P: AsRef<Path>>(
        path: P,
        run_mode: Option<String>,
        overrides: Option<HashMap<String, String>>,
    ) -> crate::Result<Self> {
        let dir = path.as_ref().to_string_lossy();
        let run_mode = run_mode.unwrap_or_default();
        let mut builder = Config::builder()
            .add_source(File::with_name(&format!("{dir}/default")))
            .add_source(
                File::with_name(&format!("{dir}/{run_mode}")).required(false),
            )
            // not committed to git
            .add_source(
                File::with_name(&format!("{dir}/local")).required(false),
            )
            .add_source(env_source());

        if let Some(overrides) = overrides {
            for (key, value) in overrides {
                builder = builder
                    .set_override(key, value)
                    .map_err(|e| crate::Error::Config(anyhow::anyhow!(e)))?;
            }
        }

        builder
            .build()
            .map_err(|e| crate::Error::Config(anyhow::anyhow!(e)))?
            .try_deserialize()
            .map_err(|e| crate::Error::Config(anyhow::anyhow!(e)))
    }
}
