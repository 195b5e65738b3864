use serde::Deserialize;

use crate::error::Error;

/// Server configuration. Loaded from environment variables with the prefix
/// `ADSMANAGER__`, e.g. `ADSMANAGER__MONGODB_URI`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_mongodb_uri")]
    pub mongodb_uri: String,
    #[serde(default = "default_database_name")]
    pub database_name: String,
    #[serde(default)]
    pub store: StoreKind,
    #[serde(default)]
    pub seed: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Mongo,
    Memory,
}

impl Default for StoreKind {
    fn default() -> StoreKind {
        StoreKind::Mongo
    }
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_mongodb_uri() -> String {
    "mongodb://localhost:27017".to_string()
}
fn default_database_name() -> String {
    "adsmanager".to_string()
}
fn default_log_level() -> String {
    "debug".to_string()
}

impl Default for Config {
    fn default() -> Config {
        Config {
            bind_address: default_bind_address(),
            mongodb_uri: default_mongodb_uri(),
            database_name: default_database_name(),
            store: StoreKind::default(),
            seed: false,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Config, Error> {
        Config::from_source(
            config::Environment::with_prefix("ADSMANAGER")
                .separator("__")
                .try_parsing(true),
        )
    }

    fn from_source<S>(source: S) -> Result<Config, Error>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn log_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::DEBUG)
    }
}
