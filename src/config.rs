use crate::constants::{self, resource};
use crate::error::{HttpCheckError, Result};
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Optional on-disk configuration, relative to the working directory.
const DEFAULT_CONFIG_FILE: &str = "config/httpcheck";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
    pub bind_address: String,
    pub request_timeout_ms: u64,
    pub connect_max_retries: u32,
    pub connect_retry_interval_ms: u64,
    pub resource: ResourceConfig,
}

/// Group/version/resource/namespace of the orchestration-side store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub group: String,
    pub version: String,
    pub plural: String,
    pub kind: String,
    pub namespace: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: 10,
            acquire_timeout_ms: 3_000,
            bind_address: constants::DEFAULT_BIND_ADDRESS.to_string(),
            request_timeout_ms: constants::DEFAULT_REQUEST_TIMEOUT_MS,
            connect_max_retries: constants::DEFAULT_CONNECT_MAX_RETRIES,
            connect_retry_interval_ms: constants::DEFAULT_CONNECT_RETRY_INTERVAL_MS,
            resource: ResourceConfig::default(),
        }
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            group: resource::GROUP.to_string(),
            version: resource::VERSION.to_string(),
            plural: resource::PLURAL.to_string(),
            kind: resource::KIND.to_string(),
            namespace: resource::NAMESPACE.to_string(),
        }
    }
}

impl ResourceConfig {
    /// `apiVersion` field of the resource object.
    pub fn api_version(&self) -> String {
        format!("{}/{}", self.group, self.version)
    }

    /// Namespaced collection path on the API server.
    pub fn collection_path(&self) -> String {
        format!(
            "/apis/{}/{}/namespaces/{}/{}",
            self.group, self.version, self.namespace, self.plural
        )
    }

    pub fn item_path(&self, name: &str) -> String {
        format!("{}/{}", self.collection_path(), name)
    }
}

impl ServiceConfig {
    /// Load from defaults, `config/httpcheck.{toml,yaml,json}` if present, and
    /// `HTTPCHECK_*` environment variables (nested keys use `__`).
    ///
    /// `DATABASE_DSN` and `DATABASE_URL` fill the connection string when no
    /// `HTTPCHECK_DATABASE_URL` is given.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = config::Config::builder().add_source(file).add_source(
            Environment::with_prefix("HTTPCHECK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config = Self::from_builder(builder)?;

        if config.database_url.is_empty() {
            if let Ok(dsn) = std::env::var("DATABASE_DSN").or_else(|_| std::env::var("DATABASE_URL")) {
                config.database_url = dsn;
            }
        }

        Ok(config)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder.build()?.try_deserialize::<ServiceConfig>()?;
        Ok(config)
    }

    /// Checks the tunables. A missing connection string is not an error
    /// here; it surfaces per connection attempt, so startup only gives up
    /// once the retry loop is exhausted.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_ms == 0 {
            return Err(HttpCheckError::Configuration(
                "request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.connect_max_retries == 0 {
            return Err(HttpCheckError::Configuration(
                "connect_max_retries must be at least 1".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(HttpCheckError::Configuration(
                "max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    pub fn connect_retry_interval(&self) -> Duration {
        Duration::from_millis(self.connect_retry_interval_ms)
    }
}
