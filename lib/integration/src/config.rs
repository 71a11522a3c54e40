//! Store configuration.
//!
//! Loaded via the `config` crate from `POSBRIDGE__`-prefixed environment
//! variables, e.g. `POSBRIDGE__DATABASE__URL` or
//! `POSBRIDGE__TABLES__POS_ID_INDEX`.

use serde::Deserialize;

/// Integration store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Backing database connection.
    pub database: DatabaseConfig,

    /// Collection and index names.
    #[serde(default)]
    pub tables: TableConfig,
}

/// Database connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,

    /// Maximum pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Whether to apply the document schema on connect.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

/// Collection and index names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableConfig {
    /// Collection holding integrations, keyed by `integrationId`.
    #[serde(default = "default_integrations_table")]
    pub integrations: String,

    /// Collection holding configs, keyed by `integrationConfigId`.
    #[serde(default = "default_configs_table")]
    pub configs: String,

    /// Secondary index on the configs' `integrationId`.
    #[serde(default = "default_config_index")]
    pub config_index: String,

    /// Secondary index on integrations' `posId`.
    /// When unset, lookups by point of sale scan the whole collection.
    #[serde(default)]
    pub pos_id_index: Option<String>,
}

fn default_max_connections() -> u32 {
    5
}

fn default_run_migrations() -> bool {
    true
}

fn default_integrations_table() -> String {
    "Integrations".to_string()
}

fn default_configs_table() -> String {
    "IntegrationConfig".to_string()
}

fn default_config_index() -> String {
    "integrationId-index".to_string()
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            integrations: default_integrations_table(),
            configs: default_configs_table(),
            config_index: default_config_index(),
            pos_id_index: None,
        }
    }
}

impl StoreConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(environment())
    }

    fn from_environment(source: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("POSBRIDGE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
