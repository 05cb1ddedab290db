//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger posting configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Ledger posting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Maximum tolerated difference between total debits and total credits.
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: Decimal,
    /// Page size used when a caller does not ask for one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

fn default_balance_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_page_size() -> u32 {
    20
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            balance_tolerance: default_balance_tolerance(),
            default_page_size: default_page_size(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
