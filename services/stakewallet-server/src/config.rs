//! Server Configuration
//!
//! Configuration management for the stakewallet server. Supports environment
//! variables, config files, and CLI arguments.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use stakewallet_ledger::{Limits, RateTable};
use stakewallet_types::CurrencyCode;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server binding configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// Wallet engine configuration
    #[serde(default)]
    pub wallet: WalletSettings,

    /// API configuration
    #[serde(default)]
    pub api: ApiSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server binding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl ServerSettings {
    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Wallet engine settings: exchange rates and per-operation ceilings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSettings {
    /// Exchange rates relative to the base currency
    #[serde(default = "default_rates")]
    pub rates: HashMap<String, Decimal>,

    /// Maximum single-deposit amount
    #[serde(default = "default_max_deposit")]
    pub max_deposit: Decimal,

    /// Maximum single-withdrawal amount
    #[serde(default = "default_max_withdrawal")]
    pub max_withdrawal: Decimal,
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            rates: default_rates(),
            max_deposit: default_max_deposit(),
            max_withdrawal: default_max_withdrawal(),
        }
    }
}

impl WalletSettings {
    pub fn rate_table(&self) -> RateTable {
        RateTable::new(
            self.rates
                .iter()
                .map(|(code, rate)| (CurrencyCode::new(code), *rate)),
        )
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_deposit: self.max_deposit,
            max_withdrawal: self.max_withdrawal,
        }
    }
}

/// API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Enable request tracing
    #[serde(default = "default_true")]
    pub enable_tracing: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            enable_cors: true,
            enable_tracing: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// =============================================================================
// Default Functions
// =============================================================================

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_shutdown_timeout() -> u64 {
    10
}

fn default_rates() -> HashMap<String, Decimal> {
    [
        ("USD".to_string(), Decimal::new(10, 1)),
        ("EUR".to_string(), Decimal::new(85, 2)),
        ("GBP".to_string(), Decimal::new(73, 2)),
        ("CAD".to_string(), Decimal::new(125, 2)),
    ]
    .into_iter()
    .collect()
}

fn default_max_deposit() -> Decimal {
    Decimal::new(1000000, 2)
}

fn default_max_withdrawal() -> Decimal {
    Decimal::new(500000, 2)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Configuration Loading
// =============================================================================

impl ServerConfig {
    /// Load configuration from environment and optional config file
    pub fn load(config_path: Option<&str>) -> anyhow::Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder();

        // Add config file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Add default config locations
        builder = builder
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        // Add environment variables with STAKEWALLET_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("STAKEWALLET")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;

        let server_config: ServerConfig = config.try_deserialize().unwrap_or_else(|_| {
            tracing::warn!("Using default configuration - some settings may need adjustment");
            ServerConfig::default()
        });

        Ok(server_config)
    }

    /// Create a configuration for development/testing
    pub fn development() -> Self {
        Self {
            server: ServerSettings::default(),
            wallet: WalletSettings::default(),
            api: ApiSettings::default(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::development()
    }
}
