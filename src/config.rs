use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub venues: VenueConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub arbitrage: ArbitrageConfig,
    #[serde(default)]
    pub scout: ScoutConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueConfig {
    /// Kalshi trade API base URL
    #[serde(default = "default_kalshi_api_base")]
    pub kalshi_api_base: String,
    /// Polymarket Gamma API base URL
    #[serde(default = "default_gamma_api_base")]
    pub gamma_api_base: String,
}

fn default_kalshi_api_base() -> String {
    crate::adapters::kalshi_rest::DEFAULT_KALSHI_API_BASE.to_string()
}

fn default_gamma_api_base() -> String {
    crate::adapters::polymarket_gamma::DEFAULT_GAMMA_API_BASE.to_string()
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            kalshi_api_base: default_kalshi_api_base(),
            gamma_api_base: default_gamma_api_base(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Minimum token-set similarity for accepting a fuzzy-search
    /// candidate, in [0, 1]. 0 accepts the top hit unconditionally.
    #[serde(default)]
    pub min_similarity: f64,
    /// Optional path to an alias-dictionary JSON overriding the built-in
    /// four-league table
    #[serde(default)]
    pub alias_file: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_similarity: 0.0,
            alias_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ArbitrageConfig {
    /// Profit floor for reporting a combination, strict (e.g. 0.005
    /// demands more than half a cent per contract)
    #[serde(default)]
    pub min_profit: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoutConfig {
    /// Kalshi series to scan
    #[serde(default = "default_series")]
    pub series: Vec<String>,
    /// Markets resolved concurrently per cycle
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_series() -> Vec<String> {
    crate::domain::League::ALL
        .into_iter()
        .map(|league| league.series_ticker().to_string())
        .collect()
}

fn default_concurrency() -> usize {
    8
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            series: default_series(),
            concurrency: default_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            venues: VenueConfig::default(),
            resolver: ResolverConfig::default(),
            arbitrage: ArbitrageConfig::default(),
            scout: ScoutConfig::default(),
            logging: LoggingConfig {
                level: default_log_level(),
                json: false,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("resolver.min_similarity", 0.0)?
            .set_default("scout.concurrency", 8)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("ARBSCOUT_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (ARBSCOUT_VENUES__GAMMA_API_BASE, etc.)
            .add_source(
                Environment::with_prefix("ARBSCOUT")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}
