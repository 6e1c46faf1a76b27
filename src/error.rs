use thiserror::Error;

/// Main error type for the scout.
///
/// Only genuine failures live here. A ticker that does not parse, a team
/// code absent from the alias book, or a market with no venue-B equivalent
/// are ordinary outcomes of resolution and travel through return values:
/// "does not exist" and "could not check" stay distinguishable.
#[derive(Error, Debug)]
pub enum ScoutError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Market data errors
    #[error("Invalid market data: {0}")]
    InvalidMarketData(String),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for ScoutError
pub type Result<T> = std::result::Result<T, ScoutError>;
