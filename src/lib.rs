pub mod adapters;
pub mod arbitrage;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod resolver;
pub mod services;

pub use arbitrage::evaluate;
pub use config::AppConfig;
pub use domain::{
    ArbitrageOpportunity, League, MarketRecord, MatchConfidence, MatchedPair, Outcome, Resolution,
    Side, TeamAlias, TeamAliasBook, Venue,
};
pub use error::{Result, ScoutError};
pub use exchange::VenueDirectory;
pub use resolver::MarketResolver;
pub use services::{ScanOutcome, ScoutReport, ScoutService};
