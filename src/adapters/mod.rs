pub mod kalshi_rest;
pub mod polymarket_gamma;

pub use kalshi_rest::KalshiClient;
pub use polymarket_gamma::{GammaDirectory, GammaMarket};
