pub mod scout;

pub use scout::{MarketScan, ScanOutcome, ScoutReport, ScoutService};
