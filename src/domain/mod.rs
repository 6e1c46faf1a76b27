pub mod alias;
pub mod market;

pub use alias::{TeamAlias, TeamAliasBook};
pub use market::{
    ArbitrageOpportunity, League, MarketRecord, MatchConfidence, MatchedPair, Outcome, Resolution,
    Side, Venue,
};
