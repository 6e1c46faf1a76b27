use async_trait::async_trait;

use crate::domain::MarketRecord;
use crate::error::Result;

/// Venue-B lookup capability the resolver depends on.
///
/// Both calls either complete with a definitive answer or fail with a
/// transport-level error; "not found" and "no candidates" are successful
/// results, never errors. Implementations must be safe to share across
/// concurrently resolved markets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VenueDirectory: Send + Sync {
    /// Exact lookup by slug. `Ok(None)` means the slug does not exist.
    async fn get_market(&self, slug: &str) -> Result<Option<MarketRecord>>;

    /// Free-text search, best candidates first. May be empty.
    async fn search_markets(&self, query: &str) -> Result<Vec<MarketRecord>>;
}
