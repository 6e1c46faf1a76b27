//! Cross-venue identity resolution.
//!
//! Two tiers, tried in order, first success wins:
//!
//! 1. Deterministic: parse the Kalshi ticker, translate the team codes
//!    through the alias book, derive the Polymarket slug and look it up
//!    exactly.
//! 2. Fuzzy: normalize the Kalshi title and run it through Polymarket's
//!    free-text search, accepting the first candidate that clears the
//!    configured similarity floor.
//!
//! Parse failures and dictionary misses fall through silently; transport
//! failures from the directory propagate as errors.

pub mod text;
pub mod ticker;

use std::sync::Arc;

use tracing::{debug, trace};

use crate::domain::{MarketRecord, MatchConfidence, MatchedPair, Resolution, TeamAliasBook};
use crate::error::Result;
use crate::exchange::VenueDirectory;

pub use ticker::{derive_slug, parse_ticker, ParsedTicker};

/// Two-tier market resolver over an injected venue directory
pub struct MarketResolver {
    directory: Arc<dyn VenueDirectory>,
    aliases: Arc<TeamAliasBook>,
    /// Minimum token-set similarity for a Tier 2 candidate, in [0, 1].
    /// 0 accepts the top search hit unconditionally.
    min_similarity: f64,
}

impl MarketResolver {
    pub fn new(
        directory: Arc<dyn VenueDirectory>,
        aliases: Arc<TeamAliasBook>,
        min_similarity: f64,
    ) -> Self {
        Self {
            directory,
            aliases,
            min_similarity: min_similarity.clamp(0.0, 1.0),
        }
    }

    /// Resolve a venue-A record to its venue-B equivalent.
    ///
    /// `Ok(Resolution::NoMatch)` is the expected outcome for markets with
    /// no venue-B counterpart; `Err` is reserved for directory failures
    /// ("could not check", as opposed to "does not exist").
    pub async fn resolve(&self, record_a: &MarketRecord) -> Result<Resolution> {
        if let Some(pair) = self.resolve_deterministic(record_a).await? {
            return Ok(Resolution::Matched(Box::new(pair)));
        }

        if let Some(pair) = self.resolve_fuzzy(record_a).await? {
            return Ok(Resolution::Matched(Box::new(pair)));
        }

        debug!(identifier = %record_a.identifier, "no venue-B equivalent found");
        Ok(Resolution::NoMatch)
    }

    /// Tier 1: derived-slug exact lookup
    async fn resolve_deterministic(&self, record_a: &MarketRecord) -> Result<Option<MatchedPair>> {
        let Some(parsed) = ticker::parse_ticker(&record_a.identifier) else {
            trace!(identifier = %record_a.identifier, "ticker is not structural, skipping tier 1");
            return Ok(None);
        };

        let Some(slug) = ticker::derive_slug(&parsed, &self.aliases) else {
            debug!(
                identifier = %record_a.identifier,
                away = %parsed.away_code,
                home = %parsed.home_code,
                "team code missing from alias book, skipping tier 1"
            );
            return Ok(None);
        };

        debug!(identifier = %record_a.identifier, slug = %slug, "testing derived slug");
        let Some(market_b) = self.directory.get_market(&slug).await? else {
            return Ok(None);
        };

        Ok(Some(MatchedPair {
            market_a: record_a.clone(),
            market_b,
            confidence: MatchConfidence::Deterministic,
        }))
    }

    /// Tier 2: normalized-title search
    async fn resolve_fuzzy(&self, record_a: &MarketRecord) -> Result<Option<MatchedPair>> {
        let query = text::normalize_title(&record_a.title);
        if query.is_empty() {
            return Ok(None);
        }

        let candidates = self.directory.search_markets(&query).await?;
        let Some(candidate) = candidates.into_iter().next() else {
            return Ok(None);
        };

        let score = text::title_similarity(&query, &candidate.title);
        if score < self.min_similarity {
            debug!(
                identifier = %record_a.identifier,
                candidate = %candidate.identifier,
                score,
                floor = self.min_similarity,
                "top search hit below similarity floor, rejecting"
            );
            return Ok(None);
        }

        debug!(
            identifier = %record_a.identifier,
            candidate = %candidate.identifier,
            score,
            "accepted fuzzy-search candidate"
        );
        Ok(Some(MatchedPair {
            market_a: record_a.clone(),
            market_b: candidate,
            confidence: MatchConfidence::FuzzySearch,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{League, Outcome, Venue};
    use crate::exchange::MockVenueDirectory;
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;

    fn kalshi_record(identifier: &str, title: &str) -> MarketRecord {
        MarketRecord {
            venue: Venue::Kalshi,
            identifier: identifier.to_string(),
            league: Some(League::Nba),
            title: title.to_string(),
            outcomes: [
                Outcome::new("PHI", Some(dec!(0.40))),
                Outcome::new("BKN", Some(dec!(0.55))),
            ],
        }
    }

    fn poly_record(slug: &str, title: &str) -> MarketRecord {
        MarketRecord {
            venue: Venue::Polymarket,
            identifier: slug.to_string(),
            league: Some(League::Nba),
            title: title.to_string(),
            outcomes: [
                Outcome::new("Brooklyn Nets", Some(dec!(0.38))),
                Outcome::new("Philadelphia 76ers", Some(dec!(0.62))),
            ],
        }
    }

    fn resolver(directory: MockVenueDirectory, min_similarity: f64) -> MarketResolver {
        MarketResolver::new(
            Arc::new(directory),
            Arc::new(TeamAliasBook::builtin().unwrap()),
            min_similarity,
        )
    }

    #[tokio::test]
    async fn structural_ticker_resolves_deterministically() {
        let mut directory = MockVenueDirectory::new();
        directory
            .expect_get_market()
            .with(eq("nba-bkn-phi-2025-12-23"))
            .times(1)
            .returning(|slug| {
                Ok(Some(poly_record(slug, "Nets vs. 76ers")))
            });
        directory.expect_search_markets().never();

        let record = kalshi_record(
            "KXNBAGAME-25DEC23BKNPHI-PHI",
            "Will the Philadelphia 76ers win their game against the Brooklyn Nets?",
        );
        let resolution = resolver(directory, 0.0).resolve(&record).await.unwrap();

        let pair = resolution.into_pair().expect("should match");
        assert_eq!(pair.confidence, MatchConfidence::Deterministic);
        assert_eq!(pair.market_b.identifier, "nba-bkn-phi-2025-12-23");
    }

    #[tokio::test]
    async fn slug_miss_falls_through_to_search() {
        let mut directory = MockVenueDirectory::new();
        directory
            .expect_get_market()
            .times(1)
            .returning(|_| Ok(None));
        directory
            .expect_search_markets()
            .times(1)
            .returning(|_| Ok(vec![poly_record("nba-bkn-phi-2025-12-23", "76ers Nets")]));

        let record = kalshi_record("KXNBAGAME-25DEC23BKNPHI-PHI", "76ers vs Nets");
        let resolution = resolver(directory, 0.0).resolve(&record).await.unwrap();

        let pair = resolution.into_pair().expect("should match via search");
        assert_eq!(pair.confidence, MatchConfidence::FuzzySearch);
    }

    #[tokio::test]
    async fn unparseable_ticker_skips_exact_lookup_entirely() {
        let mut directory = MockVenueDirectory::new();
        directory.expect_get_market().never();
        directory
            .expect_search_markets()
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let record = kalshi_record("KXNBAEAST-CHAMPION", "Who wins the East?");
        let resolution = resolver(directory, 0.0).resolve(&record).await.unwrap();
        assert!(!resolution.is_match());
    }

    #[tokio::test]
    async fn empty_search_results_resolve_to_no_match() {
        let mut directory = MockVenueDirectory::new();
        directory
            .expect_get_market()
            .times(1)
            .returning(|_| Ok(None));
        directory
            .expect_search_markets()
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let record = kalshi_record("KXNBAGAME-25DEC23BKNPHI-PHI", "76ers vs Nets");
        let resolution = resolver(directory, 0.0).resolve(&record).await.unwrap();
        assert!(!resolution.is_match());
    }

    #[tokio::test]
    async fn similarity_floor_rejects_weak_candidates() {
        let mut directory = MockVenueDirectory::new();
        directory
            .expect_get_market()
            .times(1)
            .returning(|_| Ok(None));
        directory.expect_search_markets().times(1).returning(|_| {
            Ok(vec![poly_record(
                "nba-lal-bos-2025-12-23",
                "Lakers Celtics Christmas game",
            )])
        });

        let record = kalshi_record("KXNBAGAME-25DEC23BKNPHI-PHI", "76ers vs Nets");
        let resolution = resolver(directory, 0.8).resolve(&record).await.unwrap();
        assert!(!resolution.is_match());
    }

    #[tokio::test]
    async fn directory_failure_propagates_as_error() {
        let mut directory = MockVenueDirectory::new();
        directory.expect_get_market().times(1).returning(|_| {
            Err(crate::error::ScoutError::Internal(
                "gamma unreachable".to_string(),
            ))
        });

        let record = kalshi_record("KXNBAGAME-25DEC23BKNPHI-PHI", "76ers vs Nets");
        let result = resolver(directory, 0.0).resolve(&record).await;
        assert!(result.is_err(), "transport failure must not become NoMatch");
    }

    #[tokio::test]
    async fn resolve_is_deterministic_over_identical_inputs() {
        let mut directory = MockVenueDirectory::new();
        directory
            .expect_get_market()
            .with(eq("nba-bkn-phi-2025-12-23"))
            .times(2)
            .returning(|slug| Ok(Some(poly_record(slug, "Nets vs. 76ers"))));

        let record = kalshi_record("KXNBAGAME-25DEC23BKNPHI-PHI", "76ers vs Nets");
        let resolver = resolver(directory, 0.0);

        let first = resolver.resolve(&record).await.unwrap().into_pair().unwrap();
        let second = resolver.resolve(&record).await.unwrap().into_pair().unwrap();
        assert_eq!(first.market_b, second.market_b);
        assert_eq!(first.confidence, second.confidence);
    }
}
