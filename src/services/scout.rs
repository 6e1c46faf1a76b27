//! Batch scan across Kalshi series: resolve every open team-vs-team
//! market against Polymarket and evaluate the matched pairs.
//!
//! Markets are independent, so resolution runs through a bounded worker
//! pool. Failures are isolated per market: one bad ticker or one failed
//! lookup never aborts the cycle.

use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::KalshiClient;
use crate::arbitrage;
use crate::config::ScoutConfig;
use crate::domain::{
    ArbitrageOpportunity, MarketRecord, MatchConfidence, Resolution, TeamAliasBook,
};
use crate::resolver::MarketResolver;

/// Terminal result of scanning one Kalshi market
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// A venue-B equivalent was found; opportunities may be empty
    Matched {
        slug: String,
        confidence: MatchConfidence,
        opportunities: Vec<ArbitrageOpportunity>,
        /// Highest profit among the opportunities, for callers that keep
        /// only the best combination
        best_profit: Option<Decimal>,
    },
    /// No venue-B equivalent exists, an expected outcome rather than a
    /// failure
    NoMatch,
    /// The market could not be checked (lookup/search failed)
    Failed { reason: String },
}

/// One market's scan record
#[derive(Debug, Clone, Serialize)]
pub struct MarketScan {
    pub ticker: String,
    pub title: String,
    #[serde(flatten)]
    pub outcome: ScanOutcome,
}

/// Aggregated result of one scan cycle
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoutReport {
    pub scans: Vec<MarketScan>,
}

impl ScoutReport {
    pub fn matched(&self) -> usize {
        self.scans
            .iter()
            .filter(|s| matches!(s.outcome, ScanOutcome::Matched { .. }))
            .count()
    }

    pub fn unmatched(&self) -> usize {
        self.scans
            .iter()
            .filter(|s| matches!(s.outcome, ScanOutcome::NoMatch))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.scans
            .iter()
            .filter(|s| matches!(s.outcome, ScanOutcome::Failed { .. }))
            .count()
    }

    /// Scans that surfaced at least one qualifying combination
    pub fn with_opportunities(&self) -> impl Iterator<Item = &MarketScan> {
        self.scans.iter().filter(|s| {
            matches!(&s.outcome, ScanOutcome::Matched { opportunities, .. } if !opportunities.is_empty())
        })
    }
}

/// Scan driver wiring the Kalshi source, the resolver and the evaluator
pub struct ScoutService {
    kalshi: KalshiClient,
    resolver: Arc<MarketResolver>,
    aliases: Arc<TeamAliasBook>,
    cfg: ScoutConfig,
    min_profit: Decimal,
}

impl ScoutService {
    pub fn new(
        kalshi: KalshiClient,
        resolver: Arc<MarketResolver>,
        aliases: Arc<TeamAliasBook>,
        cfg: ScoutConfig,
        min_profit: Decimal,
    ) -> Self {
        Self {
            kalshi,
            resolver,
            aliases,
            cfg,
            min_profit,
        }
    }

    /// Execute a single scan cycle across all configured series.
    pub async fn run_once(&self) -> ScoutReport {
        let mut records: Vec<MarketRecord> = Vec::new();
        for series in &self.cfg.series {
            match self.kalshi.open_markets_for_series(series).await {
                Ok(markets) => records.extend(markets),
                Err(e) => warn!(series = %series, "series fetch failed: {e}"),
            }
        }

        info!(
            markets = records.len(),
            series = self.cfg.series.len(),
            "scanning open team-vs-team markets"
        );

        let concurrency = self.cfg.concurrency.max(1);
        let scans: Vec<MarketScan> = stream::iter(records)
            .map(|record| async move { self.scan_market(record).await })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let report = ScoutReport { scans };
        info!(
            matched = report.matched(),
            unmatched = report.unmatched(),
            failed = report.failed(),
            "scan cycle complete"
        );
        report
    }

    /// Resolve and evaluate one market, capturing failure instead of
    /// propagating it.
    async fn scan_market(&self, record: MarketRecord) -> MarketScan {
        let ticker = record.identifier.clone();
        let title = record.title.clone();

        let outcome = match self.resolver.resolve(&record).await {
            Ok(Resolution::Matched(pair)) => {
                let opportunities = arbitrage::evaluate(&pair, &self.aliases, self.min_profit);
                let best_profit = opportunities.iter().map(|o| o.profit).max();
                ScanOutcome::Matched {
                    slug: pair.market_b.identifier.clone(),
                    confidence: pair.confidence,
                    opportunities,
                    best_profit,
                }
            }
            Ok(Resolution::NoMatch) => ScanOutcome::NoMatch,
            Err(e) => {
                warn!(ticker = %ticker, "resolution failed: {e}");
                ScanOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        MarketScan {
            ticker,
            title,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Side;
    use rust_decimal_macros::dec;

    fn scan(outcome: ScanOutcome) -> MarketScan {
        MarketScan {
            ticker: "KXNBAGAME-25DEC23BKNPHI-PHI".to_string(),
            title: "Will the 76ers win?".to_string(),
            outcome,
        }
    }

    fn opportunity(profit: Decimal) -> ArbitrageOpportunity {
        ArbitrageOpportunity {
            outcome_label: "Philadelphia 76ers".to_string(),
            side_a: Side::Yes,
            side_b: Side::No,
            cost: Decimal::ONE - profit,
            profit,
        }
    }

    #[test]
    fn report_counts_partition_the_scans() {
        let report = ScoutReport {
            scans: vec![
                scan(ScanOutcome::Matched {
                    slug: "nba-bkn-phi-2025-12-23".to_string(),
                    confidence: MatchConfidence::Deterministic,
                    opportunities: vec![opportunity(dec!(0.22))],
                    best_profit: Some(dec!(0.22)),
                }),
                scan(ScanOutcome::NoMatch),
                scan(ScanOutcome::Failed {
                    reason: "gamma unreachable".to_string(),
                }),
            ],
        };

        assert_eq!(report.matched(), 1);
        assert_eq!(report.unmatched(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.with_opportunities().count(), 1);
    }

    #[test]
    fn report_serializes_with_flattened_outcome() {
        let report = ScoutReport {
            scans: vec![scan(ScanOutcome::Matched {
                slug: "nba-bkn-phi-2025-12-23".to_string(),
                confidence: MatchConfidence::Deterministic,
                opportunities: vec![opportunity(dec!(0.22))],
                best_profit: Some(dec!(0.22)),
            })],
        };

        let json = serde_json::to_value(&report).unwrap();
        let first = &json["scans"][0];
        assert_eq!(first["status"], "matched");
        assert_eq!(first["slug"], "nba-bkn-phi-2025-12-23");
        assert_eq!(first["confidence"], "deterministic");
    }
}
