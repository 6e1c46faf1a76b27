//! Polymarket Gamma API adapter.
//!
//! Implements the venue-B directory the resolver depends on: exact market
//! lookup by slug and free-text event search. Gamma frequently returns
//! JSON arrays as strings (e.g. `"[\"Yes\",\"No\"]"`), so both shapes are
//! accepted.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{League, MarketRecord, Outcome, Venue};
use crate::error::{Result, ScoutError};
use crate::exchange::VenueDirectory;

pub const DEFAULT_GAMMA_API_BASE: &str = "https://gamma-api.polymarket.com";

/// One market as Gamma returns it
#[derive(Debug, Clone, Deserialize)]
pub struct GammaMarket {
    pub slug: String,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "de_string_vec")]
    pub outcomes: Vec<String>,
    #[serde(rename = "outcomePrices", default, deserialize_with = "de_string_vec")]
    pub outcome_prices: Vec<String>,
}

/// One event from `public-search`, carrying its nested markets
#[derive(Debug, Clone, Deserialize)]
pub struct GammaEvent {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub markets: Vec<GammaMarket>,
}

fn de_string_vec<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    match v {
        Value::Array(arr) => Ok(arr
            .into_iter()
            .filter_map(|x| match x {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect()),
        Value::String(s) => {
            serde_json::from_str::<Vec<String>>(&s).map_err(serde::de::Error::custom)
        }
        _ => Ok(Vec::new()),
    }
}

impl GammaMarket {
    /// Convert to a venue-agnostic record.
    ///
    /// Only binary markets are representable; anything else maps to `None`
    /// so multi-strike events never reach the evaluator.
    fn into_record(self) -> Option<MarketRecord> {
        if self.outcomes.len() != 2 {
            return None;
        }

        let price = |i: usize| -> Option<Decimal> {
            self.outcome_prices
                .get(i)
                .and_then(|p| Decimal::from_str_exact(p.trim()).ok())
        };
        let outcomes = [
            Outcome::new(self.outcomes[0].clone(), price(0)),
            Outcome::new(self.outcomes[1].clone(), price(1)),
        ];

        Some(MarketRecord {
            venue: Venue::Polymarket,
            league: League::detect(&self.slug),
            title: self.question.unwrap_or_else(|| self.slug.clone()),
            identifier: self.slug,
            outcomes,
        })
    }
}

/// Gamma-backed venue directory
#[derive(Clone)]
pub struct GammaDirectory {
    http: Client,
    base_url: String,
}

impl GammaDirectory {
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let base_url = base_url
            .unwrap_or(DEFAULT_GAMMA_API_BASE)
            .trim_end_matches('/')
            .to_string();

        let http = Client::builder()
            .user_agent("arbscout-gamma-adapter/0.1")
            .build()
            .map_err(|e| {
                ScoutError::Internal(format!("failed to build Gamma HTTP client: {}", e))
            })?;

        Ok(Self { http, base_url })
    }

    /// Events from `public-search`, tolerating both response envelopes
    /// (bare array, or object with an `events` field).
    fn parse_search_events(value: Value) -> Vec<GammaEvent> {
        let events = match value {
            Value::Array(_) => value,
            Value::Object(ref map) => match map.get("events") {
                Some(events) => events.clone(),
                None => return Vec::new(),
            },
            _ => return Vec::new(),
        };

        match serde_json::from_value::<Vec<GammaEvent>>(events) {
            Ok(events) => events,
            Err(e) => {
                warn!(error = %e, "unparseable Gamma search payload");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl VenueDirectory for GammaDirectory {
    async fn get_market(&self, slug: &str) -> Result<Option<MarketRecord>> {
        let url = format!("{}/markets/slug/{}", self.base_url, slug);
        let resp = self.http.get(&url).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ScoutError::RateLimited(format!(
                "Gamma API rate limited for slug {}",
                slug
            )));
        }
        let resp = resp.error_for_status()?;

        let market: GammaMarket = resp.json().await?;
        Ok(market.into_record())
    }

    async fn search_markets(&self, query: &str) -> Result<Vec<MarketRecord>> {
        let url = format!("{}/public-search", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await?;

        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ScoutError::RateLimited(
                "Gamma API rate limited for public-search".to_string(),
            ));
        }
        let resp = resp.error_for_status()?;
        let value: Value = resp.json().await?;

        // One candidate per event: its first nested market, in the order
        // the search ranked the events. Winner markets come first in an
        // event; strike ladders are skipped by the binary check.
        let candidates: Vec<MarketRecord> = Self::parse_search_events(value)
            .into_iter()
            .filter_map(|event| event.markets.into_iter().next())
            .filter_map(GammaMarket::into_record)
            .collect();

        debug!(query = %query, candidates = candidates.len(), "Gamma search complete");
        Ok(candidates)
    }
}
