//! Kalshi REST adapter (native Rust, no external SDK dependency).
//!
//! Read-only client for the public market endpoints. Payloads are
//! normalized into venue-agnostic [`MarketRecord`]s so the resolver and
//! evaluator never see Kalshi's wire shapes.

use reqwest::{Client, Method};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{MarketRecord, Outcome, Venue};
use crate::error::{Result, ScoutError};
use crate::resolver::ticker;

pub const DEFAULT_KALSHI_API_BASE: &str = "https://api.elections.kalshi.com/trade-api/v2";

/// Page size for series market listings, Kalshi's documented maximum
const SERIES_PAGE_LIMIT: u32 = 1000;

#[derive(Clone)]
pub struct KalshiClient {
    http: Client,
    base_url: String,
}

impl KalshiClient {
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let base_url = base_url
            .unwrap_or(DEFAULT_KALSHI_API_BASE)
            .trim_end_matches('/')
            .to_string();

        let http = Client::builder()
            .user_agent("arbscout-kalshi-adapter/0.1")
            .build()
            .map_err(|e| {
                ScoutError::Internal(format!("failed to build Kalshi HTTP client: {}", e))
            })?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request_json(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let mut req = self.http.request(method.clone(), &url);
        if let Some(query) = query {
            req = req.query(query);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if status.as_u16() == 429 {
            return Err(ScoutError::RateLimited(format!(
                "Kalshi API rate limited for {} {}",
                method, path
            )));
        }

        if !status.is_success() {
            return Err(ScoutError::Internal(format!(
                "Kalshi API {} {} failed: status={} body={}",
                method, path, status, text
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| ScoutError::InvalidMarketData(format!("invalid Kalshi JSON response: {}", e)))
    }

    fn pick_array<'a>(root: &'a Value, keys: &[&str]) -> Option<&'a [Value]> {
        keys.iter()
            .find_map(|key| root.get(*key).and_then(|v| v.as_array()).map(Vec::as_slice))
    }

    fn pick_obj<'a>(root: &'a Value, keys: &[&str]) -> Option<&'a Value> {
        keys.iter().find_map(|key| root.get(*key))
    }

    fn pick_str<'a>(root: &'a Value, keys: &[&str]) -> Option<&'a str> {
        Self::pick_obj(root, keys).and_then(|v| v.as_str())
    }

    fn parse_decimalish(value: &Value) -> Option<Decimal> {
        match value {
            Value::Null => None,
            Value::String(s) => Decimal::from_str_exact(s.trim()).ok(),
            Value::Number(n) => Decimal::from_str_exact(&n.to_string()).ok(),
            _ => None,
        }
    }

    /// Kalshi quotes contract prices as whole cents (1-99); some payloads
    /// carry decimal dollars instead. Integer values in range are cents.
    fn from_cents_if_needed(value: Decimal) -> Decimal {
        if value.fract().is_zero() && value >= Decimal::ONE && value <= Decimal::new(100, 0) {
            value / Decimal::new(100, 0)
        } else {
            value
        }
    }

    /// Extract an ask price in dollars. Kalshi reports 0 when no ask is
    /// resting, so 0 maps to absent rather than free.
    fn ask_price(value: &Value, keys: &[&str]) -> Option<Decimal> {
        Self::pick_obj(value, keys)
            .and_then(Self::parse_decimalish)
            .filter(|price| !price.is_zero())
            .map(Self::from_cents_if_needed)
    }

    /// Map one Kalshi market payload to a venue-agnostic record.
    ///
    /// The market's own team is the ticker segment after the final `-`;
    /// the opponent comes from the structural block. Markets whose ticker
    /// does not carry the team-vs-team structure (or whose trailing team
    /// is neither side of it) are not representable and map to `None`.
    fn map_market(value: &Value) -> Option<MarketRecord> {
        let ticker = Self::pick_str(value, &["ticker", "market_ticker", "id"])?;
        let title = Self::pick_str(value, &["title", "question", "market_title"])
            .unwrap_or_default()
            .to_string();

        let parsed = ticker::parse_ticker(ticker)?;
        let team = ticker.rsplit('-').next()?.to_ascii_uppercase();
        let opponent = if team == parsed.home_code {
            parsed.away_code.clone()
        } else if team == parsed.away_code {
            parsed.home_code.clone()
        } else {
            return None;
        };

        let yes_ask = Self::ask_price(value, &["yes_ask", "ask_yes", "yesAsk"]);
        let no_ask = Self::ask_price(value, &["no_ask", "ask_no", "noAsk"]);

        Some(MarketRecord {
            venue: Venue::Kalshi,
            identifier: ticker.to_string(),
            league: Some(parsed.league),
            title,
            outcomes: [Outcome::new(team, yes_ask), Outcome::new(opponent, no_ask)],
        })
    }

    /// Fetch all open markets for a series ticker (e.g. `KXNBAGAME`),
    /// keeping only team-vs-team markets the resolver can work with.
    pub async fn open_markets_for_series(&self, series_ticker: &str) -> Result<Vec<MarketRecord>> {
        let params = vec![
            ("series_ticker", series_ticker.to_string()),
            ("status", "open".to_string()),
            ("limit", SERIES_PAGE_LIMIT.to_string()),
        ];
        let value = self
            .request_json(Method::GET, "/markets", Some(&params))
            .await?;

        let Some(markets) = Self::pick_array(&value, &["markets", "data", "results"]) else {
            warn!(series = %series_ticker, "Kalshi response carried no market list");
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        let mut skipped = 0usize;
        for market in markets {
            match Self::map_market(market) {
                Some(record) => out.push(record),
                None => skipped += 1,
            }
        }

        debug!(
            series = %series_ticker,
            kept = out.len(),
            skipped,
            "fetched open Kalshi markets"
        );
        Ok(out)
    }
}
