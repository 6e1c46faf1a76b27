//! Structural parsing of Kalshi game tickers.
//!
//! A team-vs-team ticker embeds `<yy><mon><dd><away><home>` after the
//! series prefix, e.g. `KXNBAGAME-25DEC23BKNPHI`: year 25, month DEC,
//! day 23, away BKN, home PHI. The league token rides inside the series
//! prefix and is detected separately by substring search.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use crate::domain::{League, TeamAliasBook};

/// Date and team-code block: Year(2) Month(3) Day(2) Away(3) Home(3)
static TICKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2})([a-z]{3})(\d{2})([a-z]{3})([a-z]{3})").expect("ticker pattern is valid")
});

/// Structured fields recovered from a venue-A ticker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTicker {
    pub league: League,
    pub date: NaiveDate,
    /// Away-team exchange code, uppercased
    pub away_code: String,
    /// Home-team exchange code, uppercased
    pub home_code: String,
}

/// Translate a month token (`jan`..`dec`) to its number.
///
/// An unrecognized token is a parse failure for the whole ticker; it must
/// never fall back to January.
fn month_number(token: &str) -> Option<u32> {
    match token {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

/// Parse a ticker into its structured fields.
///
/// Returns `None` for anything that is not a team-vs-team game ticker:
/// missing league token, no structural block, bad month token, or an
/// impossible calendar date.
pub fn parse_ticker(ticker: &str) -> Option<ParsedTicker> {
    let league = League::detect(ticker)?;
    let lowered = ticker.to_ascii_lowercase();
    let caps = TICKER_PATTERN.captures(&lowered)?;

    let year = 2000 + caps[1].parse::<i32>().ok()?;
    let month = month_number(&caps[2])?;
    let day = caps[3].parse::<u32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    Some(ParsedTicker {
        league,
        date,
        away_code: caps[4].to_ascii_uppercase(),
        home_code: caps[5].to_ascii_uppercase(),
    })
}

/// Derive the venue-B slug `<league>-<away>-<home>-YYYY-MM-DD` from a
/// parsed ticker.
///
/// Returns `None` when either team code is missing from the alias book for
/// the ticker's league; an unknown code makes the slug underivable, which
/// is a soft failure for the caller to fall through on.
pub fn derive_slug(parsed: &ParsedTicker, book: &TeamAliasBook) -> Option<String> {
    let away = book.poly_abbr(parsed.league, &parsed.away_code)?;
    let home = book.poly_abbr(parsed.league, &parsed.home_code)?;

    Some(format!(
        "{}-{}-{}-{}",
        parsed.league,
        away,
        home,
        parsed.date.format("%Y-%m-%d")
    ))
}
