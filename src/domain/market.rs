use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which venue a market record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Venue {
    Kalshi,
    Polymarket,
}

impl Venue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kalshi => "kalshi",
            Self::Polymarket => "polymarket",
        }
    }
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supported team-vs-team leagues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum League {
    Nba,
    Nfl,
    Nhl,
    Mlb,
}

impl League {
    /// All supported leagues, in scan order
    pub const ALL: [League; 4] = [League::Nba, League::Nfl, League::Nhl, League::Mlb];

    /// Lowercase token as it appears in Kalshi tickers and Polymarket slugs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nba => "nba",
            Self::Nfl => "nfl",
            Self::Nhl => "nhl",
            Self::Mlb => "mlb",
        }
    }

    /// Uppercase key used by the alias dictionary
    pub fn dictionary_key(&self) -> &'static str {
        match self {
            Self::Nba => "NBA",
            Self::Nfl => "NFL",
            Self::Nhl => "NHL",
            Self::Mlb => "MLB",
        }
    }

    /// Kalshi series ticker for the league's game markets
    pub fn series_ticker(&self) -> &'static str {
        match self {
            Self::Nba => "KXNBAGAME",
            Self::Nfl => "KXNFLGAME",
            Self::Nhl => "KXNHLGAME",
            Self::Mlb => "KXMLBGAME",
        }
    }

    /// Detect the league token embedded anywhere in a venue identifier.
    ///
    /// Kalshi tickers carry the token inside the series prefix
    /// (`KXNBAGAME-...`), Polymarket slugs as the leading segment
    /// (`nba-bkn-phi-...`).
    pub fn detect(identifier: &str) -> Option<League> {
        let lowered = identifier.to_ascii_lowercase();
        League::ALL
            .into_iter()
            .find(|league| lowered.contains(league.as_str()))
    }
}

impl std::fmt::Display for League {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for League {
    type Err = &'static str;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "nba" => Ok(Self::Nba),
            "nfl" => Ok(Self::Nfl),
            "nhl" => Ok(Self::Nhl),
            "mlb" => Ok(Self::Mlb),
            _ => Err("invalid league; expected nba|nfl|nhl|mlb"),
        }
    }
}

/// Side of a binary position (YES or NO)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Yes => Side::No,
            Side::No => Side::Yes,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Yes => "YES",
            Side::No => "NO",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One outcome of a binary event market.
///
/// `price_yes` is the cost of a $1-payout position on this outcome. An
/// absent quote stays `None`; zero is a real price, never a sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub label: String,
    pub price_yes: Option<Decimal>,
}

impl Outcome {
    pub fn new(label: impl Into<String>, price_yes: Option<Decimal>) -> Self {
        Self {
            label: label.into(),
            price_yes,
        }
    }
}

/// A venue-agnostic snapshot of one team-vs-team market.
///
/// The two outcomes are the complementary event outcomes ("team X wins" /
/// "team Y wins"). For a Kalshi record `outcomes[0]` is the market's own
/// team priced at the YES ask and `outcomes[1]` the opponent priced at the
/// NO ask; the two asks are quoted independently and need not sum to 1.
/// Polymarket outcome prices are complementary by construction of the
/// binary market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    pub venue: Venue,
    /// Unique venue identifier (Kalshi ticker or Polymarket slug)
    pub identifier: String,
    pub league: Option<League>,
    pub title: String,
    pub outcomes: [Outcome; 2],
}

impl MarketRecord {
    /// The outcome whose label matches `label`, if any
    pub fn outcome_labeled(&self, label: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.label == label)
    }

    /// The outcome opposite to the one labeled `label`, if the label exists
    pub fn outcome_opposing(&self, label: &str) -> Option<&Outcome> {
        if self.outcomes[0].label == label {
            Some(&self.outcomes[1])
        } else if self.outcomes[1].label == label {
            Some(&self.outcomes[0])
        } else {
            None
        }
    }
}

/// How a cross-venue match was established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchConfidence {
    /// Derived slug hit venue B's exact lookup
    Deterministic,
    /// Accepted from venue B's free-text search
    FuzzySearch,
}

impl MatchConfidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deterministic => "deterministic",
            Self::FuzzySearch => "fuzzy_search",
        }
    }
}

impl std::fmt::Display for MatchConfidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved cross-venue market pair, consumed immediately by evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedPair {
    pub market_a: MarketRecord,
    pub market_b: MarketRecord,
    pub confidence: MatchConfidence,
}

/// Terminal outcome of one resolution attempt.
///
/// `NoMatch` is an expected result ("no venue-B equivalent exists"), kept
/// apart from transport errors so callers can report the two differently.
#[derive(Debug, Clone)]
pub enum Resolution {
    Matched(Box<MatchedPair>),
    NoMatch,
}

impl Resolution {
    pub fn is_match(&self) -> bool {
        matches!(self, Resolution::Matched(_))
    }

    pub fn into_pair(self) -> Option<MatchedPair> {
        match self {
            Resolution::Matched(pair) => Some(*pair),
            Resolution::NoMatch => None,
        }
    }
}

/// One riskless-arbitrage combination across the two venues.
///
/// Both legs pay $1 if their outcome occurs and exactly one of the two
/// complementary outcomes must occur, so `profit = 1 - cost` is locked in
/// at purchase when positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    /// Canonical team name the combination is keyed to
    pub outcome_label: String,
    /// Position taken on Kalshi
    pub side_a: Side,
    /// Position taken on Polymarket, for the same team
    pub side_b: Side,
    pub cost: Decimal,
    pub profit: Decimal,
}
