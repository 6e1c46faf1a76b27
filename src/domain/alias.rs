//! Team-abbreviation dictionary shared by the resolver and the evaluator.
//!
//! Kalshi keys teams by exchange code (`PHI`), Polymarket by slug
//! abbreviation (`phi`) and by full name in outcome labels
//! (`Philadelphia 76ers`). The book translates between all three, per
//! league. It is constructed once, immutable afterward, and injected into
//! whatever needs it; no global state, so tests can hand in synthetic
//! dictionaries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::domain::League;
use crate::error::{Result, ScoutError};

/// Built-in dictionary covering NBA, NFL, NHL and MLB
const DEFAULT_ALIASES: &str = include_str!("../../data/team_aliases.json");

/// One team's cross-venue identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAlias {
    /// Full team name as Polymarket prints it in outcome labels
    pub name: String,
    /// Abbreviation Polymarket embeds in event slugs
    pub poly_abbr: String,
}

/// Immutable `(league, code) -> alias` dictionary with reverse lookup by
/// canonical name.
#[derive(Debug, Clone)]
pub struct TeamAliasBook {
    by_code: HashMap<League, HashMap<String, TeamAlias>>,
    by_name: HashMap<League, HashMap<String, String>>,
}

impl TeamAliasBook {
    /// Build the book from dictionary JSON shaped
    /// `{ "NBA": { "BKN": { "name": ..., "poly_abbr": ... }, ... }, ... }`.
    ///
    /// Leagues outside the supported set are rejected rather than skipped;
    /// a typo in the dictionary should fail loudly at load time, not
    /// surface later as unresolvable tickers.
    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: HashMap<String, HashMap<String, TeamAlias>> = serde_json::from_str(raw)?;

        let mut by_code: HashMap<League, HashMap<String, TeamAlias>> = HashMap::new();
        let mut by_name: HashMap<League, HashMap<String, String>> = HashMap::new();

        for (league_key, teams) in parsed {
            let league: League = league_key.parse().map_err(|_| {
                ScoutError::Validation(format!("unknown league '{}' in alias dictionary", league_key))
            })?;

            let mut codes = HashMap::with_capacity(teams.len());
            let mut names = HashMap::with_capacity(teams.len());
            for (code, alias) in teams {
                let code = code.to_ascii_uppercase();
                names.insert(alias.name.clone(), code.clone());
                if codes.insert(code.clone(), alias).is_some() {
                    return Err(ScoutError::Validation(format!(
                        "duplicate team code '{}' for league {}",
                        code, league
                    )));
                }
            }

            by_code.insert(league, codes);
            by_name.insert(league, names);
        }

        Ok(Self { by_code, by_name })
    }

    /// Load the embedded four-league dictionary
    pub fn builtin() -> Result<Self> {
        Self::from_json(DEFAULT_ALIASES)
    }

    /// Load a dictionary from a JSON file, for operators overriding the
    /// built-in table
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Look up a team by exchange code, case-insensitively
    pub fn get(&self, league: League, code: &str) -> Option<&TeamAlias> {
        self.by_code
            .get(&league)?
            .get(&code.to_ascii_uppercase())
    }

    /// Full team name for an exchange code
    pub fn canonical_name(&self, league: League, code: &str) -> Option<&str> {
        self.get(league, code).map(|alias| alias.name.as_str())
    }

    /// Polymarket slug abbreviation for an exchange code
    pub fn poly_abbr(&self, league: League, code: &str) -> Option<&str> {
        self.get(league, code).map(|alias| alias.poly_abbr.as_str())
    }

    /// Reverse lookup: exchange code for a full team name
    pub fn code_for_name(&self, league: League, name: &str) -> Option<&str> {
        self.by_name
            .get(&league)
            .and_then(|names| names.get(name))
            .map(String::as_str)
    }

    /// All `(code, alias)` entries for one league, unsorted
    pub fn league_entries(&self, league: League) -> impl Iterator<Item = (&str, &TeamAlias)> {
        self.by_code
            .get(&league)
            .into_iter()
            .flat_map(|teams| teams.iter().map(|(code, alias)| (code.as_str(), alias)))
    }
}
