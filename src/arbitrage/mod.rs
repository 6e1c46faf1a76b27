//! Riskless-arbitrage evaluation over a matched cross-venue pair.
//!
//! Exactly one of the two complementary outcomes settles at $1, so any
//! pair of opposing positions bought for a combined cost under $1 locks in
//! the difference. Two combinations exist per pair:
//!
//! 1. YES on Kalshi for the team + NO on Polymarket for the same team
//!    (priced as YES on the opposing outcome)
//! 2. YES on Polymarket for the team + NO on Kalshi
//!
//! Prices are exact decimals end to end; profits are often fractions of a
//! cent and float rounding at that resolution flips the sign.

use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{ArbitrageOpportunity, MatchedPair, Side, TeamAliasBook};

/// Enumerate the riskless combinations of `pair` with profit strictly
/// above `min_profit`.
///
/// Alignment is by team identity: the Kalshi market's own team
/// (`outcomes[0]`) is translated through the alias book to its canonical
/// name, and the Polymarket outcome carrying that name is the same-team
/// slot. A team code without a dictionary entry, or a Polymarket market
/// without an outcome bearing the canonical name, makes the pair
/// unevaluable; the result is empty, never a guess by outcome order.
///
/// A combination whose inputs include a missing quote is suppressed, not
/// priced with a default. Both combinations can qualify; ranking is the
/// caller's concern.
pub fn evaluate(
    pair: &MatchedPair,
    aliases: &TeamAliasBook,
    min_profit: Decimal,
) -> Vec<ArbitrageOpportunity> {
    let market_a = &pair.market_a;
    let market_b = &pair.market_b;

    let Some(league) = market_a.league else {
        debug!(identifier = %market_a.identifier, "no league on venue-A record, cannot align teams");
        return Vec::new();
    };

    let team_code = &market_a.outcomes[0].label;
    let Some(team_name) = aliases.canonical_name(league, team_code) else {
        debug!(
            identifier = %market_a.identifier,
            team = %team_code,
            "team code missing from alias book, cannot align outcomes"
        );
        return Vec::new();
    };

    let Some(poly_same) = market_b.outcome_labeled(team_name) else {
        debug!(
            identifier = %market_b.identifier,
            team = %team_name,
            "no venue-B outcome bears the canonical team name"
        );
        return Vec::new();
    };
    // outcome_opposing is Some whenever outcome_labeled is
    let poly_opposing = market_b
        .outcome_opposing(team_name)
        .expect("binary market has an opposing outcome");

    let kalshi_yes = market_a.outcomes[0].price_yes;
    let kalshi_no = market_a.outcomes[1].price_yes;
    let poly_yes = poly_same.price_yes;
    // The opposing outcome's quote IS the NO price for this team; the two
    // are complementary by construction, so derive only when the quote is
    // absent.
    let poly_no = poly_opposing
        .price_yes
        .or_else(|| poly_yes.map(|p| Decimal::ONE - p));

    let mut opportunities = Vec::new();

    // Combination 1: YES Kalshi + NO Polymarket
    if let (Some(a_yes), Some(b_no)) = (kalshi_yes, poly_no) {
        let cost = a_yes + b_no;
        let profit = Decimal::ONE - cost;
        if profit > min_profit {
            opportunities.push(ArbitrageOpportunity {
                outcome_label: team_name.to_string(),
                side_a: Side::Yes,
                side_b: Side::No,
                cost,
                profit,
            });
        }
    }

    // Combination 2: YES Polymarket + NO Kalshi
    if let (Some(b_yes), Some(a_no)) = (poly_yes, kalshi_no) {
        let cost = b_yes + a_no;
        let profit = Decimal::ONE - cost;
        if profit > min_profit {
            opportunities.push(ArbitrageOpportunity {
                outcome_label: team_name.to_string(),
                side_a: Side::No,
                side_b: Side::Yes,
                cost,
                profit,
            });
        }
    }

    opportunities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{League, MarketRecord, MatchConfidence, Outcome, Venue};
    use rust_decimal_macros::dec;

    fn kalshi_market(
        team: &str,
        opponent: &str,
        yes_ask: Option<Decimal>,
        no_ask: Option<Decimal>,
    ) -> MarketRecord {
        MarketRecord {
            venue: Venue::Kalshi,
            identifier: format!("KXNBAGAME-25DEC23BKNPHI-{}", team),
            league: Some(League::Nba),
            title: "Will they win?".to_string(),
            outcomes: [Outcome::new(team, yes_ask), Outcome::new(opponent, no_ask)],
        }
    }

    fn poly_market(prices: [(&str, Option<Decimal>); 2]) -> MarketRecord {
        MarketRecord {
            venue: Venue::Polymarket,
            identifier: "nba-bkn-phi-2025-12-23".to_string(),
            league: Some(League::Nba),
            title: "Nets vs. 76ers".to_string(),
            outcomes: [
                Outcome::new(prices[0].0, prices[0].1),
                Outcome::new(prices[1].0, prices[1].1),
            ],
        }
    }

    fn pair(market_a: MarketRecord, market_b: MarketRecord) -> MatchedPair {
        MatchedPair {
            market_a,
            market_b,
            confidence: MatchConfidence::Deterministic,
        }
    }

    fn book() -> TeamAliasBook {
        TeamAliasBook::builtin().unwrap()
    }

    #[test]
    fn reports_profitable_combination_and_filters_losing_one() {
        // Kalshi PHI: yes 0.40 / no 0.55; Polymarket: 76ers 0.62, Nets 0.38
        let pair = pair(
            kalshi_market("PHI", "BKN", Some(dec!(0.40)), Some(dec!(0.55))),
            poly_market([
                ("Philadelphia 76ers", Some(dec!(0.62))),
                ("Brooklyn Nets", Some(dec!(0.38))),
            ]),
        );

        let opportunities = evaluate(&pair, &book(), Decimal::ZERO);

        // Combination 1: 0.40 + 0.38 = 0.78, profit 0.22.
        // Combination 2: 0.62 + 0.55 = 1.17, profit -0.17, filtered.
        assert_eq!(opportunities.len(), 1);
        let opp = &opportunities[0];
        assert_eq!(opp.outcome_label, "Philadelphia 76ers");
        assert_eq!(opp.side_a, Side::Yes);
        assert_eq!(opp.side_b, Side::No);
        assert_eq!(opp.cost, dec!(0.78));
        assert_eq!(opp.profit, dec!(0.22));
    }

    #[test]
    fn alignment_follows_team_identity_not_outcome_order() {
        // Same prices, Polymarket outcomes listed in the other order
        let pair = pair(
            kalshi_market("PHI", "BKN", Some(dec!(0.40)), Some(dec!(0.55))),
            poly_market([
                ("Brooklyn Nets", Some(dec!(0.38))),
                ("Philadelphia 76ers", Some(dec!(0.62))),
            ]),
        );

        let opportunities = evaluate(&pair, &book(), Decimal::ZERO);
        assert_eq!(opportunities.len(), 1);
        assert_eq!(opportunities[0].cost, dec!(0.78));
    }

    #[test]
    fn swapping_the_keyed_team_mirrors_the_combinations() {
        let poly = poly_market([
            ("Philadelphia 76ers", Some(dec!(0.62))),
            ("Brooklyn Nets", Some(dec!(0.38))),
        ]);

        // Keyed to PHI: yes 0.30 / no 0.45. The BKN-keyed view of the same
        // priced pair swaps the roles of the two asks.
        let for_phi = pair(
            kalshi_market("PHI", "BKN", Some(dec!(0.30)), Some(dec!(0.45))),
            poly.clone(),
        );
        let for_bkn = pair(
            kalshi_market("BKN", "PHI", Some(dec!(0.45)), Some(dec!(0.30))),
            poly,
        );

        // Report everything so both combinations are visible
        let phi = evaluate(&for_phi, &book(), dec!(-10));
        let bkn = evaluate(&for_bkn, &book(), dec!(-10));
        assert_eq!(phi.len(), 2);
        assert_eq!(bkn.len(), 2);

        // Combination 1 of PHI == combination 2 of BKN and vice versa
        assert_eq!(phi[0].cost, bkn[1].cost);
        assert_eq!(phi[1].cost, bkn[0].cost);
    }

    #[test]
    fn unknown_team_code_yields_empty_not_error() {
        let pair = pair(
            kalshi_market("LAX", "PHI", Some(dec!(0.40)), Some(dec!(0.55))),
            poly_market([
                ("Philadelphia 76ers", Some(dec!(0.62))),
                ("Brooklyn Nets", Some(dec!(0.38))),
            ]),
        );
        assert!(evaluate(&pair, &book(), Decimal::ZERO).is_empty());
    }

    #[test]
    fn canonical_name_absent_from_venue_b_yields_empty() {
        // Search matched the wrong game: neither outcome is the 76ers
        let pair = pair(
            kalshi_market("PHI", "BKN", Some(dec!(0.40)), Some(dec!(0.55))),
            poly_market([
                ("Los Angeles Lakers", Some(dec!(0.50))),
                ("Boston Celtics", Some(dec!(0.50))),
            ]),
        );
        assert!(evaluate(&pair, &book(), Decimal::ZERO).is_empty());
    }

    #[test]
    fn missing_kalshi_ask_suppresses_only_the_combination_needing_it() {
        // No YES ask on Kalshi: combination 1 is unpriceable; combination 2
        // still evaluates from the NO ask.
        let pair = pair(
            kalshi_market("PHI", "BKN", None, Some(dec!(0.30))),
            poly_market([
                ("Philadelphia 76ers", Some(dec!(0.62))),
                ("Brooklyn Nets", Some(dec!(0.38))),
            ]),
        );

        let opportunities = evaluate(&pair, &book(), Decimal::ZERO);
        assert_eq!(opportunities.len(), 1);
        assert_eq!(opportunities[0].side_a, Side::No);
        assert_eq!(opportunities[0].side_b, Side::Yes);
        assert_eq!(opportunities[0].cost, dec!(0.92));
    }

    #[test]
    fn missing_opposing_quote_derives_complement() {
        // Opposing outcome unquoted: NO price falls back to 1 - 0.62
        let pair = pair(
            kalshi_market("PHI", "BKN", Some(dec!(0.40)), None),
            poly_market([
                ("Philadelphia 76ers", Some(dec!(0.62))),
                ("Brooklyn Nets", None),
            ]),
        );

        let opportunities = evaluate(&pair, &book(), Decimal::ZERO);
        assert_eq!(opportunities.len(), 1);
        assert_eq!(opportunities[0].cost, dec!(0.78));
    }

    #[test]
    fn all_quotes_missing_yields_empty() {
        let pair = pair(
            kalshi_market("PHI", "BKN", None, None),
            poly_market([("Philadelphia 76ers", None), ("Brooklyn Nets", None)]),
        );
        assert!(evaluate(&pair, &book(), Decimal::ZERO).is_empty());
    }

    #[test]
    fn min_profit_threshold_is_strict() {
        // Combination 1 cost 0.95 -> profit exactly 0.05
        let pair = pair(
            kalshi_market("PHI", "BKN", Some(dec!(0.57)), Some(dec!(0.60))),
            poly_market([
                ("Philadelphia 76ers", Some(dec!(0.62))),
                ("Brooklyn Nets", Some(dec!(0.38))),
            ]),
        );

        assert!(evaluate(&pair, &book(), dec!(0.05)).is_empty());
        let looser = evaluate(&pair, &book(), dec!(0.049));
        assert_eq!(looser.len(), 1);
        assert_eq!(looser[0].profit, dec!(0.05));
    }

    #[test]
    fn evaluation_is_pure_over_identical_inputs() {
        let pair = pair(
            kalshi_market("PHI", "BKN", Some(dec!(0.40)), Some(dec!(0.55))),
            poly_market([
                ("Philadelphia 76ers", Some(dec!(0.62))),
                ("Brooklyn Nets", Some(dec!(0.38))),
            ]),
        );
        let book = book();

        let first = evaluate(&pair, &book, Decimal::ZERO);
        let second = evaluate(&pair, &book, Decimal::ZERO);
        assert_eq!(first, second);
    }
}
