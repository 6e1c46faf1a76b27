use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::info;

use crate::adapters::{GammaDirectory, KalshiClient};
use crate::config::AppConfig;
use crate::domain::{League, MarketRecord, Outcome, Resolution, TeamAliasBook, Venue};
use crate::error::Result;
use crate::resolver::{self, MarketResolver};
use crate::services::{ScanOutcome, ScoutReport, ScoutService};

#[derive(Parser)]
#[command(name = "arbscout")]
#[command(version = "0.1.0")]
#[command(about = "Kalshi <-> Polymarket sports market matcher and arbitrage scout", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config directory
    #[arg(short, long, default_value = "config")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan configured Kalshi series for cross-venue arbitrage
    Scan {
        /// Restrict to specific series tickers (default: all configured)
        #[arg(short, long)]
        series: Vec<String>,
        /// Override the configured profit floor (e.g. 0.005)
        #[arg(long)]
        min_profit: Option<Decimal>,
        /// Write the full report as JSON to this path
        #[arg(long)]
        json_out: Option<PathBuf>,
        /// Rescan every N seconds until interrupted
        #[arg(long)]
        watch: Option<u64>,
    },
    /// Resolve one Kalshi market to its Polymarket equivalent
    Resolve {
        /// Kalshi ticker (e.g. KXNBAGAME-25DEC23BKNPHI-PHI)
        ticker: String,
        /// Market title, used by the fuzzy tier when the ticker fails to
        /// parse
        #[arg(short, long, default_value = "")]
        title: String,
    },
    /// Print the team alias dictionary for a league
    Teams {
        /// League (nba, nfl, nhl, mlb)
        league: League,
    },
}

/// Alias book from the configured override file, or the built-in table
pub fn build_alias_book(cfg: &AppConfig) -> Result<TeamAliasBook> {
    match &cfg.resolver.alias_file {
        Some(path) => TeamAliasBook::from_path(path),
        None => TeamAliasBook::builtin(),
    }
}

fn build_resolver(cfg: &AppConfig, aliases: Arc<TeamAliasBook>) -> Result<MarketResolver> {
    let directory = GammaDirectory::new(Some(&cfg.venues.gamma_api_base))?;
    Ok(MarketResolver::new(
        Arc::new(directory),
        aliases,
        cfg.resolver.min_similarity,
    ))
}

/// Run the scout across the configured series, once or on an interval
pub async fn run_scan(
    cfg: &AppConfig,
    series: Vec<String>,
    min_profit: Option<Decimal>,
    json_out: Option<PathBuf>,
    watch: Option<u64>,
) -> Result<()> {
    let aliases = Arc::new(build_alias_book(cfg)?);
    let resolver = Arc::new(build_resolver(cfg, aliases.clone())?);
    let kalshi = KalshiClient::new(Some(&cfg.venues.kalshi_api_base))?;

    let mut scout_cfg = cfg.scout.clone();
    if !series.is_empty() {
        scout_cfg.series = series;
    }
    let min_profit = min_profit.unwrap_or(cfg.arbitrage.min_profit);

    let scout = ScoutService::new(kalshi, resolver, aliases, scout_cfg, min_profit);

    match watch {
        None => {
            let report = scout.run_once().await;
            print_report(&report);
            write_report(&report, json_out.as_deref())?;
        }
        Some(secs) => {
            let mut ticker = interval(Duration::from_secs(secs.max(1)));
            info!(interval_secs = secs.max(1), "watch mode, ctrl-c to stop");
            loop {
                ticker.tick().await;
                let report = scout.run_once().await;
                print_report(&report);
                write_report(&report, json_out.as_deref())?;
            }
        }
    }

    Ok(())
}

fn print_report(report: &ScoutReport) {
    for scan in report.with_opportunities() {
        let ScanOutcome::Matched {
            slug,
            confidence,
            opportunities,
            ..
        } = &scan.outcome
        else {
            continue;
        };

        println!("{}", "=".repeat(60));
        println!("Kalshi:     {} | {}", scan.ticker, scan.title);
        println!("Polymarket: {} ({})", slug, confidence);
        for opp in opportunities {
            println!(
                "  {} Kalshi + {} Polymarket on {}: cost {:.3}, profit {:.3}",
                opp.side_a, opp.side_b, opp.outcome_label, opp.cost, opp.profit
            );
        }
    }

    println!("{}", "=".repeat(60));
    println!(
        "{} markets scanned: {} matched, {} without a Polymarket equivalent, {} failed, {} with arbitrage",
        report.scans.len(),
        report.matched(),
        report.unmatched(),
        report.failed(),
        report.with_opportunities().count(),
    );
}

fn write_report(report: &ScoutReport, path: Option<&std::path::Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "report written");
    Ok(())
}

/// Resolve a single market and print the outcome
pub async fn run_resolve(cfg: &AppConfig, ticker: &str, title: &str) -> Result<()> {
    let aliases = Arc::new(build_alias_book(cfg)?);
    let market_resolver = build_resolver(cfg, aliases.clone())?;

    let parsed = resolver::parse_ticker(ticker);
    let outcomes = match &parsed {
        Some(p) => [
            Outcome::new(p.home_code.clone(), None),
            Outcome::new(p.away_code.clone(), None),
        ],
        None => [Outcome::new("", None), Outcome::new("", None)],
    };

    if let Some(p) = &parsed {
        match resolver::derive_slug(p, &aliases) {
            Some(slug) => println!("derived slug: {}", slug),
            None => println!("derived slug: (team code not in alias book)"),
        }
    } else {
        println!("derived slug: (ticker is not a team-vs-team structure)");
    }

    let record = MarketRecord {
        venue: Venue::Kalshi,
        identifier: ticker.to_string(),
        league: parsed.as_ref().map(|p| p.league),
        title: title.to_string(),
        outcomes,
    };

    match market_resolver.resolve(&record).await? {
        Resolution::Matched(pair) => {
            println!("matched:      {} ({})", pair.market_b.identifier, pair.confidence);
            println!("title:        {}", pair.market_b.title);
            for outcome in &pair.market_b.outcomes {
                match outcome.price_yes {
                    Some(price) => println!("  {} = {}", outcome.label, price),
                    None => println!("  {} = (no quote)", outcome.label),
                }
            }
        }
        Resolution::NoMatch => println!("no Polymarket equivalent found"),
    }

    Ok(())
}

/// Dump the alias dictionary for one league
pub fn run_teams(cfg: &AppConfig, league: League) -> Result<()> {
    let book = build_alias_book(cfg)?;

    let mut entries: Vec<_> = book.league_entries(league).collect();
    entries.sort_by_key(|(code, _)| *code);

    println!("{} teams ({}):", league, entries.len());
    for (code, alias) in entries {
        println!("  {:<4} {:<6} {}", code, alias.poly_abbr, alias.name);
    }

    Ok(())
}
