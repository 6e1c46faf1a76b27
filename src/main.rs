use clap::Parser;
use tracing_subscriber::EnvFilter;

use arbscout::cli::{self, Cli, Commands};
use arbscout::config::{AppConfig, LoggingConfig};
use arbscout::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_from(&cli.config)?;
    init_logging(&config.logging);

    match cli.command {
        Commands::Scan {
            series,
            min_profit,
            json_out,
            watch,
        } => {
            cli::run_scan(&config, series, min_profit, json_out, watch).await?;
        }
        Commands::Resolve { ticker, title } => {
            cli::run_resolve(&config, &ticker, &title).await?;
        }
        Commands::Teams { league } => {
            cli::run_teams(&config, league)?;
        }
    }

    Ok(())
}

/// Initialize tracing. `RUST_LOG` wins over the configured level.
fn init_logging(cfg: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.level.clone()));

    if cfg.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
