// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

mod api;
mod cache;
mod company;
mod config;
mod error;
mod fetcher;
mod labels;
mod models;
mod pipeline;
mod transform;
mod utils;
mod validate;
mod workbook;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::api::{AlphaVantageClient, RetryPolicy, YahooClient};
use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::fetcher::FetchMode;
use crate::pipeline::{run_export, ExportRequest};
use crate::validate::{parse_ticker, verify_ticker_exists, DEFAULT_YEARS, MAX_YEARS, MIN_YEARS};

/// Export quarterly financial statements for a ticker to an Excel workbook.
#[derive(Parser, Debug)]
#[command(
    name = "statements-rs",
    version,
    about,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Ticker symbol, 1-5 letters or digits
    #[arg(required = true, value_parser = parse_ticker)]
    ticker: Option<String>,

    /// Number of years of quarterly data to export
    #[arg(
        default_value_t = DEFAULT_YEARS,
        value_parser = clap::value_parser!(u8).range(MIN_YEARS as i64..=MAX_YEARS as i64)
    )]
    years: u8,

    /// Use previously downloaded statements instead of calling the API
    #[arg(long)]
    cache_only: bool,

    /// Path to the JSON configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory for cached statement JSON (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory for the generated workbook (overrides the config file)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the configuration file
    Init {
        /// API key to store; a placeholder is written when omitted
        #[arg(long)]
        api_key: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,

        /// Where to write the configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(Command::Init {
        api_key,
        force,
        config,
    }) = &cli.command
    {
        return init(config, api_key.as_deref(), *force);
    }

    // `required = true` guarantees a ticker whenever no subcommand is given.
    let symbol = cli.ticker.clone().context("missing ticker symbol")?;
    let mode = if cli.cache_only {
        FetchMode::CacheOnly
    } else {
        FetchMode::Network
    };

    let config = resolve_config(&cli, mode)?;
    let client = api::build_http_client(&config.http)?;
    let retry = RetryPolicy::from_settings(&config.http);
    let yahoo = YahooClient::new(client.clone(), &config.endpoints, retry.clone());

    verify_ticker_exists(&yahoo, &symbol).await?;

    let alpha_vantage = AlphaVantageClient::new(
        client,
        config.endpoints.alpha_vantage.clone(),
        config.api_key.trim().to_string(),
        retry,
    );

    info!(symbol = %symbol, years = cli.years, ?mode, "starting export");
    let request = ExportRequest {
        symbol: symbol.clone(),
        years: cli.years,
        mode,
    };
    let summary = run_export(&config, &request, &alpha_vantage, &yahoo)
        .await
        .with_context(|| format!("export for {} failed", symbol))?;

    if !summary.fetched {
        println!("Using cached data from {}", config.data_dir.display());
    }
    for sheet in summary.plan.sheets.iter().skip(1) {
        println!(
            "{}: {} line items x {} quarters",
            sheet.name,
            sheet.data_rows().len(),
            sheet.header().len().saturating_sub(1)
        );
    }
    println!("\n✅ Workbook written: {}", summary.workbook.display());

    Ok(())
}

fn init(path: &Path, api_key: Option<&str>, force: bool) -> Result<()> {
    let created = config::init_config(path, api_key, force)
        .with_context(|| format!("failed to write {}", path.display()))?;
    if created {
        println!("✅ Config written: {}", path.display());
        if api_key.is_none() {
            println!("Edit the api_key field before fetching statements.");
        }
    } else {
        println!(
            "{} already exists, use --force to overwrite it",
            path.display()
        );
    }
    Ok(())
}

/// Loads the config file and applies command line overrides. Cache-only runs
/// work without a config file since no API key is needed.
fn resolve_config(cli: &Cli, mode: FetchMode) -> Result<Config> {
    let mut config = match config::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) if mode == FetchMode::CacheOnly && !cli.config.exists() => {
            info!(error = %e, "no config file, using defaults for cache-only run");
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}
