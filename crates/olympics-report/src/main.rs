//! # Olympics Report
//!
//! Loads the Olympics dataset once and prints an analytics report.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use olympics_analytics::{OlympicsEngine, ReportRequest};
use olympics_domain::DEFAULT_LEADERBOARD_LIMIT;
use olympics_report::{Config, LogFormat};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "olympics-report")]
#[command(about = "Medal tallies, participation trends and athlete statistics")]
struct Args {
    /// Athlete events CSV (overrides OLYMPICS_EVENTS_PATH)
    #[arg(long)]
    events: Option<PathBuf>,

    /// NOC regions CSV (overrides OLYMPICS_REGIONS_PATH)
    #[arg(long)]
    regions: Option<PathBuf>,

    /// Restrict the medal tally to one edition
    #[arg(short, long)]
    year: Option<i32>,

    /// Restrict the medal tally to one country and add country sections
    #[arg(short, long)]
    country: Option<String>,

    /// Restrict the athlete leaderboard and physique summary to one sport
    #[arg(short, long)]
    sport: Option<String>,

    /// Medal tally rows to print, 0 for the full list
    #[arg(long, default_value = "10")]
    top: usize,

    /// Athletes on the leaderboard
    #[arg(long, default_value_t = DEFAULT_LEADERBOARD_LIMIT)]
    athletes: usize,

    /// Output format
    #[arg(long, value_enum, default_value = "markdown")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(events) = args.events {
        config.data.events = events;
    }
    if let Some(regions) = args.regions {
        config.data.regions = regions;
    }

    init_tracing(&config);

    info!(
        version = olympics_report::VERSION,
        events = %config.data.events.display(),
        regions = %config.data.regions.display(),
        season = ?config.season,
        "Loading Olympics dataset"
    );

    let engine = OlympicsEngine::load(&config.data, &config.preprocess_options())?;

    let request = ReportRequest {
        year: args.year,
        country: args.country,
        sport: args.sport,
        tally_limit: (args.top > 0).then_some(args.top),
        athlete_limit: args.athletes,
    };

    let output = match args.format {
        OutputFormat::Markdown => engine.generate_report_markdown(&request)?,
        OutputFormat::Json => engine.generate_report_json(&request)?,
    };
    println!("{output}");

    info!("Report complete");
    Ok(())
}

/// Logs go to stderr so the report on stdout stays clean.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
