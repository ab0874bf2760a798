//! Command line entry point for league-ranker
//!
//! Loads a season's schedule, computes converged ratings, stores them and
//! publishes the ranking snapshot and index.

use anyhow::Result;
use clap::Parser;
use league_ranker::config::AppConfig;
use league_ranker::metrics::MetricsCollector;
use league_ranker::schedule::{last_week, load_schedule};
use league_ranker::{
    RankingOutcome, RankingService, StaticTeamDirectory, StoreOutcome, TeamDirectory,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// League Ranker - opponent-adjusted power ratings from weekly results
#[derive(Parser)]
#[command(
    name = "league-ranker",
    version,
    about = "Compute opponent-adjusted power ratings from weekly league results",
    long_about = "League Ranker rates every team by the running average of its weekly game \
                 values (result, margin and opponent rating), re-sweeping the whole league \
                 until the ratings stop changing, then stores them and publishes ranked \
                 JSON snapshots."
)]
struct Args {
    /// Schedule file with every team's weekly scores
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to schedule JSON (teams with weekly scores)"
    )]
    schedule: PathBuf,

    /// Season the ratings belong to
    #[arg(long, value_name = "YEAR")]
    season: u32,

    /// Week the ratings belong to
    #[arg(
        short,
        long,
        value_name = "N",
        help = "Week number to store under (defaults to the last week with a game)"
    )]
    week: Option<u32>,

    /// Team metadata file
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to team metadata JSON (id, name, mascot)"
    )]
    teams: Option<PathBuf>,

    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Rankings directory override
    #[arg(long, value_name = "DIR", help = "Override rankings output directory")]
    rankings_dir: Option<PathBuf>,

    /// Ratings database override
    #[arg(long, value_name = "FILE", help = "Override ratings database path")]
    db: Option<PathBuf>,

    /// Sweep cap override
    #[arg(
        long,
        value_name = "N",
        help = "Fail if ratings have not converged after N sweeps"
    )]
    max_sweeps: Option<usize>,

    /// Replace ratings already stored for this season and week
    #[arg(long)]
    overwrite: bool,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (compute and print, store nothing)
    #[arg(long, help = "Compute and print rankings without storing or publishing")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment, file and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(dir) = &args.rankings_dir {
        config.output.rankings_dir = dir.clone();
    }

    if let Some(db) = &args.db {
        config.storage.ratings_db_path = db.clone();
    }

    if let Some(max_sweeps) = args.max_sweeps {
        config.engine.max_sweeps = Some(max_sweeps);
    }

    league_ranker::config::validate_config(&config)?;
    Ok(config)
}

/// Display startup banner with run information
fn display_startup_banner(config: &AppConfig, season: u32, week: u32) {
    info!("League Ranker v{}", league_ranker::VERSION);
    info!("   Service: {}", config.service.name);
    info!("   Season: {} week {}", season, week);
    info!("   Ratings db: {}", config.storage.ratings_db_path.display());
    info!("   Rankings dir: {}", config.output.rankings_dir.display());
    match config.engine.max_sweeps {
        Some(max) => info!("   Max sweeps: {}", max),
        None => info!("   Max sweeps: unbounded"),
    }
}

/// Print the ranking table to stdout
fn print_rankings(outcome: &RankingOutcome, directory: &dyn TeamDirectory) -> Result<()> {
    let mut rows: Vec<_> = outcome.ratings.values().collect();
    rows.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    println!("{:>4}  {:<32} {:>8}  {:>5}", "Rank", "Team", "Rating", "W-L");
    for (rank, rating) in rows.iter().enumerate() {
        let name = match directory.team(&rating.id)? {
            Some(team) => format!("{} {}", team.name, team.mascot),
            None => rating.id.clone(),
        };
        let wins = rating.wins();
        let losses = rating.games_played() - wins;
        println!(
            "{:>4}  {:<32} {:>8.4}  {:>2}-{:<2}",
            rank + 1,
            name,
            rating.rating,
            wins,
            losses
        );
    }
    println!("Converged after {} sweeps", outcome.sweeps);

    Ok(())
}

fn run(args: &Args, config: &AppConfig) -> Result<()> {
    let teams = load_schedule(&args.schedule)?;
    let week = args.week.unwrap_or_else(|| last_week(&teams));

    display_startup_banner(config, args.season, week);

    let directory: Arc<dyn TeamDirectory> = match &args.teams {
        Some(path) => Arc::new(StaticTeamDirectory::from_file(path)?),
        None => {
            warn!("No team metadata file given, index will list no teams");
            Arc::new(StaticTeamDirectory::default())
        }
    };

    let metrics = Arc::new(MetricsCollector::new()?);
    let service =
        RankingService::from_config(config, directory.clone())?.with_metrics(metrics.clone());

    let outcome = service.build(args.season, week, &teams)?;
    print_rankings(&outcome, directory.as_ref())?;

    if args.dry_run {
        info!("Dry run completed - nothing stored");
    } else {
        match service.store(args.season, week, &outcome.ratings, args.overwrite)? {
            StoreOutcome::AlreadyExists => {
                println!(
                    "Ratings for season {} week {} already exist; pass --overwrite to replace them",
                    args.season, week
                );
            }
            StoreOutcome::Stored { teams, snapshot } => {
                println!("Stored {} ratings, snapshot at {}", teams, snapshot.display());
            }
        }
    }

    if let Some(path) = &config.output.metrics_textfile {
        metrics.write_textfile(path)?;
        info!("Wrote metrics to {}", path.display());
    }

    Ok(())
}

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&args, &config) {
        error!("Ranking run failed: {:#}", e);
        std::process::exit(1);
    }
}
