//! pub2agents - curation pipeline for literature-mined bio.agents entries
//!
//! ## Commands
//!
//! - `preprints rerun`: re-check the preprint watchlist
//! - `preprints initial`: check a fresh batch and extend the watchlist
//! - `curate`: full monthly pass from pub2tools output to a curation sheet
//! - `insert`: push curated agents to the registry

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pub2agents_core::{CurateLimit, Pub2AgentsConfig, YearMonth};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pub2agents")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Curate pub2tools output into bio.agents entries", long_about = None)]
struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preprint watchlist passes
    Preprints {
        #[command(subcommand)]
        action: PreprintAction,
    },

    /// Process a pub2tools run and write the curation sheet
    Curate {
        /// pub2tools output (`{count, list}` JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Preprint watchlist
        #[arg(short, long)]
        store: PathBuf,

        /// pub2tools log to read the run month from
        #[arg(long, conflicts_with = "month")]
        log: Option<PathBuf>,

        /// Run month (YYYY-MM); defaults to the previous month
        #[arg(long)]
        month: Option<YearMonth>,

        /// Fresh agents to put in the sheet, a number or `all`
        #[arg(long, default_value = "all")]
        limit: CurateLimit,

        /// Directory for the sheet and companion files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Insert curated agents into the registry
    Insert {
        /// Agents to insert (`{count, list}` JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Actually write to the registry
        #[arg(long)]
        write: bool,

        /// Only run registry validation
        #[arg(long, conflicts_with = "write")]
        validate_only: bool,

        #[arg(long, env = "PUB2AGENTS_USERNAME", hide_env_values = true)]
        username: String,

        #[arg(long, env = "PUB2AGENTS_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
enum PreprintAction {
    /// Re-check stored preprints; the store keeps only those still unpublished
    Rerun {
        #[arg(short, long)]
        store: PathBuf,

        /// Where to write the newly published agents
        #[arg(long)]
        published_out: Option<PathBuf>,
    },

    /// Check a batch and append its preprints to the store
    Initial {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        store: PathBuf,

        /// Where to write the published agents
        #[arg(long)]
        published_out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Preprints { action } => match action {
            PreprintAction::Rerun {
                store,
                published_out,
            } => commands::preprints_rerun(&config, store, published_out).await?,
            PreprintAction::Initial {
                input,
                store,
                published_out,
            } => commands::preprints_initial(&config, &input, store, published_out).await?,
        },
        Commands::Curate {
            input,
            store,
            log,
            month,
            limit,
            out_dir,
        } => {
            let date = match (log, month) {
                (Some(log), _) => pub2agents_core::read_run_date(&log)?,
                (None, Some(month)) => month,
                (None, None) => commands::previous_month(chrono::Local::now().date_naive()),
            };
            commands::curate(&config, &input, store, date, limit, &out_dir).await?
        }
        Commands::Insert {
            input,
            write,
            validate_only,
            username,
            password,
        } => commands::insert(&config, &input, write, validate_only, &username, &password).await?,
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Pub2AgentsConfig, Box<dyn std::error::Error>> {
    let config = match path.map(PathBuf::from).or_else(Pub2AgentsConfig::default_path) {
        Some(path) => Pub2AgentsConfig::load(&path)?,
        None => Pub2AgentsConfig::default(),
    };
    config.validate()?;
    Ok(config)
}
