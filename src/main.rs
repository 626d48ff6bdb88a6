//! # Tabvault CLI (`tabvault`)
//!
//! The `tabvault` binary ingests the OLGA guitar-tab archive into a SQLite
//! store and serves queries over it.
//!
//! ## Usage
//!
//! ```bash
//! tabvault --config ./config/tabvault.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tabvault init` | Create the SQLite database, tables, FTS index, and triggers |
//! | `tabvault ingest <archive>` | Extract, decompress, and populate the store |
//! | `tabvault search "<query>"` | Full-text search over tab artists and titles |
//! | `tabvault get <title>` | Retrieve one document's content verbatim |
//! | `tabvault stats` | Show row counts and database size |
//!
//! ## Examples
//!
//! ```bash
//! # Initialize the database
//! tabvault init --config ./config/tabvault.toml
//!
//! # Full ingest (hours of gzip on the real archive — interruptible, resumable)
//! tabvault ingest ~/olga.zip
//!
//! # Re-run only the populate phase after an interrupted run
//! tabvault ingest ~/olga.zip --skip-extract --skip-decompress
//!
//! # Search and fetch
//! tabvault search "queen"
//! tabvault get bohemian_rhapsody.txt --artist Queen
//! ```

mod archive;
mod classify;
mod config;
mod db;
mod decompress;
mod extract;
mod get;
mod ingest;
mod migrate;
mod models;
mod progress;
mod search;
mod stats;

use anyhow::bail;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::progress::ProgressMode;

/// Tabvault — OLGA tab-archive ingestion and search.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/tabvault.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "tabvault",
    about = "Tabvault — converts the OLGA tab archive into a searchable SQLite store",
    version,
    long_about = "Tabvault ingests the OLGA guitar-tab archive (a zip of gzip-wrapped text \
    files) into a normalized SQLite store with an FTS5 search index, and exposes full-text \
    search and exact lookup over it. Every ingest phase is resumable after interruption."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/tabvault.toml`. Database path, working
    /// directory, and exclusion patterns are read from this file.
    #[arg(long, global = true, default_value = "./config/tabvault.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite file, the `tabs` and `resources` tables, the
    /// `tabs_fts` FTS5 index, and the triggers that keep the index in sync.
    /// This command is idempotent — running it multiple times is safe.
    Init,

    /// Ingest a tab archive into the store.
    ///
    /// Runs three phases in order: extract `.gz` entries from the zip into
    /// the workdir, decompress them in place, then classify eligible files
    /// and insert records. Each phase skips work a prior run already did,
    /// so an interrupted ingest can simply be re-invoked.
    Ingest {
        /// Path to the archive zip file.
        archive: PathBuf,

        /// Skip the archive-extraction phase.
        #[arg(long)]
        skip_extract: bool,

        /// Skip the gunzip phase.
        #[arg(long)]
        skip_decompress: bool,

        /// Skip the database-population phase.
        #[arg(long)]
        skip_populate: bool,

        /// Progress reporting on stderr: `off`, `human`, or `json`.
        /// Defaults to `human` when stderr is a TTY, otherwise `off`.
        #[arg(long)]
        progress: Option<String>,
    },

    /// Search indexed tabs by artist or title.
    ///
    /// Queries the FTS5 index and prints matches in the engine's relevance
    /// order. Results are raw (artist, title) pairs; display formatting is
    /// up to the consumer.
    Search {
        /// The search query string.
        query: String,

        /// Also match resource titles (substring match; resources carry
        /// no FTS index).
        #[arg(long)]
        resources: bool,

        /// Maximum number of results per table.
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Retrieve one document's content verbatim.
    ///
    /// With `--artist` the key is (artist, title) against the tabs table;
    /// without it the title keys the resources table. Exits nonzero when
    /// no row matches.
    Get {
        /// Raw document title (the ingested file name, extension included).
        title: String,

        /// Artist name, for tab lookups.
        #[arg(long)]
        artist: Option<String>,
    },

    /// Show store statistics.
    ///
    /// Prints tab, resource, artist, and index row counts plus the
    /// database file size.
    Stats,
}

fn parse_progress_mode(value: Option<&str>) -> anyhow::Result<ProgressMode> {
    match value {
        None => Ok(ProgressMode::default_for_tty()),
        Some("off") => Ok(ProgressMode::Off),
        Some("human") => Ok(ProgressMode::Human),
        Some("json") => Ok(ProgressMode::Json),
        Some(other) => bail!("Unknown progress mode: {}. Use off, human, or json.", other),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Ingest {
            archive,
            skip_extract,
            skip_decompress,
            skip_populate,
            progress,
        } => {
            let mode = parse_progress_mode(progress.as_deref())?;
            ingest::run_ingest(
                &cfg,
                &archive,
                skip_extract,
                skip_decompress,
                skip_populate,
                mode,
            )
            .await?;
        }
        Commands::Search {
            query,
            resources,
            limit,
        } => {
            search::run_search(&cfg, &query, resources, limit).await?;
        }
        Commands::Get { title, artist } => {
            get::run_get(&cfg, &title, artist.as_deref()).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
