//! Property Lineage CLI
//!
//! Replays a version history into a fresh index and reports on it.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use familiar_lineage::{History, IndexBuilder, LineageConfig, VersionDefinition};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lineage")]
#[command(about = "Track field identity across schema versions")]
struct Cli {
    /// Path to a config file (defaults to lineage.toml lookup)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Commit every version of a history and print the index
    Replay {
        /// History file (JSON)
        history: PathBuf,
    },

    /// Show the manifest of one committed version
    Show {
        /// History file (JSON)
        history: PathBuf,
        /// Version label
        version: String,
    },

    /// Preview a candidate version against a history without committing it
    Preview {
        /// History file (JSON)
        history: PathBuf,
        /// Candidate version file (JSON)
        #[arg(short = 'n', long)]
        candidate: PathBuf,
    },

    /// Print the effective configuration
    Config {
        /// Write it to this path instead
        #[arg(long)]
        init: Option<String>,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = LineageConfig::load_from(cli.config.as_deref())?;
    let format = config.output.format;

    match cli.command {
        Commands::Replay { history } => {
            let builder = replay(&config, &history)?;
            println!("{}", format.render(builder.index())?);
            Ok(())
        }

        Commands::Show { history, version } => {
            let builder = replay(&config, &history)?;
            let manifest = builder
                .manifest(&version)
                .ok_or_else(|| anyhow!("Version {} not found", version))?;
            println!("{}", format.render(manifest)?);
            Ok(())
        }

        Commands::Preview { history, candidate } => {
            let builder = replay(&config, &history)?;
            let content = std::fs::read_to_string(&candidate)
                .with_context(|| format!("reading {}", candidate.display()))?;
            let candidate: VersionDefinition = serde_json::from_str(&content)?;

            let report = builder.preview(&candidate.properties(), &candidate.explicit_mapping()?);
            println!("{}", format.render(&report)?);

            if !report.is_complete() {
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Config { init } => {
            match init {
                Some(path) => {
                    config.save(&path)?;
                    println!("Wrote configuration to {}", path);
                }
                None => println!("{}", toml::to_string_pretty(&config)?),
            }
            Ok(())
        }
    }
}

fn replay(config: &LineageConfig, path: &Path) -> Result<IndexBuilder> {
    let history =
        History::load(path).with_context(|| format!("loading history {}", path.display()))?;
    let mut builder = IndexBuilder::with_config(config);
    history.replay(&mut builder)?;
    Ok(builder)
}
