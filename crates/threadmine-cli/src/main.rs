mod analyze;
mod check;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "threadmine")]
#[command(about = "Extract problem statements from discussion threads and rank product ideas")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyse one thread (JSON) and print the processed content
    Process {
        /// Path to a thread JSON file
        #[arg(long)]
        input: PathBuf,

        /// Category recorded in the thread context
        #[arg(long, default_value = "general")]
        category: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Validate a JSON array of generated ideas, then dedupe and rank them
    Rank {
        /// Path to a JSON file holding an array of raw ideas
        #[arg(long)]
        input: PathBuf,

        /// Maximum ideas to keep (defaults to `THREADMINE_MAX_IDEAS`)
        #[arg(long)]
        max: Option<usize>,

        /// Category applied to ideas that do not name one
        #[arg(long, default_value = "general")]
        category: String,
    },
    /// Load and validate the sources file
    Sources,
    /// Show the effective heuristic tables
    Lexicon,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = threadmine_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Process {
            input,
            category,
            pretty,
        }) => analyze::run_process(&config, &input, &category, pretty)?,
        Some(Commands::Rank {
            input,
            max,
            category,
        }) => analyze::run_rank(&config, &input, max, &category)?,
        Some(Commands::Sources) => check::run_sources(&config)?,
        Some(Commands::Lexicon) => check::run_lexicon(&config)?,
        None => println!("threadmine: run with --help to list commands"),
    }

    Ok(())
}
