//! gg - Match action sequence generator CLI
//!
//! Loads recorded matches (JSON), fits the model once and prints generated
//! sequences as JSON on stdout. Logs go to stderr (`RUST_LOG`, default `info`).
//! A `.env` file in the working directory (or a parent) is loaded first.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gg_core::data::parse_file_list;
use gg_core::{api, GameContext, GameResponse, GameStyle, GenerationRequest, JsonFileSource};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gg")]
#[command(about = "Generate match action sequences from recorded match data", long_about = None)]
struct Cli {
    /// Comma-separated match files; falls back to GG_FILES_PATH / FILES_PATH
    #[arg(long, global = true)]
    files: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one action sequence
    Generate {
        /// Action that opens the sequence (e.g. "pass")
        #[arg(long)]
        start: String,

        /// Target duration in minutes
        #[arg(long, default_value_t = 90)]
        minutes: u32,

        /// attacking | defensive | neutral
        #[arg(long, default_value = "neutral")]
        style: String,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Pretty-print the JSON output
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Print the fitted transition matrix and action profiles
    Inspect {
        /// Pretty-print the JSON output
        #[arg(long, default_value = "false")]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let env_file = load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = &env_file {
        debug!(path = %path.display(), "loaded environment file");
    }

    let cli = Cli::parse();
    let context = load_context(cli.files.as_deref())?;

    match cli.command {
        Commands::Generate { start, minutes, style, seed, pretty } => {
            let style: GameStyle = style.parse()?;
            let request = GenerationRequest::new(start, minutes, style);
            let mut rng = api::rng_for(seed);
            let sequence = context
                .sampler()
                .generate(&request, &mut rng)
                .with_context(|| format!("Failed to generate from '{}'", request.start_action))?;

            let response = GameResponse { game_sequence: sequence.into_steps() };
            print_json(&response, pretty)?;
        }

        Commands::Inspect { pretty } => {
            print_json(&context.summary(), pretty)?;
        }
    }

    Ok(())
}

/// Standard `.env` search (cwd + parents). A missing file is not an error.
fn load_dotenv() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}

/// `--files` wins; otherwise the file list comes from the environment.
fn load_context(files: Option<&str>) -> Result<GameContext> {
    let context = match files {
        Some(list) => {
            let files = parse_file_list(list);
            if files.is_empty() {
                bail!("--files lists no dataset files");
            }
            info!(files = files.len(), "loading dataset");
            GameContext::from_provider(&JsonFileSource::new(files))
        }
        None => GameContext::from_env(),
    };
    context.context("Failed to build game context")
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
