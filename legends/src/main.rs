//! Console front end for the Legends combat engine.
//!
//! Recruit a party from the data files, then explore, shop and fight:
//!
//! ```bash
//! cargo run -p legends -- --data data --seed 42
//! ```
//!
//! Diagnostics go to stderr and are controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=legends_core=debug`).

mod camp;
mod console;

use camp::Camp;
use clap::Parser;
use console::Console;
use legends_core::{GameConfig, GameData};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "legends", version, about = "Turn-based party combat in the console")]
struct Args {
    /// Directory holding the hero, monster and item files
    #[arg(long)]
    data: Option<PathBuf>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Print battle events as JSON lines
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("legends=info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(dir) = args.data {
        config = config.with_data_dir(dir);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    config.validate()?;

    let data = GameData::load_dir(&config.data_dir)?;

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, data_dir = %config.data_dir.display(), "session starting");
    let rng = ChaCha8Rng::seed_from_u64(seed);

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout()).with_json(args.json);
    Camp::new(&config, &data, &mut console, rng).run()?;
    Ok(())
}
