#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Chain Reaction, either in a window or
//! headless from a scripted list of moves.

mod config;
mod interactive;
mod replay;
mod simulation;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chain_reaction_core::{BoardSize, PlayerId};
use chain_reaction_world::query;
use clap::Parser;

use self::{
    config::{AppConfig, DEFAULT_CONFIG_PATH},
    simulation::Simulation,
};

/// Two-player chain reaction on a square grid.
#[derive(Debug, Parser)]
#[command(name = "chain-reaction", about = "Two-player chain reaction grid game")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board side length
    #[arg(long)]
    size: Option<u32>,

    /// Seat of the opening player (0 or 1)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    first_player: Option<u8>,

    /// Seed choosing the opening player when none is given
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds between cascade ticks
    #[arg(long)]
    tick_interval_ms: Option<u64>,

    /// Replay `--moves` without opening a window
    #[arg(long)]
    headless: bool,

    /// Whitespace separated `column,row` placements, alternating players
    #[arg(long, requires = "headless")]
    moves: Option<String>,
}

impl Cli {
    fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => AppConfig::load_or_default(Path::new(DEFAULT_CONFIG_PATH))
                .with_context(|| format!("loading config from {DEFAULT_CONFIG_PATH}"))?,
        };

        if let Some(side) = self.size {
            config.game.size = BoardSize::new(side).context("invalid --size")?;
        }
        if let Some(seat) = self.first_player {
            config.game.first_player = PlayerId::from_index(usize::from(seat));
        }
        if let Some(seed) = self.seed {
            config.game.seed = Some(seed);
            if self.first_player.is_none() {
                config.game.first_player = None;
            }
        }
        if let Some(interval) = self.tick_interval_ms {
            config.display.tick_interval_ms = interval;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

/// Entry point for the Chain Reaction command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let app_config = cli.load_config()?;

    let simulation = Simulation::new(app_config.game_config(), app_config.scheduler_config())
        .context("failed to start the game")?;
    println!("{}", query::welcome_banner(simulation.session()));

    if cli.headless {
        let moves = replay::parse_moves(cli.moves.as_deref().unwrap_or_default())?;
        let report = replay::run(simulation, &moves, app_config.tick_interval())?;
        println!("{report}");
        Ok(())
    } else {
        interactive::run(&app_config, simulation)
    }
}
