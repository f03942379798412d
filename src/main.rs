//! Feast Drop entry point
//!
//! Headless runner: the demo bot plays at a fixed timestep until the game
//! ends or the tick limit is hit, logging merges and the final score.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use feast_drop::GameConfig;
use feast_drop::consts::SIM_DT;
use feast_drop::sim::{Autoplay, Game, GameEvent, tick};

#[derive(Debug, Parser)]
#[command(name = "feast-drop", version, about = "Drop festive food, merge matching pieces, stay under the line")]
struct Cli {
    /// Run seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many ticks even if the game is still running
    #[arg(long, default_value_t = 60 * 60 * 10)]
    max_ticks: u64,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };

    if cli.dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let seed = cli.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });

    log::info!("Feast Drop (headless) starting...");
    let mut game = Game::new(config, seed).context("invalid game config")?;
    let mut bot = Autoplay::new(seed);

    let mut merges = 0u32;
    let mut best_tier = 0;
    while !game.is_over() && game.time_ticks() < cli.max_ticks {
        let input = bot.next_input(&game);
        tick(&mut game, &input);

        for event in game.events() {
            if let GameEvent::Merged { into, .. } = event {
                merges += 1;
                if let Some(tier) = into {
                    best_tier = best_tier.max(*tier);
                }
            }
        }
    }

    let taxonomy = game.taxonomy();
    let best = taxonomy.tier(best_tier).map(|t| t.name.as_str()).unwrap_or("?");
    let seconds = game.time_ticks() as f32 * SIM_DT;

    if game.is_over() {
        println!("Game over after {seconds:.1}s (seed {seed})");
    } else {
        println!("Tick limit reached after {seconds:.1}s (seed {seed})");
    }
    println!("Score: {}  merges: {merges}  best: {best}", game.score());

    Ok(())
}
