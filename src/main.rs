//! Palisade - Entry Point
//!
//! Headless driver: builds the starter world, runs a fixed number of
//! 60 Hz frames, and logs the simulation events as they happen. Useful
//! for soak-testing wave pacing and the economy without a renderer.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use palisade::core::config::Config;
use palisade::sim::{GameWorld, PlayerInput, SimEvent};

#[derive(Parser, Debug)]
#[command(name = "palisade", about = "Headless survival tower-defense simulation")]
struct Args {
    /// RNG seed; the same seed replays the same run
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of 60 Hz frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u64,

    /// Optional JSON config file
    #[arg(long)]
    config: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("palisade=info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path),
        None => Config::defaults(),
    };

    tracing::info!(seed = args.seed, frames = args.frames, "starting run");

    let mut world = GameWorld::new(args.seed, &config);
    world.populate_starter_scene();

    let dt = 1.0 / 60.0;
    let input = PlayerInput::default();
    let mut waves_completed = 0u32;
    let mut kills = 0u64;
    let mut scrap_earned = 0i64;

    for _ in 0..args.frames {
        for event in world.step(dt, &input) {
            match event {
                SimEvent::WaveStarted {
                    wave,
                    normal,
                    fast,
                    tank,
                } => {
                    tracing::info!(wave, normal, fast, tank, "wave started");
                }
                SimEvent::WaveCompleted { wave } => {
                    waves_completed += 1;
                    tracing::info!(wave, "wave completed");
                }
                SimEvent::ZombieKilled { kind, scrap } => {
                    kills += 1;
                    scrap_earned += scrap;
                    tracing::debug!(?kind, scrap, "zombie killed");
                }
                SimEvent::HarvestCompleted { resource, amount } => {
                    tracing::debug!(%resource, amount, "harvest completed");
                }
                SimEvent::Production {
                    resource, amount, ..
                } => {
                    tracing::debug!(%resource, amount, "production");
                }
                SimEvent::BuildingDestroyed { kind, .. } => {
                    tracing::info!(?kind, "building destroyed");
                }
                SimEvent::BuildingPlaced { .. } | SimEvent::BuildingCompleted { .. } => {}
                SimEvent::GameOver => {
                    tracing::warn!(frame = world.frame, "game over");
                }
            }
        }
        if world.is_game_over() {
            break;
        }
    }

    tracing::info!(
        frames = world.frame,
        waves_completed,
        kills,
        scrap_earned,
        game_over = world.is_game_over(),
        "run finished"
    );
}
