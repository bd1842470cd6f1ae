mod assets;
mod challenge;
mod engine;
mod game;
mod menu;
mod renderer;

use std::path::PathBuf;

use aedventure::GameConfig;
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::engine::{Engine, EngineConfig};
use crate::game::AedventureGame;

fn main() -> Result<()> {
    init_tracing();

    // Optional first argument: directory holding aedventure.json.
    let config_dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let config = GameConfig::load_or_default(&config_dir)
        .with_context(|| format!("failed to load configuration from {}", config_dir.display()))?;
    log::info!("=== {} startup ===", config.title);

    Engine::new()
        .with_config(EngineConfig::from(&config))
        .run(AedventureGame::new(config))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
