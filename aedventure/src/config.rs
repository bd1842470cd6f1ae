//! Runtime configuration for the game and its actor.
//!
//! Every field has a default, so a partial `aedventure.json` only needs to
//! name what it overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::Vec2;

/// File name looked up by [`GameConfig::load_or_default`].
pub const CONFIG_FILE_NAME: &str = "aedventure.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Challenge difficulty selected in the menus.
///
/// Passed explicitly to the world builder, which stamps it on the world it
/// produces; overlays read it from there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Cycle to the next difficulty (wraps around).
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Tuning values for the controlled actor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Displacement per tick in pixels before sprinting.
    pub speed: f32,
    pub sprint_multiplier: f32,
    /// Attack lock duration in milliseconds.
    pub attack_cooldown_ms: u64,
    /// Frame cursor advance per tick.
    pub animation_speed: f32,
    /// Size of the drawn rectangle in pixels.
    pub size: Vec2,
}

impl ActorConfig {
    pub fn attack_cooldown(&self) -> Duration {
        Duration::from_millis(self.attack_cooldown_ms)
    }
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            sprint_multiplier: 1.8,
            attack_cooldown_ms: 400,
            animation_speed: 0.15,
            size: Vec2::new(64.0, 64.0),
        }
    }
}

/// Configuration values for the window, the world and runtime behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Edge length of one grid cell in pixels.
    pub tile_size: f32,
    /// Directory that map paths (including door destinations) are resolved against.
    pub map_root: PathBuf,
    pub start_map: String,
    /// Directory holding graphics and fonts.
    pub asset_root: PathBuf,
    pub difficulty: Difficulty,
    pub actor: ActorConfig,
    /// Anchor names at which companions are spawned.
    pub companions: Vec<String>,
    pub companion_speed: f32,
    /// Companions stop approaching once this close to the actor.
    pub companion_follow_radius: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "AEDventure".into(),
            width: 1280,
            height: 720,
            fps: 60,
            tile_size: 64.0,
            map_root: PathBuf::from("map"),
            start_map: "hub.tmj".into(),
            asset_root: PathBuf::from("graphics"),
            difficulty: Difficulty::default(),
            actor: ActorConfig::default(),
            companions: vec!["capecao".into()],
            companion_speed: 3.0,
            companion_follow_radius: 96.0,
        }
    }
}

impl GameConfig {
    /// Override the window size in logical pixels.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_tile_size(mut self, tile_size: f32) -> Self {
        self.tile_size = tile_size;
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn with_companions<I, S>(mut self, anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.companions = anchors.into_iter().map(Into::into).collect();
        self
    }

    /// Viewport size in pixels.
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a configuration file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `aedventure.json` from `dir` if it exists, otherwise use defaults.
    pub fn load_or_default(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            log::info!("loading config from {}", path.display());
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }
}
