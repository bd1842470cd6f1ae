//! The world built from one map: floor cache, tiles, actor and companions.
//!
//! A [`World`] is produced whole by [`WorldBuilder::build`] and never
//! repopulated in place. Changing maps means building a new one and
//! replacing the old value, so nothing from the previous map can leak into
//! the next.

use std::collections::HashMap;
use std::time::Duration;

use crate::actor::Actor;
use crate::animation::{Animation, AnimationSet};
use crate::companion::{Companion, FollowConfig};
use crate::config::{Difficulty, GameConfig};
use crate::input::ActionSnapshot;
use crate::map::MapDescription;
use crate::math::{Rect, Vec2};
use crate::render::TextureHandle;
use crate::tile::{Tile, TileKind};

/// Name of the object the actor spawns at.
pub const PLAYER_ANCHOR: &str = "player";

/// Animation frames handed to every world the builder produces.
#[derive(Clone, Debug, Default)]
pub struct EntityArt {
    pub actor: AnimationSet,
    /// Keyed by companion anchor name.
    pub companions: HashMap<String, Animation>,
}

impl EntityArt {
    pub fn new(actor: AnimationSet) -> Self {
        Self {
            actor,
            companions: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_companion(mut self, name: impl Into<String>, animation: Animation) -> Self {
        self.companions.insert(name.into(), animation);
        self
    }

    fn companion(&self, name: &str) -> Animation {
        self.companions.get(name).cloned().unwrap_or_default()
    }
}

pub struct World {
    map_path: String,
    floor: Vec<(TextureHandle, Vec2)>,
    tiles: Vec<Tile>,
    obstacles: Vec<Rect>,
    actor: Actor,
    companions: Vec<Companion>,
    difficulty: Difficulty,
    degraded_start: bool,
}

impl World {
    /// Path of the map this world was built from.
    pub fn map_path(&self) -> &str {
        &self.map_path
    }

    /// Floor images and their top-left positions, in layer order.
    pub fn floor(&self) -> &[(TextureHandle, Vec2)] {
        &self.floor
    }

    /// Every non-floor tile, in layer order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Hitboxes of all obstacle tiles; the collision set.
    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    pub fn doors(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|tile| tile.is_door())
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn companions(&self) -> &[Companion] {
        &self.companions
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub(crate) fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// The map had no player anchor and the actor was spawned at the origin.
    pub fn degraded_start(&self) -> bool {
        self.degraded_start
    }

    /// Advance the actor, then let companions follow it.
    pub fn update(&mut self, input: &ActionSnapshot, now: Duration) {
        self.actor.update(input, now, &self.obstacles);
        let target = self.actor.position();
        for companion in &mut self.companions {
            companion.update(target);
        }
    }

    /// First door whose tile area overlaps the actor's hitbox.
    ///
    /// The door's full tile rectangle is used rather than its hitbox: the
    /// actor is always pushed flush out of the hitbox, so standing against
    /// the door still overlaps the tile.
    pub fn door_under_actor(&self) -> Option<&Tile> {
        let hitbox = self.actor.hitbox();
        self.doors().find(|door| door.rect().intersects(&hitbox))
    }
}

/// Turns map descriptions into worlds.
pub struct WorldBuilder<'a> {
    config: &'a GameConfig,
    art: &'a EntityArt,
}

impl<'a> WorldBuilder<'a> {
    pub fn new(config: &'a GameConfig, art: &'a EntityArt) -> Self {
        Self { config, art }
    }

    /// Build a world from `map`. `map_path` is recorded for diagnostics.
    ///
    /// Never fails: unknown layers are skipped, doors without a destination
    /// stay inert and a missing player anchor spawns the actor at the origin.
    pub fn build(&self, map: &MapDescription, map_path: &str) -> World {
        let tile_size = self.config.tile_size;
        let mut floor = Vec::new();
        let mut tiles = Vec::new();

        for layer in map.visible_tile_layers() {
            let Some(kind) = TileKind::from_layer_name(&layer.name) else {
                log::debug!("skipping unknown layer '{}' in {}", layer.name, map_path);
                continue;
            };
            for (col, row, gid) in layer.tiles() {
                let position = Vec2::new(col as f32 * tile_size, row as f32 * tile_size);
                let image = TextureHandle::new(gid);
                if kind == TileKind::Floor {
                    floor.push((image, position));
                    continue;
                }
                let mut tile = Tile::new(kind, position, tile_size, Some(image));
                if kind == TileKind::Door {
                    let destination = map.destination_at(position).map(str::to_string);
                    if destination.is_none() {
                        log::debug!(
                            "door at ({}, {}) in {} has no destination",
                            position.x,
                            position.y,
                            map_path
                        );
                    }
                    tile = tile.with_destination(destination);
                }
                tiles.push(tile);
            }
        }

        let obstacles: Vec<Rect> = tiles.iter().filter_map(Tile::hitbox).collect();

        let (anchor, degraded_start) = match map.anchor(PLAYER_ANCHOR) {
            Some(anchor) => (anchor, false),
            None => {
                log::warn!(
                    "map {} has no '{}' anchor; spawning at the origin",
                    map_path,
                    PLAYER_ANCHOR
                );
                (Vec2::ZERO, true)
            }
        };
        let actor = Actor::new(anchor, self.config.actor.clone(), self.art.actor.clone());

        let follow = FollowConfig {
            speed: self.config.companion_speed,
            radius: self.config.companion_follow_radius,
            animation_speed: self.config.actor.animation_speed,
        };
        let companions: Vec<Companion> = self
            .config
            .companions
            .iter()
            .filter_map(|name| {
                let Some(anchor) = map.anchor(name) else {
                    log::debug!("no anchor for companion '{}' in {}", name, map_path);
                    return None;
                };
                Some(Companion::new(
                    name.as_str(),
                    anchor,
                    self.config.actor.size,
                    follow,
                    self.art.companion(name),
                ))
            })
            .collect();

        log::info!(
            "built {}: {} floor tiles, {} tiles, {} obstacles, {} companions",
            map_path,
            floor.len(),
            tiles.len(),
            obstacles.len(),
            companions.len()
        );

        World {
            map_path: map_path.to_string(),
            floor,
            tiles,
            obstacles,
            actor,
            companions,
            difficulty: self.config.difficulty,
            degraded_start,
        }
    }
}
