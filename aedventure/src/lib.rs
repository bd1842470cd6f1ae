//! AEDventure - the runtime core of a tile-based 2D exploration game.
//!
//! The crate is headless: it builds worlds from Tiled maps, moves the actor
//! against static obstacles, arbitrates game modes and emits a [`DrawList`]
//! per frame. Windowing, decoding and rasterizing live in the game shell.

pub mod actor;
pub mod animation;
pub mod camera;
pub mod collision;
pub mod companion;
pub mod config;
pub mod input;
pub mod level;
pub mod map;
pub mod math;
pub mod overlay;
pub mod render;
pub mod tile;
pub mod world;

pub use crate::actor::Actor;
pub use crate::animation::{Activity, Animation, AnimationSet, Facing, Status};
pub use crate::camera::YSortCamera;
pub use crate::companion::Companion;
pub use crate::config::{ActorConfig, ConfigError, Difficulty, GameConfig};
pub use crate::input::{Action, ActionSnapshot, InputMap, InputState, PointerEvent};
pub use crate::level::{Level, Mode};
pub use crate::map::{FileMapSource, MapDescription, MapError, MapSource, MemoryMapSource};
pub use crate::math::{Rect, Vec2};
pub use crate::overlay::{Challenge, DebugOverlay, NoOverlay, OverlayCommand, PauseMenu};
pub use crate::render::{Color, DrawCommand, DrawList, TextureHandle};
pub use crate::tile::{Tile, TileKind};
pub use crate::world::{EntityArt, World, WorldBuilder};
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
