//! Map descriptions in Tiled's JSON format.
//!
//! Only the subset the world builder consumes is modelled: tile layers with
//! inline `data` arrays, object groups with named point objects and their
//! custom properties, and tilesets (consumed by the desktop shell to resolve
//! tile ids to images).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::math::Vec2;

/// Tiled stores horizontal/vertical/diagonal flip flags in the top bits of a gid.
const GID_FLAGS_MASK: u32 = 0xE000_0000;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse map {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("tile layer '{layer}' has {actual} cells, expected {width}x{height}")]
    LayerSize {
        layer: String,
        width: u32,
        height: u32,
        actual: usize,
    },
}

/// A whole map: layered tile grid plus the named object table.
#[derive(Clone, Debug, Deserialize)]
pub struct MapDescription {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "tilewidth", default)]
    pub tile_width: u32,
    #[serde(rename = "tileheight", default)]
    pub tile_height: u32,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub tilesets: Vec<Tileset>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Layer {
    #[serde(rename = "tilelayer")]
    Tiles(TileLayer),
    #[serde(rename = "objectgroup")]
    Objects(ObjectGroup),
    #[serde(other)]
    Unsupported,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TileLayer {
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub width: u32,
    pub height: u32,
    /// Row-major gids, 0 = empty.
    #[serde(default)]
    pub data: Vec<u32>,
}

impl TileLayer {
    /// Iterate `(column, row, gid)` over non-empty cells, flip flags stripped.
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        let width = self.width.max(1);
        self.data.iter().enumerate().filter_map(move |(index, &raw)| {
            let gid = raw & !GID_FLAGS_MASK;
            (gid != 0).then(|| (index as u32 % width, index as u32 / width, gid))
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ObjectGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub objects: Vec<MapObject>,
}

/// A named point in the map, used as an anchor or door destination record.
#[derive(Clone, Debug, Deserialize)]
pub struct MapObject {
    #[serde(default)]
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl MapObject {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// String value of a custom property, if present.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.value.as_str())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub value: serde_json::Value,
}

/// Tileset reference: either one sheet image cut into a grid, or a
/// collection of individual images.
#[derive(Clone, Debug, Deserialize)]
pub struct Tileset {
    #[serde(rename = "firstgid")]
    pub first_gid: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub columns: u32,
    #[serde(rename = "tilewidth", default)]
    pub tile_width: u32,
    #[serde(rename = "tileheight", default)]
    pub tile_height: u32,
    #[serde(rename = "tilecount", default)]
    pub tile_count: u32,
    #[serde(default)]
    pub tiles: Vec<TilesetTile>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TilesetTile {
    pub id: u32,
    #[serde(default)]
    pub image: Option<String>,
}

fn default_visible() -> bool {
    true
}

impl MapDescription {
    /// Parse and validate a map from JSON text. `name` is only used in errors.
    pub fn from_json(name: &str, json: &str) -> Result<Self, MapError> {
        let map: Self = serde_json::from_str(json).map_err(|source| MapError::Parse {
            name: name.to_string(),
            source,
        })?;
        map.validate()?;
        Ok(map)
    }

    /// Load a map file from disk.
    pub fn load_from_file(path: &Path) -> Result<Self, MapError> {
        let json = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&path.display().to_string(), &json)
    }

    fn validate(&self) -> Result<(), MapError> {
        for layer in self.tile_layers() {
            let expected = layer.width as usize * layer.height as usize;
            if layer.data.len() != expected {
                return Err(MapError::LayerSize {
                    layer: layer.name.clone(),
                    width: layer.width,
                    height: layer.height,
                    actual: layer.data.len(),
                });
            }
        }
        Ok(())
    }

    /// Visible tile layers in file order.
    pub fn visible_tile_layers(&self) -> impl Iterator<Item = &TileLayer> {
        self.tile_layers().filter(|layer| layer.visible)
    }

    fn tile_layers(&self) -> impl Iterator<Item = &TileLayer> {
        self.layers.iter().filter_map(|layer| match layer {
            Layer::Tiles(tiles) => Some(tiles),
            _ => None,
        })
    }

    /// Every object of every object group, in file order.
    pub fn objects(&self) -> impl Iterator<Item = &MapObject> {
        self.layers
            .iter()
            .filter_map(|layer| match layer {
                Layer::Objects(group) => Some(group.objects.iter()),
                _ => None,
            })
            .flatten()
    }

    /// Position of the first object called `name`.
    pub fn anchor(&self, name: &str) -> Option<Vec2> {
        self.objects()
            .find(|object| object.name == name)
            .map(MapObject::position)
    }

    /// `path` property of the object sitting exactly at `position`
    /// (compared in whole pixels).
    pub fn destination_at(&self, position: Vec2) -> Option<&str> {
        let key = pixel_key(position);
        self.objects()
            .find(|object| pixel_key(object.position()) == key)
            .and_then(|object| object.property("path"))
    }

    /// Tileset owning `gid`, i.e. the one with the greatest `first_gid <= gid`.
    pub fn tileset_for(&self, gid: u32) -> Option<&Tileset> {
        self.tilesets
            .iter()
            .filter(|tileset| tileset.first_gid <= gid)
            .max_by_key(|tileset| tileset.first_gid)
    }

    /// Every distinct gid used by any tile layer, visible or not.
    pub fn used_gids(&self) -> Vec<u32> {
        let mut gids: Vec<u32> = self
            .tile_layers()
            .flat_map(|layer| layer.tiles().map(|(_, _, gid)| gid))
            .collect();
        gids.sort_unstable();
        gids.dedup();
        gids
    }
}

fn pixel_key(position: Vec2) -> (i64, i64) {
    (position.x.round() as i64, position.y.round() as i64)
}

/// Where the level gets maps from, both at start-up and on door transitions.
pub trait MapSource {
    fn load(&mut self, path: &str) -> Result<MapDescription, MapError>;
}

/// Loads maps from files under a root directory.
#[derive(Clone, Debug)]
pub struct FileMapSource {
    root: PathBuf,
}

impl FileMapSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl MapSource for FileMapSource {
    fn load(&mut self, path: &str) -> Result<MapDescription, MapError> {
        MapDescription::load_from_file(&self.resolve(path))
    }
}

/// Maps kept in memory, keyed by path. Handy for tools and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryMapSource {
    maps: HashMap<String, String>,
}

impl MemoryMapSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the JSON text served for `path`.
    #[must_use]
    pub fn with_map(mut self, path: impl Into<String>, json: impl Into<String>) -> Self {
        self.maps.insert(path.into(), json.into());
        self
    }
}

impl MapSource for MemoryMapSource {
    fn load(&mut self, path: &str) -> Result<MapDescription, MapError> {
        let json = self.maps.get(path).ok_or_else(|| MapError::Io {
            path: PathBuf::from(path),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such map"),
        })?;
        MapDescription::from_json(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HUB: &str = r#"{
        "width": 3, "height": 2, "tilewidth": 64, "tileheight": 64,
        "layers": [
            { "type": "tilelayer", "name": "floor", "width": 3, "height": 2,
              "data": [1, 1, 1, 1, 0, 1] },
            { "type": "tilelayer", "name": "wall", "width": 3, "height": 2, "visible": false,
              "data": [0, 0, 2147483650, 0, 0, 0] },
            { "type": "imagelayer", "name": "sky" },
            { "type": "objectgroup", "name": "anchors", "objects": [
                { "id": 1, "name": "player", "x": 64, "y": 64 },
                { "id": 2, "name": "door", "x": 128, "y": 0,
                  "properties": [{ "name": "path", "type": "string", "value": "forest.tmj" }] }
            ] }
        ],
        "tilesets": [
            { "firstgid": 1, "name": "ground", "image": "ground.png", "columns": 4 },
            { "firstgid": 5, "name": "props", "tiles": [{ "id": 0, "image": "tree.png" }] }
        ]
    }"#;

    #[test]
    fn parses_layers_objects_and_tilesets() {
        let map = MapDescription::from_json("hub", HUB).expect("parse");
        assert_eq!(map.layers.len(), 4);
        assert!(matches!(map.layers[2], Layer::Unsupported));
        assert_eq!(map.visible_tile_layers().count(), 1);
        assert_eq!(map.anchor("player"), Some(Vec2::new(64.0, 64.0)));
        assert_eq!(map.anchor("nobody"), None);
        assert_eq!(map.tileset_for(6).map(|t| t.name.as_str()), Some("props"));
        assert_eq!(map.tileset_for(4).map(|t| t.name.as_str()), Some("ground"));
    }

    #[test]
    fn tile_iteration_skips_empty_cells_and_strips_flip_flags() {
        let map = MapDescription::from_json("hub", HUB).expect("parse");
        let floor: Vec<_> = map.visible_tile_layers().next().unwrap().tiles().collect();
        assert_eq!(floor.len(), 5);
        assert_eq!(floor[3], (0, 1, 1));
        assert_eq!(floor[4], (2, 1, 1));
        assert_eq!(map.used_gids(), vec![1, 2]);
    }

    #[test]
    fn destination_lookup_matches_position() {
        let map = MapDescription::from_json("hub", HUB).expect("parse");
        assert_eq!(map.destination_at(Vec2::new(128.0, 0.0)), Some("forest.tmj"));
        assert_eq!(map.destination_at(Vec2::new(64.0, 64.0)), None);
        assert_eq!(map.destination_at(Vec2::new(0.0, 0.0)), None);
    }

    #[test]
    fn layer_size_mismatch_is_rejected() {
        let json = r#"{ "width": 2, "height": 2, "layers": [
            { "type": "tilelayer", "name": "floor", "width": 2, "height": 2, "data": [1, 1, 1] }
        ] }"#;
        let err = MapDescription::from_json("broken", json).unwrap_err();
        assert!(matches!(err, MapError::LayerSize { actual: 3, .. }));
    }

    #[test]
    fn file_source_resolves_relative_to_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("hub.tmj"), HUB).expect("write");
        let mut source = FileMapSource::new(dir.path());
        let map = source.load("hub.tmj").expect("load");
        assert_eq!(map.width, 3);
        assert!(matches!(source.load("missing.tmj"), Err(MapError::Io { .. })));
    }
}
