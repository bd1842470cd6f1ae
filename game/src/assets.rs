//! Image and font loading for the desktop shell.
//!
//! Tile images are registered under their map gid, so they are swapped out
//! whenever the map changes. Animation frames get handles from a separate
//! range starting at [`ANIMATION_HANDLE_BASE`] and live for the whole run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use aedventure::map::Tileset;
use aedventure::{Animation, AnimationSet, GameConfig, MapDescription, Status, TextureHandle};
use anyhow::{Context, Result};
use image::RgbaImage;

use crate::renderer::Renderer;

/// First handle used for animation frames; tile gids stay below it.
pub const ANIMATION_HANDLE_BASE: u32 = 1 << 30;

pub struct AssetLoader {
    asset_root: PathBuf,
    map_root: PathBuf,
    tile_size: u32,
    next_frame_handle: u32,
    frames: HashMap<PathBuf, TextureHandle>,
}

impl AssetLoader {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            asset_root: config.asset_root.clone(),
            map_root: config.map_root.clone(),
            tile_size: config.tile_size as u32,
            next_frame_handle: ANIMATION_HANDLE_BASE,
            frames: HashMap::new(),
        }
    }

    /// Register an image for every gid `map` uses, replacing the tiles of the
    /// previous map. Images that fail to load are skipped with a warning.
    /// Returns how many tiles were loaded.
    pub fn load_map_tiles(&self, renderer: &mut Renderer, map: &MapDescription, map_path: &str) -> usize {
        renderer.remove_textures(|handle| handle.id() < ANIMATION_HANDLE_BASE);
        let tiles = self.decode_map_tiles(map, map_path);
        let loaded = tiles.len();
        for (handle, image) in tiles {
            renderer.insert_texture(handle, image);
        }
        log::info!("loaded {loaded} tile images for {map_path}");
        loaded
    }

    fn decode_map_tiles(&self, map: &MapDescription, map_path: &str) -> Vec<(TextureHandle, RgbaImage)> {
        let map_file = self.map_root.join(map_path);
        let map_dir = map_file.parent().unwrap_or(self.map_root.as_path()).to_path_buf();
        // A sheet that failed once is not retried for its other cells.
        let mut sheets: HashMap<PathBuf, Option<RgbaImage>> = HashMap::new();
        let mut tiles = Vec::new();

        for gid in map.used_gids() {
            let Some(tileset) = map.tileset_for(gid) else {
                log::warn!("gid {gid} in {map_path} belongs to no tileset");
                continue;
            };
            let local = gid - tileset.first_gid;
            let image = if let Some(sheet) = &tileset.image {
                let path = map_dir.join(sheet);
                let sheet_image = sheets
                    .entry(path.clone())
                    .or_insert_with(|| open_rgba(&path).map_err(|err| log::warn!("{err:#}")).ok());
                let Some(sheet_image) = sheet_image.as_ref() else {
                    continue;
                };
                let (w, h) = self.cell_size(tileset);
                let (x, y) = sheet_cell(local, tileset.columns, w, h);
                if x + w > sheet_image.width() || y + h > sheet_image.height() {
                    log::warn!("gid {gid} lies outside {}", path.display());
                    continue;
                }
                image::imageops::crop_imm(sheet_image, x, y, w, h).to_image()
            } else if let Some(file) = tileset
                .tiles
                .iter()
                .find(|tile| tile.id == local)
                .and_then(|tile| tile.image.as_deref())
            {
                match open_rgba(&map_dir.join(file)) {
                    Ok(image) => image,
                    Err(err) => {
                        log::warn!("{err:#}");
                        continue;
                    }
                }
            } else {
                log::warn!("gid {gid} in tileset '{}' has no image", tileset.name);
                continue;
            };
            tiles.push((TextureHandle::new(gid), image));
        }
        tiles
    }

    fn cell_size(&self, tileset: &Tileset) -> (u32, u32) {
        let w = if tileset.tile_width > 0 { tileset.tile_width } else { self.tile_size };
        let h = if tileset.tile_height > 0 { tileset.tile_height } else { self.tile_size };
        (w, h)
    }

    /// Load `<asset_root>/<name>/<status>/*.png` for each of the twelve statuses.
    pub fn load_status_animations(&mut self, renderer: &mut Renderer, name: &str) -> Result<AnimationSet> {
        let mut set = AnimationSet::new();
        for status in Status::all() {
            let dir = self.asset_root.join(name).join(status.label());
            set.set(status, self.load_folder(renderer, &dir)?);
        }
        Ok(set)
    }

    /// Load `<asset_root>/<name>/*.png` as one animation.
    pub fn load_animation(&mut self, renderer: &mut Renderer, name: &str) -> Result<Animation> {
        let dir = self.asset_root.join(name);
        self.load_folder(renderer, &dir)
    }

    fn load_folder(&mut self, renderer: &mut Renderer, dir: &Path) -> Result<Animation> {
        if !dir.is_dir() {
            log::debug!("no animation folder at {}", dir.display());
            return Ok(Animation::default());
        }
        let mut frames = Vec::new();
        for path in frame_paths(dir)? {
            if let Some(handle) = self.frames.get(&path) {
                frames.push(*handle);
                continue;
            }
            let image = open_rgba(&path)?;
            let handle = TextureHandle::new(self.next_frame_handle);
            self.next_frame_handle += 1;
            renderer.insert_texture(handle, image);
            self.frames.insert(path, handle);
            frames.push(handle);
        }
        Ok(Animation::new(frames))
    }

    /// Load the first `.ttf`/`.otf` found under `<asset_root>/font`.
    pub fn load_font(&self, renderer: &mut Renderer) -> Result<bool> {
        let dir = self.asset_root.join("font");
        if !dir.is_dir() {
            return Ok(false);
        }
        let mut fonts: Vec<PathBuf> = std::fs::read_dir(&dir)
            .with_context(|| format!("failed to list {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| has_extension(path, &["ttf", "otf"]))
            .collect();
        fonts.sort();
        let Some(path) = fonts.first() else {
            return Ok(false);
        };
        let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        renderer.load_font_from_bytes(bytes)?;
        log::info!("loaded font {}", path.display());
        Ok(true)
    }
}

fn open_rgba(path: &Path) -> Result<RgbaImage> {
    Ok(image::open(path)
        .with_context(|| format!("failed to load image {}", path.display()))?
        .to_rgba8())
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// PNG files of an animation folder, sorted by file name.
fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| has_extension(path, &["png"]))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Top-left pixel of tile `local` in a sheet with `columns` columns.
fn sheet_cell(local: u32, columns: u32, width: u32, height: u32) -> (u32, u32) {
    let columns = columns.max(1);
    ((local % columns) * width, (local / columns) * height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_cells_run_row_major() {
        assert_eq!(sheet_cell(0, 4, 64, 64), (0, 0));
        assert_eq!(sheet_cell(5, 4, 64, 64), (64, 64));
        assert_eq!(sheet_cell(3, 0, 16, 16), (0, 48));
    }

    #[test]
    fn frame_paths_are_sorted_pngs_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["2.png", "0.png", "notes.txt", "1.PNG"] {
            std::fs::write(dir.path().join(name), b"").expect("write");
        }
        let names: Vec<String> = frame_paths(dir.path())
            .expect("list")
            .iter()
            .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
            .collect();
        assert_eq!(names, vec!["0.png", "1.PNG", "2.png"]);
    }

    #[test]
    fn unreadable_tile_images_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        RgbaImage::new(4, 4).save(dir.path().join("rock.png")).expect("save");
        let map = MapDescription::from_json(
            "cave",
            r#"{ "width": 3, "height": 1, "layers": [
                { "type": "tilelayer", "name": "wall", "width": 3, "height": 1,
                  "data": [1, 2, 7] }
            ], "tilesets": [
                { "firstgid": 1, "name": "props", "tiles": [
                    { "id": 0, "image": "rock.png" },
                    { "id": 1, "image": "gone.png" }
                ] }
            ] }"#,
        )
        .expect("parse");
        let config = GameConfig {
            map_root: dir.path().to_path_buf(),
            ..GameConfig::default()
        };

        let tiles = AssetLoader::new(&config).decode_map_tiles(&map, "cave.tmj");
        let gids: Vec<u32> = tiles.iter().map(|(handle, _)| handle.id()).collect();
        assert_eq!(gids, vec![1]);
        assert_eq!(tiles[0].1.dimensions(), (4, 4));
    }
}
