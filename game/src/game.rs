use aedventure::{DrawList, EntityArt, FileMapSource, GameConfig, InputMap, Level};
use anyhow::{Context, Result};

use crate::assets::AssetLoader;
use crate::challenge::SortingChallenge;
use crate::engine::{EngineContext, Game};
use crate::menu::GameMenu;
use crate::renderer::Renderer;

/// Folder under the asset root holding the actor's status animations.
const PLAYER_ART: &str = "player";

/// The AEDventure game: a [`Level`] fed by keyboard and mouse input.
pub struct AedventureGame {
    config: GameConfig,
    input_map: InputMap,
    assets: AssetLoader,
    level: Option<Level>,
    draw_list: DrawList,
}

impl AedventureGame {
    pub fn new(config: GameConfig) -> Self {
        let assets = AssetLoader::new(&config);
        Self {
            config,
            input_map: InputMap::default(),
            assets,
            level: None,
            draw_list: DrawList::new(),
        }
    }

    /// Swap in the tile images of a map the level has just switched to,
    /// before the frame drawn from it is presented.
    fn sync_tiles(assets: &AssetLoader, level: &mut Level, renderer: &mut Renderer) {
        let Some(map) = level.take_loaded_map() else {
            return;
        };
        assets.load_map_tiles(renderer, &map, level.world().map_path());
        log::debug!("{} textures resident", renderer.texture_count());
    }
}

impl Game for AedventureGame {
    fn init(&mut self, ctx: &mut EngineContext) -> Result<()> {
        let renderer = ctx.renderer();
        if !self.assets.load_font(renderer)? {
            log::warn!(
                "no font under {}; overlays will have no text",
                self.config.asset_root.join("font").display()
            );
        }

        let mut art = EntityArt::new(self.assets.load_status_animations(renderer, PLAYER_ART)?);
        for name in &self.config.companions {
            art = art.with_companion(name.as_str(), self.assets.load_animation(renderer, name)?);
        }

        let viewport = self.config.viewport();
        let level = Level::new(
            self.config.clone(),
            art,
            Box::new(FileMapSource::new(&self.config.map_root)),
            Box::new(SortingChallenge::new(viewport)),
            Box::new(GameMenu::new(viewport, self.config.difficulty)),
        )
        .with_context(|| format!("failed to load start map {}", self.config.start_map))?;
        if level.world().degraded_start() {
            log::warn!("started without a player anchor");
        }

        let level = self.level.insert(level);
        Self::sync_tiles(&self.assets, level, renderer);
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext) -> Result<()> {
        let Some(level) = self.level.as_mut() else {
            return Ok(());
        };

        let snapshot = self.input_map.snapshot(ctx.input());
        level.handle_input(&snapshot);
        for event in ctx.input().pointer_presses() {
            level.handle_pointer(&event);
        }

        self.draw_list.clear();
        level.run(&snapshot, ctx.simulation_time(), &mut self.draw_list);
        Self::sync_tiles(&self.assets, level, ctx.renderer());

        if level.quit_requested() {
            log::info!("quit requested");
            ctx.request_exit();
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut EngineContext) -> Result<()> {
        ctx.renderer().draw(&self.draw_list)
    }
}
