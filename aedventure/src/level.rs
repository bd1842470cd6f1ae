//! The level: owns the current world and arbitrates game modes.
//!
//! Exactly one [`Mode`] is active at a time. The challenge overlay implies
//! the game is paused, and the pause menu cannot be toggled while it is
//! shown. Map transitions build the next world completely before swapping
//! it in; a map that fails to load leaves the current world in place.

use std::time::Duration;

use crate::camera::YSortCamera;
use crate::config::GameConfig;
use crate::input::{Action, ActionSnapshot, PointerEvent};
use crate::map::{MapDescription, MapError, MapSource};
use crate::overlay::{Challenge, DebugOverlay, OverlayCommand, PauseMenu};
use crate::render::DrawList;
use crate::world::{EntityArt, World, WorldBuilder};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Exploring,
    /// Pause menu shown.
    Paused,
    /// Challenge overlay shown; counts as paused.
    Challenge,
}

impl Mode {
    pub fn is_paused(self) -> bool {
        self != Mode::Exploring
    }

    pub fn actor_can_move(self) -> bool {
        self == Mode::Exploring
    }
}

pub struct Level {
    config: GameConfig,
    art: EntityArt,
    maps: Box<dyn MapSource>,
    world: World,
    camera: YSortCamera,
    mode: Mode,
    challenge: Box<dyn Challenge>,
    pause_menu: Box<dyn PauseMenu>,
    challenge_complete: bool,
    quit_requested: bool,
    /// Map behind the current world until the shell takes it for its images.
    loaded_map: Option<MapDescription>,
    /// Destination that failed to load while interact was held.
    failed_door: Option<String>,
    debug: DebugOverlay,
}

impl Level {
    /// Load `config.start_map` from `maps` and build the first world.
    pub fn new(
        config: GameConfig,
        art: EntityArt,
        mut maps: Box<dyn MapSource>,
        challenge: Box<dyn Challenge>,
        pause_menu: Box<dyn PauseMenu>,
    ) -> Result<Self, MapError> {
        let map = maps.load(&config.start_map)?;
        let world = WorldBuilder::new(&config, &art).build(&map, &config.start_map);
        let camera = YSortCamera::new(config.viewport());
        log::info!("level started on {}", config.start_map);
        Ok(Self {
            config,
            art,
            maps,
            world,
            camera,
            mode: Mode::Exploring,
            challenge,
            pause_menu,
            challenge_complete: false,
            quit_requested: false,
            loaded_map: Some(map),
            failed_door: None,
            debug: DebugOverlay::new(),
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_paused(&self) -> bool {
        self.mode.is_paused()
    }

    pub fn actor_can_move(&self) -> bool {
        self.mode.actor_can_move()
    }

    pub fn challenge_complete(&self) -> bool {
        self.challenge_complete
    }

    /// An overlay asked to leave the game.
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn camera(&self) -> &YSortCamera {
        &self.camera
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn debug_overlay(&self) -> &DebugOverlay {
        &self.debug
    }

    /// Hand over the description of a freshly built world, once.
    ///
    /// Returns the start map after [`Level::new`] and the destination after
    /// each map change, so images can be loaded for exactly the map that is
    /// being shown.
    pub fn take_loaded_map(&mut self) -> Option<MapDescription> {
        self.loaded_map.take()
    }

    /// Open or close the pause menu. Ignored while the challenge is shown.
    pub fn toggle_menu(&mut self) {
        self.mode = match self.mode {
            Mode::Exploring => Mode::Paused,
            Mode::Paused => Mode::Exploring,
            Mode::Challenge => {
                log::debug!("pause menu toggle ignored during challenge");
                return;
            }
        };
    }

    /// Show the challenge overlay. Only allowed while exploring.
    pub fn start_challenge(&mut self) {
        if self.mode != Mode::Exploring {
            log::debug!("start_challenge ignored in {:?}", self.mode);
            return;
        }
        self.mode = Mode::Challenge;
        self.challenge.activate(self.world.difficulty());
    }

    /// Leave the challenge overlay and return to exploring.
    pub fn end_challenge(&mut self) {
        if self.mode != Mode::Challenge {
            log::debug!("end_challenge ignored in {:?}", self.mode);
            return;
        }
        self.mode = Mode::Exploring;
        self.challenge.deactivate();
    }

    pub fn mark_challenge_complete(&mut self) {
        self.challenge_complete = true;
    }

    /// Dispatch every action pressed this tick.
    pub fn handle_input(&mut self, input: &ActionSnapshot) {
        for action in input.pressed_actions() {
            self.handle_action_pressed(action);
        }
    }

    pub fn handle_action_pressed(&mut self, action: Action) {
        match action {
            Action::Menu => self.toggle_menu(),
            // Interact doubles as "talk"; a door under the actor takes precedence.
            Action::Interact => {
                if self.mode != Mode::Challenge && self.world.door_under_actor().is_none() {
                    self.start_challenge();
                }
            }
            _ => {}
        }
    }

    /// Route a pointer press to whichever overlay is showing.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        let command = match self.mode {
            Mode::Challenge if !self.challenge.is_active() => {
                self.challenge.check_difficulty_selection(event)
            }
            Mode::Challenge => self.challenge.check_button_click(event),
            Mode::Paused => self.pause_menu.check_mouse_click(event),
            Mode::Exploring => None,
        };
        if let Some(command) = command {
            self.apply(command);
        }
    }

    /// Apply an overlay's request through the regular transitions.
    pub fn apply(&mut self, command: OverlayCommand) {
        log::debug!("overlay command {:?}", command);
        match command {
            OverlayCommand::Resume => {
                if self.mode == Mode::Paused {
                    self.toggle_menu();
                }
            }
            OverlayCommand::StartChallenge => self.start_challenge(),
            OverlayCommand::EndChallenge => self.end_challenge(),
            OverlayCommand::CompleteChallenge => self.mark_challenge_complete(),
            OverlayCommand::SetDifficulty(difficulty) => {
                self.config.difficulty = difficulty;
                self.world.set_difficulty(difficulty);
                self.pause_menu.difficulty_changed(difficulty);
            }
            OverlayCommand::Quit => self.quit_requested = true,
        }
    }

    /// Replace the world with one built from the map at `path`.
    ///
    /// On error the current world is kept.
    pub fn change_map(&mut self, path: &str) -> Result<(), MapError> {
        let map = self.maps.load(path)?;
        let world = WorldBuilder::new(&self.config, &self.art).build(&map, path);
        log::info!("changed map {} -> {}", self.world.map_path(), path);
        self.world = world;
        self.loaded_map = Some(map);
        Ok(())
    }

    /// Run one frame: draw the world, then the active overlay or the world
    /// update, then door transitions and debug lines.
    ///
    /// A door transition redraws the frame from the new world, so the list
    /// never mixes two maps.
    pub fn run(&mut self, input: &ActionSnapshot, now: Duration, draw_list: &mut DrawList) {
        self.camera.render_frame(&self.world, draw_list);

        match self.mode {
            Mode::Challenge => self.challenge.display(draw_list),
            Mode::Paused => self.pause_menu.display(draw_list),
            Mode::Exploring => self.world.update(input, now),
        }

        if self.check_doors(input) {
            draw_list.clear();
            self.camera.render_frame(&self.world, draw_list);
            match self.mode {
                Mode::Challenge => self.challenge.display(draw_list),
                Mode::Paused => self.pause_menu.display(draw_list),
                Mode::Exploring => {}
            }
        }

        self.debug.clear();
        self.debug.line("game_paused", self.is_paused(), None);
        self.debug.line("player_can_move", self.actor_can_move(), Some(50.0));
        self.debug
            .line("sorting_challenge_complete", self.challenge_complete, Some(100.0));
        self.debug.line("map", self.world.map_path(), Some(140.0));
        self.debug.line("status", self.world.actor().status(), Some(180.0));
        self.debug.draw(draw_list);
    }

    /// Returns true when the world was replaced.
    fn check_doors(&mut self, input: &ActionSnapshot) -> bool {
        if !input.is_held(Action::Interact) {
            self.failed_door = None;
            return false;
        }
        let Some(destination) = self
            .world
            .door_under_actor()
            .and_then(|door| door.destination())
            .map(str::to_string)
        else {
            return false;
        };
        // Retried only after interact is released.
        if self.failed_door.as_deref() == Some(destination.as_str()) {
            return false;
        }
        match self.change_map(&destination) {
            Ok(()) => {
                self.failed_door = None;
                true
            }
            Err(err) => {
                log::warn!("staying on {}: {}", self.world.map_path(), err);
                self.failed_door = Some(destination);
                false
            }
        }
    }
}
