//! Screen-space overlays drawn on top of the world.
//!
//! The challenge mini-game and the pause menu live outside the core; the
//! level talks to them through [`Challenge`] and [`PauseMenu`], and they
//! answer pointer presses with [`OverlayCommand`]s that the level applies
//! through its own transition guards.

use crate::config::Difficulty;
use crate::input::PointerEvent;
use crate::math::{Rect, Vec2};
use crate::render::{Color, DrawList, BLACK, WHITE};

/// Requests an overlay can make of the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayCommand {
    /// Close the pause menu.
    Resume,
    StartChallenge,
    EndChallenge,
    CompleteChallenge,
    SetDifficulty(Difficulty),
    Quit,
}

/// The embedded mini-game shown while the level is in challenge mode.
pub trait Challenge {
    /// Enter the challenge. It starts on its difficulty selection screen
    /// until a difficulty is picked.
    fn activate(&mut self, difficulty: Difficulty);
    fn deactivate(&mut self);
    /// A round is being played, i.e. a difficulty has been picked. False
    /// right after [`Challenge::activate`]; the level routes pointer presses
    /// to [`Challenge::check_difficulty_selection`] until it turns true.
    fn is_active(&self) -> bool;
    fn display(&mut self, draw_list: &mut DrawList);
    fn check_button_click(&mut self, event: &PointerEvent) -> Option<OverlayCommand>;
    fn check_difficulty_selection(&mut self, event: &PointerEvent) -> Option<OverlayCommand>;
}

pub trait PauseMenu {
    fn display(&mut self, draw_list: &mut DrawList);
    fn check_mouse_click(&mut self, event: &PointerEvent) -> Option<OverlayCommand>;
    /// The difficulty was changed, possibly by another overlay.
    fn difficulty_changed(&mut self, _difficulty: Difficulty) {}
}

/// Collaborator that ignores everything; handy for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOverlay;

impl Challenge for NoOverlay {
    fn activate(&mut self, _difficulty: Difficulty) {}
    fn deactivate(&mut self) {}
    fn is_active(&self) -> bool {
        false
    }
    fn display(&mut self, _draw_list: &mut DrawList) {}
    fn check_button_click(&mut self, _event: &PointerEvent) -> Option<OverlayCommand> {
        None
    }
    fn check_difficulty_selection(&mut self, _event: &PointerEvent) -> Option<OverlayCommand> {
        None
    }
}

impl PauseMenu for NoOverlay {
    fn display(&mut self, _draw_list: &mut DrawList) {}
    fn check_mouse_click(&mut self, _event: &PointerEvent) -> Option<OverlayCommand> {
        None
    }
}

/// Row used when a debug line does not ask for one.
pub const DEBUG_DEFAULT_ROW: f32 = 10.0;
pub const DEBUG_LEFT: f32 = 10.0;
pub const DEBUG_FONT_SIZE: f32 = 20.0;
/// Rough advance per character used to size the backing box.
const DEBUG_CHAR_WIDTH: f32 = DEBUG_FONT_SIZE * 0.6;

#[derive(Clone, Debug, PartialEq)]
pub struct DebugLine {
    pub text: String,
    pub row: f32,
}

/// Collects `label: value` lines for one frame and draws them as white text
/// on black boxes along the left edge.
#[derive(Clone, Debug, Default)]
pub struct DebugOverlay {
    lines: Vec<DebugLine>,
}

impl DebugOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Queue a line at `row` pixels from the top (10 when `None`).
    pub fn line(&mut self, label: &str, value: impl std::fmt::Display, row: Option<f32>) {
        self.lines.push(DebugLine {
            text: format!("{label}: {value}"),
            row: row.unwrap_or(DEBUG_DEFAULT_ROW),
        });
    }

    pub fn lines(&self) -> &[DebugLine] {
        &self.lines
    }

    /// Draw queued lines in call order.
    pub fn draw(&self, draw_list: &mut DrawList) {
        self.draw_with(draw_list, BLACK, WHITE);
    }

    fn draw_with(&self, draw_list: &mut DrawList, background: Color, foreground: Color) {
        for line in &self.lines {
            let position = Vec2::new(DEBUG_LEFT, line.row);
            let width = line.text.chars().count() as f32 * DEBUG_CHAR_WIDTH;
            draw_list.rect(Rect::from_top_left(position, Vec2::new(width, DEBUG_FONT_SIZE)), background);
            draw_list.text(line.text.as_str(), position, DEBUG_FONT_SIZE, foreground);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawCommand;

    #[test]
    fn lines_draw_in_call_order_with_default_row() {
        let mut overlay = DebugOverlay::new();
        overlay.line("game_paused", false, None);
        overlay.line("player_can_move", true, Some(50.0));

        let mut draw_list = DrawList::new();
        overlay.draw(&mut draw_list);
        let texts: Vec<&str> = draw_list.texts().collect();
        assert_eq!(texts, vec!["game_paused: false", "player_can_move: true"]);

        match &draw_list.commands()[0] {
            DrawCommand::Rect { rect, color } => {
                assert_eq!(rect.top_left(), Vec2::new(10.0, 10.0));
                assert_eq!(*color, BLACK);
            }
            other => panic!("expected backing box, got {other:?}"),
        }
        match &draw_list.commands()[3] {
            DrawCommand::Text { position, color, .. } => {
                assert_eq!(*position, Vec2::new(10.0, 50.0));
                assert_eq!(*color, WHITE);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn no_overlay_answers_nothing() {
        let mut overlay = NoOverlay;
        let click = PointerEvent::left_click(Vec2::new(1.0, 1.0));
        assert!(!Challenge::is_active(&overlay));
        assert_eq!(overlay.check_button_click(&click), None);
        assert_eq!(overlay.check_mouse_click(&click), None);
    }
}
