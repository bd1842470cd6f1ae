use aedventure::overlay::DEBUG_FONT_SIZE;
use aedventure::render::WHITE;
use aedventure::{Color, Difficulty, DrawList, OverlayCommand, PauseMenu, PointerEvent, Rect, Vec2};

pub const BUTTON_SIZE: Vec2 = Vec2 { x: 320.0, y: 56.0 };
const BUTTON_COLOR: Color = [40, 40, 60, 230];
/// Backing colour of a selected button.
pub const SELECTED_COLOR: Color = [180, 140, 40, 240];
const SHADE: Color = [0, 0, 0, 150];
const LABEL_SIZE: f32 = 28.0;

/// A clickable labelled rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuButton {
    pub rect: Rect,
    pub label: String,
}

impl MenuButton {
    pub fn new(rect: Rect, label: impl Into<String>) -> Self {
        Self {
            rect,
            label: label.into(),
        }
    }

    pub fn hit(&self, event: &PointerEvent) -> bool {
        self.rect.contains_point(event.position)
    }

    pub fn draw(&self, draw_list: &mut DrawList) {
        self.draw_filled(draw_list, BUTTON_COLOR);
    }

    pub fn draw_filled(&self, draw_list: &mut DrawList, color: Color) {
        draw_list.rect(self.rect, color);
        // Approximate centering; glyph widths are only known to the renderer.
        let text_width = self.label.chars().count() as f32 * LABEL_SIZE * 0.5;
        let position = Vec2::new(
            self.rect.center().x - text_width / 2.0,
            self.rect.center().y - LABEL_SIZE / 2.0,
        );
        draw_list.text(self.label.as_str(), position, LABEL_SIZE, WHITE);
    }
}

/// One button per label, stacked around the middle of the viewport.
pub fn button_column(viewport: Vec2, labels: &[String]) -> Vec<MenuButton> {
    let spacing = BUTTON_SIZE.y + 16.0;
    let total = spacing * labels.len() as f32;
    let top = (viewport.y - total) / 2.0;
    let left = (viewport.x - BUTTON_SIZE.x) / 2.0;
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            MenuButton::new(
                Rect::from_top_left(Vec2::new(left, top + spacing * i as f32), BUTTON_SIZE),
                label.as_str(),
            )
        })
        .collect()
}

/// Pause menu: resume, cycle the difficulty and quit.
pub struct GameMenu {
    viewport: Vec2,
    difficulty: Difficulty,
    buttons: Vec<MenuButton>,
}

impl GameMenu {
    pub fn new(viewport: Vec2, difficulty: Difficulty) -> Self {
        let mut menu = Self {
            viewport,
            difficulty,
            buttons: Vec::new(),
        };
        menu.layout();
        menu
    }

    fn layout(&mut self) {
        let labels = [
            "Resume".to_string(),
            format!("Difficulty: {}", self.difficulty.label()),
            "Quit".to_string(),
        ];
        self.buttons = button_column(self.viewport, &labels);
    }
}

impl PauseMenu for GameMenu {
    fn display(&mut self, draw_list: &mut DrawList) {
        draw_list.rect(Rect::from_top_left(Vec2::ZERO, self.viewport), SHADE);
        draw_list.text("Paused", Vec2::new(10.0, self.viewport.y - 40.0), DEBUG_FONT_SIZE, WHITE);
        for button in &self.buttons {
            button.draw(draw_list);
        }
    }

    fn check_mouse_click(&mut self, event: &PointerEvent) -> Option<OverlayCommand> {
        let index = self.buttons.iter().position(|button| button.hit(event))?;
        match index {
            0 => Some(OverlayCommand::Resume),
            1 => {
                self.difficulty = self.difficulty.next();
                self.layout();
                Some(OverlayCommand::SetDifficulty(self.difficulty))
            }
            _ => Some(OverlayCommand::Quit),
        }
    }

    fn difficulty_changed(&mut self, difficulty: Difficulty) {
        if difficulty != self.difficulty {
            self.difficulty = difficulty;
            self.layout();
        }
    }
}
