//! Sorting mini-game shown in challenge mode.
//!
//! The player first picks a difficulty, then sorts a row of shuffled bars
//! by clicking two bars to swap them. A sorted row completes the challenge.

use aedventure::render::WHITE;
use aedventure::{Challenge, Color, Difficulty, DrawList, OverlayCommand, PointerEvent, Rect, Vec2};

use crate::menu::{button_column, MenuButton, SELECTED_COLOR, BUTTON_SIZE};

const BACKDROP: Color = [10, 10, 20, 235];
const BAR_COLOR: Color = [90, 160, 220, 255];
const SOLVED_COLOR: Color = [90, 200, 120, 255];
const BAR_GAP: f32 = 8.0;
const MARGIN: f32 = 100.0;
const TITLE_SIZE: f32 = 32.0;

fn bar_count(difficulty: Difficulty) -> usize {
    match difficulty {
        Difficulty::Easy => 5,
        Difficulty::Medium => 8,
        Difficulty::Hard => 12,
    }
}

const DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

pub struct SortingChallenge {
    viewport: Vec2,
    shown: bool,
    active: bool,
    difficulty: Difficulty,
    bars: Vec<u32>,
    selected: Option<usize>,
    solved: bool,
    rng: fastrand::Rng,
    difficulty_buttons: Vec<MenuButton>,
    leave_button: MenuButton,
}

impl SortingChallenge {
    pub fn new(viewport: Vec2) -> Self {
        Self::with_rng(viewport, fastrand::Rng::new())
    }

    pub fn with_rng(viewport: Vec2, rng: fastrand::Rng) -> Self {
        let labels: Vec<String> = DIFFICULTIES.iter().map(|d| d.label().to_string()).collect();
        let leave_button = MenuButton::new(
            Rect::from_top_left(
                Vec2::new(viewport.x - BUTTON_SIZE.x - 20.0, 20.0),
                BUTTON_SIZE,
            ),
            "Leave",
        );
        Self {
            viewport,
            shown: false,
            active: false,
            difficulty: Difficulty::default(),
            bars: Vec::new(),
            selected: None,
            solved: false,
            rng,
            difficulty_buttons: button_column(viewport, &labels),
            leave_button,
        }
    }

    fn start_round(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        let count = bar_count(difficulty);
        self.bars = (1..=count as u32).collect();
        while is_sorted(&self.bars) {
            self.rng.shuffle(&mut self.bars);
        }
        self.selected = None;
        self.solved = false;
        self.active = true;
        log::info!("sorting challenge started on {} with {} bars", difficulty.label(), count);
    }

    /// Full-height column of bar `index`, used for hit testing.
    fn column(&self, index: usize) -> Rect {
        let count = self.bars.len().max(1) as f32;
        let width = (self.viewport.x - 2.0 * MARGIN) / count;
        Rect::new(
            MARGIN + width * index as f32,
            self.viewport.y * 0.2,
            width - BAR_GAP,
            self.viewport.y * 0.6,
        )
    }

    fn bar_rect(&self, index: usize, value: u32) -> Rect {
        let column = self.column(index);
        let height = column.h * value as f32 / self.bars.len().max(1) as f32;
        Rect::new(column.x, column.bottom() - height, column.w, height)
    }

    fn display_selection(&self, draw_list: &mut DrawList) {
        draw_list.text("Choose a difficulty", Vec2::new(MARGIN, MARGIN), TITLE_SIZE, WHITE);
        for (button, difficulty) in self.difficulty_buttons.iter().zip(DIFFICULTIES) {
            if difficulty == self.difficulty {
                button.draw_filled(draw_list, SELECTED_COLOR);
            } else {
                button.draw(draw_list);
            }
        }
    }

    fn display_round(&self, draw_list: &mut DrawList) {
        let title = if self.solved { "Sorted!" } else { "Sort the bars" };
        draw_list.text(title, Vec2::new(MARGIN, MARGIN), TITLE_SIZE, WHITE);
        for (index, &value) in self.bars.iter().enumerate() {
            let color = if self.solved {
                SOLVED_COLOR
            } else if self.selected == Some(index) {
                SELECTED_COLOR
            } else {
                BAR_COLOR
            };
            draw_list.rect(self.bar_rect(index, value), color);
        }
        self.leave_button.draw(draw_list);
    }
}

fn is_sorted(values: &[u32]) -> bool {
    values.windows(2).all(|pair| pair[0] <= pair[1])
}

impl Challenge for SortingChallenge {
    fn activate(&mut self, difficulty: Difficulty) {
        self.shown = true;
        self.active = false;
        self.difficulty = difficulty;
        self.bars.clear();
        self.selected = None;
        self.solved = false;
    }

    fn deactivate(&mut self) {
        self.shown = false;
        self.active = false;
        self.bars.clear();
        self.selected = None;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn display(&mut self, draw_list: &mut DrawList) {
        if !self.shown {
            return;
        }
        draw_list.rect(Rect::from_top_left(Vec2::ZERO, self.viewport), BACKDROP);
        if self.active {
            self.display_round(draw_list);
        } else {
            self.display_selection(draw_list);
        }
    }

    fn check_button_click(&mut self, event: &PointerEvent) -> Option<OverlayCommand> {
        if self.leave_button.hit(event) {
            return Some(OverlayCommand::EndChallenge);
        }
        if self.solved {
            return None;
        }
        let clicked = (0..self.bars.len()).find(|&i| self.column(i).contains_point(event.position))?;
        match self.selected.take() {
            None => self.selected = Some(clicked),
            Some(first) if first == clicked => {}
            Some(first) => {
                self.bars.swap(first, clicked);
                if is_sorted(&self.bars) {
                    self.solved = true;
                    log::info!("sorting challenge solved");
                    return Some(OverlayCommand::CompleteChallenge);
                }
            }
        }
        None
    }

    fn check_difficulty_selection(&mut self, event: &PointerEvent) -> Option<OverlayCommand> {
        let index = self
            .difficulty_buttons
            .iter()
            .position(|button| button.hit(event))?;
        let difficulty = DIFFICULTIES[index];
        self.start_round(difficulty);
        Some(OverlayCommand::SetDifficulty(difficulty))
    }
}
