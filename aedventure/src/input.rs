use std::collections::{HashMap, HashSet};

use winit::{
    event::{ElementState, KeyEvent, MouseButton},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::math::Vec2;

/// Tracks keyboard and mouse state across frames.
#[derive(Debug, Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,

    mouse_x: f32,
    mouse_y: f32,
    mouse_down: [bool; 8],
    mouse_pressed: [bool; 8],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame pressed/released flags.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_pressed.fill(false);
    }

    /// Handle a keyboard input event from winit.
    pub fn handle_key(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(keycode) = event.physical_key {
            match event.state {
                ElementState::Pressed => self.press_key(keycode),
                ElementState::Released => self.release_key(keycode),
            }
        }
    }

    pub fn press_key(&mut self, key: KeyCode) {
        if !self.keys_down.contains(&key) {
            self.keys_pressed.insert(key);
        }
        self.keys_down.insert(key);
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
        self.keys_released.insert(key);
    }

    /// Handle a mouse button input event from winit.
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if let Some(idx) = mouse_button_index(button) {
            match state {
                ElementState::Pressed => {
                    if !self.mouse_down[idx] {
                        self.mouse_pressed[idx] = true;
                    }
                    self.mouse_down[idx] = true;
                }
                ElementState::Released => {
                    self.mouse_down[idx] = false;
                }
            }
        }
    }

    /// Handle mouse cursor movement from winit.
    pub fn handle_cursor_moved(&mut self, x: f64, y: f64) {
        self.mouse_x = x as f32;
        self.mouse_y = y as f32;
    }

    /// Returns true if the key is currently held down.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        mouse_button_index(button)
            .map(|idx| self.mouse_down[idx])
            .unwrap_or(false)
    }

    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        mouse_button_index(button)
            .map(|idx| self.mouse_pressed[idx])
            .unwrap_or(false)
    }

    /// Current mouse cursor position in logical pixels.
    pub fn mouse_position(&self) -> Vec2 {
        Vec2::new(self.mouse_x, self.mouse_y)
    }

    /// Pointer events for every mouse button pressed this frame.
    pub fn pointer_presses(&self) -> Vec<PointerEvent> {
        [MouseButton::Left, MouseButton::Right, MouseButton::Middle]
            .into_iter()
            .filter(|&button| self.is_mouse_pressed(button))
            .map(|button| PointerEvent {
                position: self.mouse_position(),
                button,
            })
            .collect()
    }
}

/// A mouse press forwarded verbatim to overlay collaborators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Screen-space position in pixels (0,0 = top-left).
    pub position: Vec2,
    pub button: MouseButton,
}

impl PointerEvent {
    pub fn left_click(position: Vec2) -> Self {
        Self {
            position,
            button: MouseButton::Left,
        }
    }
}

/// Logical input actions the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Sprint,
    Attack,
    /// Pause menu toggle.
    Menu,
    /// Use a door, or talk to start the challenge.
    Interact,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Sprint,
        Action::Attack,
        Action::Menu,
        Action::Interact,
    ];

    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// A physical button that can be bound to an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Key(KeyCode),
    Mouse(MouseButton),
}

impl Button {
    fn is_down(self, input: &InputState) -> bool {
        match self {
            Button::Key(k) => input.is_key_down(k),
            Button::Mouse(b) => input.is_mouse_down(b),
        }
    }

    fn is_pressed(self, input: &InputState) -> bool {
        match self {
            Button::Key(k) => input.is_key_pressed(k),
            Button::Mouse(b) => input.is_mouse_pressed(b),
        }
    }
}

/// Mapping from logical actions to one or more physical buttons.
#[derive(Clone, Debug)]
pub struct InputMap {
    actions: HashMap<Action, Vec<Button>>,
}

impl InputMap {
    /// Create an input map with no bindings.
    pub fn empty() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Bind a key to an action. Repeated calls add alternates.
    pub fn bind_key(&mut self, action: Action, key: KeyCode) {
        self.actions
            .entry(action)
            .or_default()
            .push(Button::Key(key));
    }

    pub fn bind_mouse_button(&mut self, action: Action, button: MouseButton) {
        self.actions
            .entry(action)
            .or_default()
            .push(Button::Mouse(button));
    }

    pub fn bindings(&self, action: Action) -> &[Button] {
        self.actions.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check if an action is currently held down.
    pub fn action_down(&self, input: &InputState, action: Action) -> bool {
        self.bindings(action).iter().any(|&b| b.is_down(input))
    }

    /// Check if an action was pressed this frame.
    pub fn action_pressed(&self, input: &InputState, action: Action) -> bool {
        self.bindings(action).iter().any(|&b| b.is_pressed(input))
    }

    /// Sample every action once; the result is what the simulation reads for a tick.
    pub fn snapshot(&self, input: &InputState) -> ActionSnapshot {
        let mut snapshot = ActionSnapshot::default();
        for action in Action::ALL {
            if self.action_down(input, action) {
                snapshot.held |= action.bit();
            }
            if self.action_pressed(input, action) {
                snapshot.pressed |= action.bit();
            }
        }
        snapshot
    }
}

impl Default for InputMap {
    /// WASD and arrows for movement, shift to sprint, space or left ctrl to
    /// attack, P or escape for the menu, E to interact.
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind_key(Action::MoveUp, KeyCode::KeyW);
        map.bind_key(Action::MoveUp, KeyCode::ArrowUp);
        map.bind_key(Action::MoveDown, KeyCode::KeyS);
        map.bind_key(Action::MoveDown, KeyCode::ArrowDown);
        map.bind_key(Action::MoveLeft, KeyCode::KeyA);
        map.bind_key(Action::MoveLeft, KeyCode::ArrowLeft);
        map.bind_key(Action::MoveRight, KeyCode::KeyD);
        map.bind_key(Action::MoveRight, KeyCode::ArrowRight);
        map.bind_key(Action::Sprint, KeyCode::ShiftLeft);
        map.bind_key(Action::Sprint, KeyCode::ShiftRight);
        map.bind_key(Action::Attack, KeyCode::Space);
        map.bind_key(Action::Attack, KeyCode::ControlLeft);
        map.bind_key(Action::Menu, KeyCode::KeyP);
        map.bind_key(Action::Menu, KeyCode::Escape);
        map.bind_key(Action::Interact, KeyCode::KeyE);
        map
    }
}

/// Held and just-pressed logical actions for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionSnapshot {
    held: u16,
    pressed: u16,
}

impl ActionSnapshot {
    /// Snapshot with `actions` held (and not newly pressed).
    pub fn holding(actions: &[Action]) -> Self {
        Self {
            held: actions.iter().fold(0, |bits, a| bits | a.bit()),
            pressed: 0,
        }
    }

    /// Mark `action` as held and pressed this tick.
    #[must_use]
    pub fn with_pressed(mut self, action: Action) -> Self {
        self.held |= action.bit();
        self.pressed |= action.bit();
        self
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held & action.bit() != 0
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed & action.bit() != 0
    }

    /// Actions newly pressed this tick, in declaration order.
    pub fn pressed_actions(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(|&a| self.is_pressed(a))
    }
}

fn mouse_button_index(button: MouseButton) -> Option<usize> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        MouseButton::Back => Some(3),
        MouseButton::Forward => Some(4),
        MouseButton::Other(raw) => {
            let idx = raw as usize;
            let mapped = 5 + idx;
            (mapped < 8).then_some(mapped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternate_bindings_drive_the_same_action() {
        let map = InputMap::default();
        let mut input = InputState::new();
        input.press_key(KeyCode::ArrowUp);
        assert!(map.action_down(&input, Action::MoveUp));
        input.release_key(KeyCode::ArrowUp);
        input.press_key(KeyCode::KeyW);
        assert!(map.action_down(&input, Action::MoveUp));
        assert!(!map.action_down(&input, Action::MoveDown));
    }

    #[test]
    fn pressed_is_cleared_by_begin_frame_but_held_is_not() {
        let map = InputMap::default();
        let mut input = InputState::new();
        input.press_key(KeyCode::KeyE);
        let first = map.snapshot(&input);
        assert!(first.is_pressed(Action::Interact));
        assert!(first.is_held(Action::Interact));

        input.begin_frame();
        input.press_key(KeyCode::KeyE);
        let second = map.snapshot(&input);
        assert!(!second.is_pressed(Action::Interact));
        assert!(second.is_held(Action::Interact));
    }

    #[test]
    fn pointer_presses_report_cursor_position() {
        let mut input = InputState::new();
        input.handle_cursor_moved(12.0, 34.0);
        input.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
        let presses = input.pointer_presses();
        assert_eq!(presses, vec![PointerEvent::left_click(Vec2::new(12.0, 34.0))]);
        input.begin_frame();
        assert!(input.pointer_presses().is_empty());
    }

    #[test]
    fn snapshot_builders() {
        let snap = ActionSnapshot::holding(&[Action::MoveLeft, Action::Sprint])
            .with_pressed(Action::Menu);
        assert!(snap.is_held(Action::MoveLeft));
        assert!(snap.is_held(Action::Menu));
        assert!(!snap.is_pressed(Action::MoveLeft));
        assert_eq!(snap.pressed_actions().collect::<Vec<_>>(), vec![Action::Menu]);
    }
}
