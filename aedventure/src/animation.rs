//! Actor status labels and frame sequences.
//!
//! A status is a `(Facing, Activity)` pair; its [`Status::label`] is the
//! folder-style name (`"down_idle"`, `"left_attack"`, ...) used for assets and
//! diagnostics.

use std::fmt;

use crate::render::TextureHandle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Up, Facing::Down, Facing::Left, Facing::Right];

    pub fn label(self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }
}

/// Activity suffix of a status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Activity {
    /// Moving, or just left the attack state.
    #[default]
    Default,
    Idle,
    Attack,
}

impl Activity {
    pub const ALL: [Activity; 3] = [Activity::Default, Activity::Idle, Activity::Attack];

    pub fn suffix(self) -> &'static str {
        match self {
            Activity::Default => "",
            Activity::Idle => "_idle",
            Activity::Attack => "_attack",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Status {
    pub facing: Facing,
    pub activity: Activity,
}

impl Status {
    pub const COUNT: usize = 12;

    pub fn new(facing: Facing, activity: Activity) -> Self {
        Self { facing, activity }
    }

    /// All twelve statuses, in [`Status::index`] order.
    pub fn all() -> impl Iterator<Item = Status> {
        Facing::ALL.into_iter().flat_map(|facing| {
            Activity::ALL
                .into_iter()
                .map(move |activity| Status::new(facing, activity))
        })
    }

    pub fn index(self) -> usize {
        self.facing as usize * Activity::ALL.len() + self.activity as usize
    }

    pub fn label(self) -> String {
        format!("{}{}", self.facing.label(), self.activity.suffix())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.facing.label(), self.activity.suffix())
    }
}

/// An ordered sequence of frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Animation {
    pub frames: Vec<TextureHandle>,
}

impl Animation {
    pub fn new(frames: Vec<TextureHandle>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// One animation per status.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationSet {
    sequences: [Animation; Status::COUNT],
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, status: Status, animation: Animation) {
        self.sequences[status.index()] = animation;
    }

    #[must_use]
    pub fn with(mut self, status: Status, animation: Animation) -> Self {
        self.set(status, animation);
        self
    }

    pub fn get(&self, status: Status) -> &Animation {
        &self.sequences[status.index()]
    }

    /// Same animation for every status; used for entities without directional art.
    pub fn uniform(animation: Animation) -> Self {
        Self {
            sequences: std::array::from_fn(|_| animation.clone()),
        }
    }
}

/// Fractional frame cursor shared by every status of an entity.
///
/// Switching status does not reset the cursor; a cursor left past the end
/// of a shorter sequence is wrapped before it is used.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameCursor {
    position: f32,
}

impl FrameCursor {
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Advance by `step` and return the frame to show from `animation`.
    pub fn advance(&mut self, step: f32, animation: &Animation) -> Option<TextureHandle> {
        if animation.is_empty() {
            self.position = 0.0;
            return None;
        }
        self.position += step;
        if self.position >= animation.len() as f32 {
            self.position = 0.0;
        }
        animation.frames.get(self.position as usize).copied()
    }
}
