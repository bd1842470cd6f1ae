//! Backend-agnostic drawing.
//!
//! The core never touches pixels: the camera, overlays and debug lines push
//! [`DrawCommand`]s into a [`DrawList`], and the desktop shell rasterizes the
//! list once per frame. Commands are drawn in push order.

use crate::math::{Rect, Vec2};

/// Opaque handle used to reference images owned by the renderer.
///
/// Tile images use the map's gid as handle; the shell decides how other
/// images (animation frames) are numbered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(u32);

impl TextureHandle {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(self) -> u32 {
        self.0
    }
}

pub type Color = [u8; 4];

pub const WHITE: Color = [255, 255, 255, 255];
pub const BLACK: Color = [0, 0, 0, 255];

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Blit an image with its top-left corner at `position` (screen space).
    Image {
        texture: TextureHandle,
        position: Vec2,
    },
    /// Solid rectangle, alpha-blended.
    Rect { rect: Rect, color: Color },
    /// Single line of text whose top-left corner is `position`.
    Text {
        text: String,
        position: Vec2,
        size: f32,
        color: Color,
    },
}

/// Ordered list of draw commands for one frame.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all commands; call at the start of each frame.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn image(&mut self, texture: TextureHandle, position: Vec2) {
        self.commands.push(DrawCommand::Image { texture, position });
    }

    pub fn rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    pub fn text(&mut self, text: impl Into<String>, position: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            position,
            size,
            color,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Image blits only, in draw order.
    pub fn images(&self) -> impl Iterator<Item = (TextureHandle, Vec2)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Image { texture, position } => Some((*texture, *position)),
            _ => None,
        })
    }

    /// Text lines only, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
