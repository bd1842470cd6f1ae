//! Y-sorted camera that keeps the actor centered on screen.

use crate::math::{Rect, Vec2};
use crate::render::{DrawList, TextureHandle};
use crate::world::World;

/// Draws a world relative to the actor, nearer-to-bottom entities last.
#[derive(Clone, Copy, Debug)]
pub struct YSortCamera {
    half_viewport: Vec2,
    offset: Vec2,
}

impl YSortCamera {
    /// Create a camera for a viewport of `viewport` pixels.
    pub fn new(viewport: Vec2) -> Self {
        Self {
            half_viewport: Vec2::new((viewport.x / 2.0).floor(), (viewport.y / 2.0).floor()),
            offset: Vec2::ZERO,
        }
    }

    pub fn half_viewport(&self) -> Vec2 {
        self.half_viewport
    }

    /// Offset used by the last frame.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Recompute the offset so `focus` lands in the middle of the viewport.
    pub fn compute_offset(&mut self, focus: Vec2) -> Vec2 {
        self.offset = focus - self.half_viewport;
        self.offset
    }

    /// Map a world position to screen space.
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world - self.offset
    }

    /// Draw floor tiles unsorted, then every drawable entity in ascending
    /// order of its vertical center.
    ///
    /// Ties keep insertion order: tiles in layer order, the actor, then
    /// companions.
    pub fn render_frame(&mut self, world: &World, draw_list: &mut DrawList) {
        self.compute_offset(world.actor().position());

        for &(texture, position) in world.floor() {
            draw_list.image(texture, self.to_screen(position));
        }

        let mut entities: Vec<(Rect, TextureHandle)> = world
            .tiles()
            .iter()
            .filter(|tile| tile.is_renderable())
            .filter_map(|tile| Some((tile.rect(), tile.image()?)))
            .collect();
        if let Some(image) = world.actor().image() {
            entities.push((world.actor().rect(), image));
        }
        entities.extend(
            world
                .companions()
                .iter()
                .filter_map(|companion| Some((companion.rect(), companion.image()?))),
        );

        entities.sort_by(|a, b| a.0.center_y().total_cmp(&b.0.center_y()));
        for (rect, texture) in entities {
            draw_list.image(texture, self.to_screen(rect.top_left()));
        }
    }
}
