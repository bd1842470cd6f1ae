//! Scripted companion that trails the actor.

use crate::animation::{Animation, FrameCursor};
use crate::math::{Rect, Vec2};
use crate::render::TextureHandle;

/// Follow behavior of a companion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FollowConfig {
    /// Maximum step per tick in pixels.
    pub speed: f32,
    /// The companion stands still while within this distance of its target.
    pub radius: f32,
    pub animation_speed: f32,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            radius: 96.0,
            animation_speed: 0.15,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Companion {
    name: String,
    rect: Rect,
    follow: FollowConfig,
    animation: Animation,
    cursor: FrameCursor,
    image: Option<TextureHandle>,
}

impl Companion {
    /// Spawn with the drawn rectangle's top-left corner at `anchor`.
    pub fn new(
        name: impl Into<String>,
        anchor: Vec2,
        size: Vec2,
        follow: FollowConfig,
        animation: Animation,
    ) -> Self {
        let image = animation.frames.first().copied();
        Self {
            name: name.into(),
            rect: Rect::from_top_left(anchor, size),
            follow,
            animation,
            cursor: FrameCursor::default(),
            image,
        }
    }

    /// Step toward `target` (the actor's center), stopping at the follow radius.
    pub fn update(&mut self, target: Vec2) {
        self.image = self
            .cursor
            .advance(self.follow.animation_speed, &self.animation);

        let center = self.rect.center();
        let distance = center.distance(target);
        if distance <= self.follow.radius {
            return;
        }
        let step = self.follow.speed.min(distance - self.follow.radius);
        let direction = (target - center).normalized();
        self.rect.set_center(center + direction * step);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn position(&self) -> Vec2 {
        self.rect.center()
    }

    pub fn image(&self) -> Option<TextureHandle> {
        self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn companion_at(x: f32, y: f32) -> Companion {
        Companion::new(
            "capecao",
            Vec2::new(x, y),
            Vec2::new(64.0, 64.0),
            FollowConfig::default(),
            Animation::default(),
        )
    }

    #[test]
    fn stays_put_inside_follow_radius() {
        let mut companion = companion_at(0.0, 0.0);
        let start = companion.position();
        companion.update(start + Vec2::new(50.0, 0.0));
        assert_eq!(companion.position(), start);
    }

    #[test]
    fn steps_toward_far_target_at_speed() {
        let mut companion = companion_at(0.0, 0.0);
        let start = companion.position();
        companion.update(start + Vec2::new(0.0, 500.0));
        assert_eq!(companion.position(), start + Vec2::new(0.0, 3.0));
    }

    #[test]
    fn never_overshoots_the_radius() {
        let mut companion = companion_at(0.0, 0.0);
        let target = companion.position() + Vec2::new(97.0, 0.0);
        companion.update(target);
        assert!((companion.position().distance(target) - 96.0).abs() < 1e-4);
        companion.update(target);
        assert!((companion.position().distance(target) - 96.0).abs() < 1e-4);
    }
}
