//! The player-controlled actor.
//!
//! Each tick runs, in order: input, attack cooldown, status, animation and
//! movement. The hitbox is the only rectangle that collides; the drawn
//! rectangle is recentered on it at the end of every tick.

use std::time::Duration;

use crate::animation::{Activity, AnimationSet, Facing, FrameCursor, Status};
use crate::collision::move_and_collide;
use crate::config::ActorConfig;
use crate::input::{Action, ActionSnapshot};
use crate::math::{Rect, Vec2};
use crate::render::TextureHandle;

/// Height of the feet strip used as hitbox.
pub const ACTOR_HITBOX_HEIGHT: f32 = 20.0;
/// How much narrower the hitbox is than the drawn rectangle.
pub const ACTOR_HITBOX_NARROWING: f32 = 20.0;

#[derive(Clone, Debug)]
pub struct Actor {
    rect: Rect,
    hitbox: Rect,
    status: Status,
    direction: Vec2,
    cursor: FrameCursor,
    image: Option<TextureHandle>,
    animations: AnimationSet,
    config: ActorConfig,
    attacking: bool,
    attack_time: Duration,
}

impl Actor {
    /// Spawn with the drawn rectangle's top-left corner at `anchor`.
    pub fn new(anchor: Vec2, config: ActorConfig, animations: AnimationSet) -> Self {
        let rect = Rect::from_top_left(anchor, config.size);
        let hitbox = Rect::new(
            rect.left() + ACTOR_HITBOX_NARROWING / 2.0,
            rect.bottom() - ACTOR_HITBOX_HEIGHT,
            (rect.w - ACTOR_HITBOX_NARROWING).max(1.0),
            ACTOR_HITBOX_HEIGHT,
        );
        let status = Status::default();
        let image = animations.get(status).frames.first().copied();
        Self {
            rect,
            hitbox,
            status,
            direction: Vec2::ZERO,
            cursor: FrameCursor::default(),
            image,
            animations,
            config,
            attacking: false,
            attack_time: Duration::ZERO,
        }
    }

    /// Run one simulation tick. `now` is the time since the game started.
    pub fn update(&mut self, input: &ActionSnapshot, now: Duration, obstacles: &[Rect]) {
        self.read_input(input, now);
        self.cooldowns(now);
        self.update_status();
        self.animate();
        self.move_by(input, obstacles);
        self.rect.set_center(self.hitbox.center());
    }

    fn read_input(&mut self, input: &ActionSnapshot, now: Duration) {
        if self.attacking {
            return;
        }

        if input.is_held(Action::MoveUp) {
            self.direction.y = -1.0;
            self.status = Status::new(Facing::Up, Activity::Default);
        } else if input.is_held(Action::MoveDown) {
            self.direction.y = 1.0;
            self.status = Status::new(Facing::Down, Activity::Default);
        } else {
            self.direction.y = 0.0;
        }

        // With diagonal input the vertical facing is kept.
        let vertical = self.direction.y != 0.0;
        if input.is_held(Action::MoveRight) {
            self.direction.x = 1.0;
            self.face(Facing::Right, vertical);
        } else if input.is_held(Action::MoveLeft) {
            self.direction.x = -1.0;
            self.face(Facing::Left, vertical);
        } else {
            self.direction.x = 0.0;
        }

        if input.is_held(Action::Attack) {
            self.attacking = true;
            self.attack_time = now;
            log::debug!("attack started at {:?}", now);
        }
    }

    fn face(&mut self, facing: Facing, keep_vertical: bool) {
        if keep_vertical {
            return;
        }
        self.status = Status::new(facing, Activity::Default);
    }

    fn cooldowns(&mut self, now: Duration) {
        if self.attacking && now.saturating_sub(self.attack_time) >= self.config.attack_cooldown() {
            self.attacking = false;
        }
    }

    fn update_status(&mut self) {
        if self.direction.is_zero() && self.status.activity == Activity::Default {
            self.status.activity = Activity::Idle;
        }

        if self.attacking {
            self.direction = Vec2::ZERO;
            self.status.activity = Activity::Attack;
        } else if self.status.activity == Activity::Attack {
            self.status.activity = Activity::Default;
        }
    }

    fn animate(&mut self) {
        let animation = self.animations.get(self.status);
        self.image = self.cursor.advance(self.config.animation_speed, animation);
    }

    fn move_by(&mut self, input: &ActionSnapshot, obstacles: &[Rect]) {
        if self.direction.is_zero() {
            return;
        }
        let mut speed = self.config.speed;
        if input.is_held(Action::Sprint) {
            speed *= self.config.sprint_multiplier;
        }
        let delta = self.direction.normalized() * speed;
        move_and_collide(&mut self.hitbox, delta, obstacles);
    }

    /// Center of the drawn rectangle.
    pub fn position(&self) -> Vec2 {
        self.rect.center()
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn hitbox(&self) -> Rect {
        self.hitbox
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Raw direction of this tick, before normalization.
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    /// Frame currently shown.
    pub fn image(&self) -> Option<TextureHandle> {
        self.image
    }

    pub fn frame_cursor(&self) -> f32 {
        self.cursor.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animation;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn actor_at(x: f32, y: f32) -> Actor {
        Actor::new(Vec2::new(x, y), ActorConfig::default(), AnimationSet::new())
    }

    fn held(actions: &[Action]) -> ActionSnapshot {
        ActionSnapshot::holding(actions)
    }

    #[test]
    fn spawn_places_rect_at_anchor_with_feet_hitbox() {
        let actor = actor_at(100.0, 100.0);
        assert_eq!(actor.rect(), Rect::new(100.0, 100.0, 64.0, 64.0));
        assert_eq!(actor.hitbox(), Rect::new(110.0, 144.0, 44.0, 20.0));
        assert_eq!(actor.status().to_string(), "down");
    }

    #[test]
    fn no_input_for_one_tick_turns_idle() {
        let mut actor = actor_at(100.0, 100.0);
        actor.update(&ActionSnapshot::default(), ms(0), &[]);
        assert_eq!(actor.status().to_string(), "down_idle");
        actor.update(&ActionSnapshot::default(), ms(16), &[]);
        assert_eq!(actor.status().to_string(), "down_idle");
    }

    #[test]
    fn movement_leaves_idle_and_sets_facing() {
        let mut actor = actor_at(100.0, 100.0);
        actor.update(&ActionSnapshot::default(), ms(0), &[]);
        actor.update(&held(&[Action::MoveLeft]), ms(16), &[]);
        assert_eq!(actor.status(), Status::new(Facing::Left, Activity::Default));
        assert_eq!(actor.hitbox().x, 105.0);
        actor.update(&ActionSnapshot::default(), ms(32), &[]);
        assert_eq!(actor.status().to_string(), "left_idle");
    }

    #[test]
    fn attack_lasts_for_the_cooldown_then_strips_suffix() {
        let mut actor = actor_at(100.0, 100.0);
        let attack = held(&[Action::Attack]);

        actor.update(&attack, ms(0), &[]);
        assert!(actor.is_attacking());
        assert_eq!(actor.status().to_string(), "down_attack");

        actor.update(&attack, ms(399), &[]);
        assert!(actor.is_attacking());
        assert_eq!(actor.status().activity, Activity::Attack);

        actor.update(&ActionSnapshot::default(), ms(401), &[]);
        assert!(!actor.is_attacking());
        assert_eq!(actor.status(), Status::new(Facing::Down, Activity::Default));

        actor.update(&ActionSnapshot::default(), ms(417), &[]);
        assert_eq!(actor.status().to_string(), "down_idle");
    }

    #[test]
    fn attack_replaces_idle_and_freezes_movement() {
        let mut actor = actor_at(100.0, 100.0);
        actor.update(&ActionSnapshot::default(), ms(0), &[]);
        assert_eq!(actor.status().activity, Activity::Idle);

        let start = actor.hitbox();
        actor.update(&held(&[Action::Attack, Action::MoveRight]), ms(16), &[]);
        assert_eq!(actor.status().to_string(), "right_attack");
        assert_eq!(actor.direction(), Vec2::ZERO);
        assert_eq!(actor.hitbox(), start);

        // Input is ignored for the rest of the attack.
        actor.update(&held(&[Action::MoveUp]), ms(100), &[]);
        assert_eq!(actor.status().to_string(), "right_attack");
        assert_eq!(actor.hitbox(), start);
    }

    #[test]
    fn diagonal_input_reports_vertical_facing_and_moves_normalized() {
        let mut actor = actor_at(100.0, 100.0);
        let start = actor.hitbox();
        actor.update(&held(&[Action::MoveUp, Action::MoveRight]), ms(0), &[]);
        assert_eq!(actor.status(), Status::new(Facing::Up, Activity::Default));
        assert_eq!(actor.direction(), Vec2::new(1.0, -1.0));

        let moved = actor.hitbox().top_left() - start.top_left();
        let expected = 5.0 / 2.0_f32.sqrt();
        assert!((moved.x - expected).abs() < 1e-4);
        assert!((moved.y + expected).abs() < 1e-4);
    }

    #[test]
    fn sprint_scales_speed() {
        let mut actor = actor_at(100.0, 100.0);
        actor.update(&held(&[Action::MoveDown, Action::Sprint]), ms(0), &[]);
        assert!((actor.hitbox().y - (144.0 + 9.0)).abs() < 1e-4);
    }

    #[test]
    fn drawn_rect_follows_resolved_hitbox_center() {
        let wall = Rect::new(160.0, 0.0, 64.0, 400.0);
        let mut actor = actor_at(100.0, 100.0);
        for tick in 0..10 {
            actor.update(&held(&[Action::MoveRight]), ms(tick * 16), &[wall]);
        }
        assert_eq!(actor.hitbox().right(), 160.0);
        assert_eq!(actor.rect().center(), actor.hitbox().center());
    }

    #[test]
    fn drawn_rect_is_recentered_on_every_tick() {
        let mut actor = actor_at(100.0, 100.0);
        actor.update(&ActionSnapshot::default(), ms(0), &[]);
        assert_eq!(actor.rect().center(), actor.hitbox().center());
        assert_eq!(actor.rect().top_left(), Vec2::new(100.0, 122.0));

        // A sideways step after that only moves the sprite sideways.
        actor.update(&held(&[Action::MoveRight]), ms(16), &[]);
        assert_eq!(actor.rect().top_left(), Vec2::new(105.0, 122.0));
    }

    #[test]
    fn status_always_has_one_facing_and_at_most_one_suffix() {
        let patterns: [&[Action]; 6] = [
            &[],
            &[Action::MoveUp],
            &[Action::MoveLeft, Action::MoveDown],
            &[Action::Attack],
            &[Action::MoveRight, Action::Sprint],
            &[Action::Attack, Action::MoveUp],
        ];
        let mut actor = actor_at(0.0, 0.0);
        for tick in 0..240u64 {
            let pattern = patterns[(tick as usize * 7 / 5) % patterns.len()];
            actor.update(&held(pattern), ms(tick * 16), &[]);
            let label = actor.status().to_string();
            let facings = ["up", "down", "left", "right"]
                .iter()
                .filter(|f| label.starts_with(*f))
                .count();
            assert_eq!(facings, 1, "{label}");
            assert!(!(label.contains("_idle") && label.contains("_attack")), "{label}");
        }
    }

    #[test]
    fn frames_come_from_the_current_status() {
        let idle = Animation::new(vec![TextureHandle::new(40), TextureHandle::new(41)]);
        let walk = Animation::new(vec![TextureHandle::new(50)]);
        let animations = AnimationSet::new()
            .with(Status::new(Facing::Down, Activity::Idle), idle)
            .with(Status::new(Facing::Down, Activity::Default), walk);
        let mut actor = Actor::new(Vec2::ZERO, ActorConfig::default(), animations);
        assert_eq!(actor.image(), Some(TextureHandle::new(50)));

        actor.update(&ActionSnapshot::default(), ms(0), &[]);
        assert_eq!(actor.image(), Some(TextureHandle::new(40)));

        actor.update(&held(&[Action::MoveLeft]), ms(16), &[]);
        assert_eq!(actor.image(), None);
    }
}
