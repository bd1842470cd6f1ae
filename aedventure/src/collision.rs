//! Axis-separated collision between the actor's hitbox and static obstacles.
//!
//! Resolution runs once per axis after the displacement along that axis has
//! been applied. Every intersecting obstacle clamps the leading edge of the
//! hitbox flush against its own opposing edge, in iteration order, so with
//! several simultaneous overlaps the last obstacle wins. Per-tick steps are
//! small next to a tile, which keeps that case rare; it is a known
//! limitation rather than something to resolve here.

use crate::math::{Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Push `hitbox` out of every intersecting obstacle along `axis`.
///
/// `direction` is the movement direction of this tick; only the sign of its
/// component on `axis` matters. A zero component leaves the hitbox alone.
pub fn resolve_axis<'a, I>(hitbox: &mut Rect, direction: Vec2, axis: Axis, obstacles: I)
where
    I: IntoIterator<Item = &'a Rect>,
{
    for obstacle in obstacles {
        if !obstacle.intersects(hitbox) {
            continue;
        }
        match axis {
            Axis::Horizontal => {
                if direction.x > 0.0 {
                    hitbox.set_right(obstacle.left());
                }
                if direction.x < 0.0 {
                    hitbox.set_left(obstacle.right());
                }
            }
            Axis::Vertical => {
                if direction.y > 0.0 {
                    hitbox.set_bottom(obstacle.top());
                }
                if direction.y < 0.0 {
                    hitbox.set_top(obstacle.bottom());
                }
            }
        }
    }
}

/// Displace `hitbox` by `delta`, X first then Y, resolving each axis
/// against `obstacles` before the next one is applied.
pub fn move_and_collide(hitbox: &mut Rect, delta: Vec2, obstacles: &[Rect]) {
    hitbox.x += delta.x;
    resolve_axis(hitbox, delta, Axis::Horizontal, obstacles);
    hitbox.y += delta.y;
    resolve_axis(hitbox, delta, Axis::Vertical, obstacles);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_right_into_wall_stops_flush_at_its_left_edge() {
        let wall = Rect::new(55.0, 0.0, 64.0, 64.0);
        let mut hitbox = Rect::new(40.0, 10.0, 10.0, 20.0);
        assert_eq!(hitbox.right(), 50.0);

        move_and_collide(&mut hitbox, Vec2::new(10.0, 0.0), &[wall]);
        assert_eq!(hitbox.right(), 55.0);
        assert_eq!(hitbox.y, 10.0);
    }

    #[test]
    fn each_direction_clamps_the_leading_edge() {
        let block = Rect::new(100.0, 100.0, 50.0, 50.0);

        let mut left = Rect::new(145.0, 110.0, 20.0, 20.0);
        resolve_axis(&mut left, Vec2::new(-1.0, 0.0), Axis::Horizontal, [&block]);
        assert_eq!(left.left(), 150.0);

        let mut down = Rect::new(110.0, 85.0, 20.0, 20.0);
        resolve_axis(&mut down, Vec2::new(0.0, 1.0), Axis::Vertical, [&block]);
        assert_eq!(down.bottom(), 100.0);

        let mut up = Rect::new(110.0, 145.0, 20.0, 20.0);
        resolve_axis(&mut up, Vec2::new(0.0, -1.0), Axis::Vertical, [&block]);
        assert_eq!(up.top(), 150.0);
    }

    #[test]
    fn axis_pass_never_touches_the_other_axis() {
        let block = Rect::new(100.0, 100.0, 50.0, 50.0);
        let mut hitbox = Rect::new(95.0, 120.0, 20.0, 20.0);
        resolve_axis(&mut hitbox, Vec2::new(1.0, 1.0), Axis::Horizontal, [&block]);
        assert_eq!(hitbox.y, 120.0);
        assert!(!hitbox.intersects(&block));
    }

    #[test]
    fn zero_direction_on_axis_leaves_overlap_alone() {
        let block = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut hitbox = Rect::new(5.0, 5.0, 10.0, 10.0);
        resolve_axis(&mut hitbox, Vec2::new(0.0, 1.0), Axis::Horizontal, [&block]);
        assert_eq!(hitbox, Rect::new(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn diagonal_into_corner_slides_along_wall() {
        let wall = Rect::new(50.0, 0.0, 50.0, 200.0);
        let mut hitbox = Rect::new(35.0, 50.0, 10.0, 10.0);
        move_and_collide(&mut hitbox, Vec2::new(7.0, 7.0), &[wall]);
        assert_eq!(hitbox.right(), 50.0);
        assert_eq!(hitbox.y, 57.0);
    }

    #[test]
    fn no_overlap_remains_for_any_single_axis_step() {
        let obstacles = [
            Rect::new(64.0, 64.0, 64.0, 54.0),
            Rect::new(200.0, 64.0, 64.0, 54.0),
        ];
        for step in [-9.0_f32, -4.5, 4.5, 9.0] {
            for start_x in (0..320).step_by(7) {
                let mut hitbox = Rect::new(start_x as f32, 80.0, 44.0, 20.0);
                if obstacles.iter().any(|o| o.intersects(&hitbox)) {
                    continue;
                }
                hitbox.x += step;
                resolve_axis(&mut hitbox, Vec2::new(step, 0.0), Axis::Horizontal, &obstacles);
                assert!(
                    obstacles.iter().all(|o| !o.intersects(&hitbox)),
                    "overlap after step {step} from x={start_x}: {hitbox:?}"
                );
                assert_eq!(hitbox.y, 80.0);
            }
        }
    }
}
