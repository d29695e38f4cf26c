//! Collision and bounds tests
//!
//! Everything here is pure geometry: circle-circle intersection for
//! projectile/target hits and the two out-of-bounds predicates.

use glam::Vec2;

/// Strict circle-circle intersection: centers closer than the radius sum
///
/// Tangent circles do not count as intersecting.
#[inline]
pub fn circles_intersect(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

/// True once a point leaves the canvas rectangle (projectile culling)
#[inline]
pub fn outside_canvas(pos: Vec2, width: f32, height: f32) -> bool {
    pos.x < 0.0 || pos.x > width || pos.y < 0.0 || pos.y > height
}

/// True once a circle has fully dropped below the floor (target escape)
#[inline]
pub fn past_floor(pos: Vec2, radius: f32, height: f32) -> bool {
    pos.y > height + radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CANVAS_H, CANVAS_W};

    #[test]
    fn test_overlapping_circles_intersect() {
        // Projectile at (100,100) r=3 against target at (105,100) r=15:
        // distance 5 < 18, must hit
        assert!(circles_intersect(
            Vec2::new(100.0, 100.0),
            3.0,
            Vec2::new(105.0, 100.0),
            15.0
        ));
    }

    #[test]
    fn test_tangent_circles_miss() {
        // Exactly touching is not a hit
        assert!(!circles_intersect(
            Vec2::new(0.0, 0.0),
            3.0,
            Vec2::new(18.0, 0.0),
            15.0
        ));
    }

    #[test]
    fn test_distant_circles_miss() {
        assert!(!circles_intersect(
            Vec2::new(0.0, 0.0),
            3.0,
            Vec2::new(100.0, 100.0),
            15.0
        ));
    }

    #[test]
    fn test_outside_canvas_edges() {
        assert!(!outside_canvas(Vec2::new(400.0, 300.0), CANVAS_W, CANVAS_H));
        assert!(outside_canvas(Vec2::new(-1.0, 300.0), CANVAS_W, CANVAS_H));
        assert!(outside_canvas(Vec2::new(801.0, 300.0), CANVAS_W, CANVAS_H));
        assert!(outside_canvas(Vec2::new(400.0, -1.0), CANVAS_W, CANVAS_H));
        assert!(outside_canvas(Vec2::new(400.0, 601.0), CANVAS_W, CANVAS_H));
    }

    #[test]
    fn test_past_floor_needs_full_radius() {
        // Center below the floor but the circle still peeking above it
        assert!(!past_floor(Vec2::new(100.0, CANVAS_H + 10.0), 15.0, CANVAS_H));
        assert!(past_floor(Vec2::new(100.0, CANVAS_H + 16.0), 15.0, CANVAS_H));
    }
}
