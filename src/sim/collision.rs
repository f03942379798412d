//! Contact tests between circles and axis-aligned rectangles
//!
//! Normals always point from the first shape toward the second, so a solver
//! pushes the second shape along `normal` and the first against it.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point (if hit)
    pub point: Vec2,
    /// Unit normal from the first shape toward the second
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check overlap between two circles
pub fn circle_circle_collision(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let delta = b_pos - a_pos;
    let dist_sq = delta.length_squared();
    let reach = a_radius + b_radius;

    if dist_sq >= reach * reach {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    // Concentric circles: pick an arbitrary but stable separation axis
    let normal = if dist > 1e-6 { delta / dist } else { Vec2::Y };

    CollisionResult {
        hit: true,
        point: a_pos + normal * a_radius,
        normal,
        penetration: reach - dist,
    }
}

/// Check overlap between a static rectangle (first) and a circle (second)
pub fn rect_circle_collision(
    rect_center: Vec2,
    half_size: Vec2,
    circle_pos: Vec2,
    radius: f32,
) -> CollisionResult {
    let min = rect_center - half_size;
    let max = rect_center + half_size;
    let closest = circle_pos.clamp(min, max);
    let delta = circle_pos - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > 1e-12 {
        if dist_sq >= radius * radius {
            return CollisionResult::miss();
        }
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: delta / dist,
            penetration: radius - dist,
        };
    }

    // Centre is inside the rectangle: push out through the nearest face
    let local = circle_pos - rect_center;
    let gap_x = half_size.x - local.x.abs();
    let gap_y = half_size.y - local.y.abs();
    let (normal, gap) = if gap_x < gap_y {
        (Vec2::new(local.x.signum(), 0.0), gap_x)
    } else {
        (Vec2::new(0.0, local.y.signum()), gap_y)
    };

    CollisionResult {
        hit: true,
        point: circle_pos + normal * gap,
        normal,
        penetration: radius + gap,
    }
}
