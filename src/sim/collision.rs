//! Narrow-phase collision detection and response
//!
//! Ball/ball and ball/box tests. Responses are single-pass: no iteration, no
//! mass weighting. Both bodies are taken by `&mut`, so whatever a response does
//! is what the next test and the integrator see.

use glam::Vec3;

use super::body::Body;
use super::geometry::{FALLBACK_AXIS, normalize_or_up};
use super::obstacle::StaticObstacle;
use crate::consts::{BALL_CONTACT_SLOP, BALL_SEPARATION_FACTOR, OBSTACLE_SKIN};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point (if hit)
    pub point: Vec3,
    /// Unit normal pointing from the surface toward the moving ball
    pub normal: Vec3,
    /// How far inside the contact distance the ball sits
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            penetration: 0.0,
        }
    }
}

/// Distance below which two balls are considered touching
#[inline]
pub fn contact_distance(radius_a: f32, radius_b: f32) -> f32 {
    let combined = radius_a + radius_b;
    combined + combined * BALL_CONTACT_SLOP
}

/// Check two spheres. The normal points from A toward B.
pub fn sphere_sphere_collision(
    pos_a: Vec3,
    radius_a: f32,
    pos_b: Vec3,
    radius_b: f32,
) -> CollisionResult {
    let offset = pos_b - pos_a;
    let dist = offset.length();
    let contact = contact_distance(radius_a, radius_b);

    if dist < contact {
        let normal = normalize_or_up(offset);
        return CollisionResult {
            hit: true,
            point: pos_a + normal * radius_a,
            normal,
            penetration: contact - dist,
        };
    }

    CollisionResult::miss()
}

/// Check a sphere against a box using the closest point on the box.
/// The normal points from the box toward the sphere center.
pub fn sphere_aabb_collision(center: Vec3, radius: f32, obstacle: &StaticObstacle) -> CollisionResult {
    let closest = obstacle.closest_point(center);
    let diff = center - closest;
    let dist = diff.length();

    if dist < radius {
        if diff.try_normalize().is_none() {
            // Center inside the box: leave through the top face
            let top = obstacle.position().y + obstacle.half_extents().y;
            return CollisionResult {
                hit: true,
                point: Vec3::new(center.x, top, center.z),
                normal: FALLBACK_AXIS,
                penetration: radius + (top - center.y),
            };
        }
        return CollisionResult {
            hit: true,
            point: closest,
            normal: normalize_or_up(diff),
            penetration: radius - dist,
        };
    }

    CollisionResult::miss()
}

/// Resolve a ball/ball overlap in place.
///
/// B is moved out along A→B and the two velocities are exchanged, each scaled by
/// elasticity. The exchange is only momentum-correct for equal masses.
pub fn resolve_pairwise(a: &mut Body, b: &mut Body, elasticity: f32) -> bool {
    let e = elasticity.clamp(0.0, 1.0);
    let result = sphere_sphere_collision(a.position(), a.radius(), b.position(), b.radius());
    if !result.hit {
        return false;
    }

    let separation = (a.radius() + b.radius()) * BALL_SEPARATION_FACTOR;
    b.set_position(a.position() + result.normal * separation);

    let (va, vb) = (a.velocity(), b.velocity());
    a.set_velocity(vb * e);
    b.set_velocity(va * e);

    log::trace!(
        "Ball {:?} hit ball {:?} (penetration {:.4})",
        a.id(),
        b.id(),
        result.penetration
    );
    true
}

/// Resolve a ball/box overlap in place.
///
/// The ball is pushed out to `radius + skin` from the closest point and its whole
/// velocity is reversed and scaled by elasticity.
pub fn resolve_obstacle(body: &mut Body, obstacle: &StaticObstacle, elasticity: f32) -> bool {
    let e = elasticity.clamp(0.0, 1.0);
    let result = sphere_aabb_collision(body.position(), body.radius(), obstacle);
    if !result.hit {
        return false;
    }

    body.set_position(result.point + result.normal * (body.radius() + OBSTACLE_SKIN));
    body.set_velocity(-body.velocity() * e);

    log::trace!("Ball {:?} hit obstacle at {:?}", body.id(), obstacle.position());
    true
}
