//! Shared sphere geometry
//!
//! Small queries used by both the obstacle resolver and the frustum classifier.

use glam::Vec3;

/// Separation axis used when a direction has no length
pub const FALLBACK_AXIS: Vec3 = Vec3::Y;

/// Normalize `v`, substituting world up for a zero (or non-finite) vector
#[inline]
pub fn normalize_or_up(v: Vec3) -> Vec3 {
    v.try_normalize().unwrap_or_else(|| {
        log::trace!("Degenerate direction {:?}, falling back to +Y", v);
        FALLBACK_AXIS
    })
}

/// Closest point to `point` on (or inside) an axis-aligned box
#[inline]
pub fn closest_point_on_aabb(point: Vec3, center: Vec3, half_extents: Vec3) -> Vec3 {
    center + (point - center).clamp(-half_extents, half_extents)
}

/// Signed distance from `point` to the plane through `plane_point` with unit `normal`
///
/// Positive on the side the normal points to.
#[inline]
pub fn signed_distance(point: Vec3, plane_point: Vec3, normal: Vec3) -> f32 {
    normal.dot(point - plane_point)
}
