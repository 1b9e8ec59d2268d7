//! View-volume classification
//!
//! A frustum is six planes with outward unit normals in a fixed order:
//! near, top, right, far, bottom, left. The first three pass through the near
//! top-right corner, the last three through the far bottom-left corner.
//! Consumers index the planes positionally, so the order is part of the contract.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::geometry::{normalize_or_up, signed_distance};
use crate::error::{Result, SimError};

/// Plane slots
pub const NEAR: usize = 0;
pub const TOP: usize = 1;
pub const RIGHT: usize = 2;
pub const FAR: usize = 3;
pub const BOTTOM: usize = 4;
pub const LEFT: usize = 5;

/// Where a sphere sits relative to a plane or the whole volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Containment {
    #[default]
    Inside,
    Intersecting,
    Outside,
}

/// A plane given by a point on it and an outward unit normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normalize_or_up(normal),
        }
    }

    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        signed_distance(p, self.point, self.normal)
    }

    /// Sphere vs. plane sidedness. Touching from outside counts as outside.
    pub fn classify_sphere(&self, center: Vec3, radius: f32) -> Containment {
        let d = self.signed_distance(center);
        if d >= radius {
            Containment::Outside
        } else if d <= -radius {
            Containment::Inside
        } else {
            Containment::Intersecting
        }
    }
}

/// Camera projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in degrees
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        /// Full height of the view volume
        height: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    fn validate(&self) -> Result<()> {
        let (aspect, near, far) = match *self {
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => {
                if !(fov_y > 0.0 && fov_y < 180.0) {
                    return Err(SimError::invalid("fov_y", fov_y));
                }
                (aspect, near, far)
            }
            Projection::Orthographic {
                height,
                aspect,
                near,
                far,
            } => {
                if !(height.is_finite() && height > 0.0) {
                    return Err(SimError::invalid("height", height));
                }
                (aspect, near, far)
            }
        };
        if !(aspect.is_finite() && aspect > 0.0) {
            return Err(SimError::invalid("aspect", aspect));
        }
        if !(near.is_finite() && near > 0.0) {
            return Err(SimError::invalid("near", near));
        }
        if !(far.is_finite() && far > near) {
            return Err(SimError::invalid("far", far));
        }
        Ok(())
    }

    /// Half extents (width, height) of the near and far rectangles
    fn half_extents(&self) -> ((f32, f32), (f32, f32), f32, f32) {
        match *self {
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => {
                let tan = (fov_y.to_radians() * 0.5).tan();
                let (hn, hf) = (near * tan, far * tan);
                ((hn * aspect, hn), (hf * aspect, hf), near, far)
            }
            Projection::Orthographic {
                height,
                aspect,
                near,
                far,
            } => {
                let h = height * 0.5;
                ((h * aspect, h), (h * aspect, h), near, far)
            }
        }
    }
}

/// Six-plane view volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frustum {
    planes: [Plane; 6],
}

impl Frustum {
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Build from the two anchor corners and the six outward normals
    pub fn from_anchors(near_vertex: Vec3, far_vertex: Vec3, normals: [Vec3; 6]) -> Self {
        let planes = std::array::from_fn(|i| {
            let anchor = if i <= RIGHT { near_vertex } else { far_vertex };
            Plane::new(anchor, normals[i])
        });
        Self { planes }
    }

    /// Build from camera projection and world-to-view matrix.
    ///
    /// The camera looks down -Z in view space.
    pub fn from_camera(projection: Projection, view: Mat4) -> Result<Self> {
        projection.validate()?;
        let ((wn, hn), (wf, hf), near, far) = projection.half_extents();
        let to_world = view.inverse();
        let corner = |x: f32, y: f32, z: f32| to_world.transform_point3(Vec3::new(x, y, z));

        let ntl = corner(-wn, hn, -near);
        let ntr = corner(wn, hn, -near);
        let nbl = corner(-wn, -hn, -near);
        let nbr = corner(wn, -hn, -near);
        let ftl = corner(-wf, hf, -far);
        let ftr = corner(wf, hf, -far);
        let fbl = corner(-wf, -hf, -far);
        let fbr = corner(wf, -hf, -far);

        let center = (ntl + ntr + nbl + nbr + ftl + ftr + fbl + fbr) / 8.0;

        Ok(Self {
            planes: [
                outward_plane(ntr, [ntl, ntr, nbr], center),
                outward_plane(ntr, [ntl, ntr, ftr], center),
                outward_plane(ntr, [ntr, nbr, fbr], center),
                outward_plane(fbl, [fbl, fbr, ftr], center),
                outward_plane(fbl, [nbl, fbl, fbr], center),
                outward_plane(fbl, [ntl, nbl, fbl], center),
            ],
        })
    }

    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    pub fn plane(&self, index: usize) -> &Plane {
        &self.planes[index]
    }

    /// Corner shared by the near, top and right planes
    pub fn near_anchor(&self) -> Vec3 {
        self.planes[NEAR].point
    }

    /// Corner shared by the far, bottom and left planes
    pub fn far_anchor(&self) -> Vec3 {
        self.planes[FAR].point
    }

    /// Conservative sphere test. Outside on any plane wins over intersecting.
    pub fn classify_sphere(&self, center: Vec3, radius: f32) -> Containment {
        let mut result = Containment::Inside;
        for plane in &self.planes {
            match plane.classify_sphere(center, radius) {
                Containment::Outside => return Containment::Outside,
                Containment::Intersecting => result = Containment::Intersecting,
                Containment::Inside => {}
            }
        }
        result
    }
}

fn outward_plane(anchor: Vec3, [a, b, c]: [Vec3; 3], interior: Vec3) -> Plane {
    let mut normal = normalize_or_up((b - a).cross(c - a));
    if normal.dot(interior - anchor) > 0.0 {
        normal = -normal;
    }
    Plane { point: anchor, normal }
}

/// Classify a body and update its tint (see [`Body::classify`])
pub fn classify_against_frustum(body: &mut Body, frustum: &Frustum) -> Containment {
    body.classify(frustum)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    /// Identity view, 90° vertical fov, square aspect, near 1, far 10
    fn camera() -> Frustum {
        Frustum::from_camera(
            Projection::Perspective {
                fov_y: 90.0,
                aspect: 1.0,
                near: 1.0,
                far: 10.0,
            },
            Mat4::IDENTITY,
        )
        .unwrap()
    }

    #[test]
    fn test_plane_order_and_anchors() {
        let f = camera();
        assert!((f.near_anchor() - Vec3::new(1.0, 1.0, -1.0)).length() < EPS);
        assert!((f.far_anchor() - Vec3::new(-10.0, -10.0, -10.0)).length() < EPS);
        for i in [NEAR, TOP, RIGHT] {
            assert_eq!(f.plane(i).point, f.near_anchor());
        }
        for i in [FAR, BOTTOM, LEFT] {
            assert_eq!(f.plane(i).point, f.far_anchor());
        }

        let s = std::f32::consts::FRAC_1_SQRT_2;
        assert!((f.plane(NEAR).normal - Vec3::Z).length() < EPS);
        assert!((f.plane(FAR).normal - Vec3::NEG_Z).length() < EPS);
        assert!((f.plane(TOP).normal - Vec3::new(0.0, s, s)).length() < EPS);
        assert!((f.plane(RIGHT).normal - Vec3::new(s, 0.0, s)).length() < EPS);
        assert!((f.plane(BOTTOM).normal - Vec3::new(0.0, -s, s)).length() < EPS);
        assert!((f.plane(LEFT).normal - Vec3::new(-s, 0.0, s)).length() < EPS);
    }

    #[test]
    fn test_classify_inside_intersecting_outside() {
        let f = camera();
        assert_eq!(f.classify_sphere(Vec3::new(0.0, 0.0, -5.0), 0.1), Containment::Inside);
        assert_eq!(
            f.classify_sphere(Vec3::new(0.0, 0.0, -1.05), 0.1),
            Containment::Intersecting
        );
        assert_eq!(f.classify_sphere(Vec3::new(0.0, 0.0, -0.5), 0.1), Containment::Outside);
        assert_eq!(f.classify_sphere(Vec3::new(0.0, 0.0, 5.0), 0.1), Containment::Outside);
        assert_eq!(f.classify_sphere(Vec3::new(0.0, 0.0, -20.0), 0.1), Containment::Outside);
    }

    #[test]
    fn test_outside_beats_intersecting() {
        let f = camera();
        // Straddles the near plane and sits well past the right plane
        let center = Vec3::new(5.0, 0.0, -1.0);
        assert_eq!(f.plane(NEAR).classify_sphere(center, 0.2), Containment::Intersecting);
        assert_eq!(f.plane(RIGHT).classify_sphere(center, 0.2), Containment::Outside);
        assert_eq!(f.classify_sphere(center, 0.2), Containment::Outside);
    }

    #[test]
    fn test_plane_boundaries() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(plane.classify_sphere(Vec3::new(0.0, 1.0, 0.0), 1.0), Containment::Outside);
        assert_eq!(plane.classify_sphere(Vec3::new(0.0, -1.0, 0.0), 1.0), Containment::Inside);
        assert_eq!(
            plane.classify_sphere(Vec3::new(0.0, 0.5, 0.0), 1.0),
            Containment::Intersecting
        );
    }

    #[test]
    fn test_translated_camera() {
        let eye = Vec3::new(0.0, 10.0, 30.0);
        let view = Mat4::look_at_rh(eye, Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
        let f = Frustum::from_camera(
            Projection::Perspective {
                fov_y: 45.0,
                aspect: 4.0 / 3.0,
                near: 0.1,
                far: 100.0,
            },
            view,
        )
        .unwrap();
        assert_eq!(f.classify_sphere(Vec3::new(0.0, 10.0, 0.0), 0.5), Containment::Inside);
        assert_eq!(f.classify_sphere(Vec3::new(0.0, 10.0, 40.0), 0.5), Containment::Outside);
    }

    #[test]
    fn test_orthographic_box() {
        let f = Frustum::from_camera(
            Projection::Orthographic {
                height: 4.0,
                aspect: 1.0,
                near: 1.0,
                far: 5.0,
            },
            Mat4::IDENTITY,
        )
        .unwrap();
        assert!((f.plane(TOP).normal - Vec3::Y).length() < EPS);
        assert!((f.plane(LEFT).normal - Vec3::NEG_X).length() < EPS);
        assert_eq!(f.classify_sphere(Vec3::new(1.0, 1.0, -3.0), 0.5), Containment::Inside);
        assert_eq!(f.classify_sphere(Vec3::new(1.8, 0.0, -3.0), 0.5), Containment::Intersecting);
        assert_eq!(f.classify_sphere(Vec3::new(3.0, 0.0, -3.0), 0.5), Containment::Outside);
    }

    #[test]
    fn test_rejects_bad_projection() {
        let bad = Projection::Perspective {
            fov_y: 60.0,
            aspect: 1.0,
            near: 5.0,
            far: 1.0,
        };
        assert!(Frustum::from_camera(bad, Mat4::IDENTITY).is_err());
    }

    #[test]
    fn test_from_anchors_normalizes() {
        let f = Frustum::from_anchors(
            Vec3::ONE,
            -Vec3::ONE,
            [Vec3::Z * 2.0, Vec3::Y, Vec3::X, Vec3::NEG_Z, Vec3::NEG_Y, Vec3::ZERO],
        );
        assert_eq!(f.plane(NEAR).normal, Vec3::Z);
        assert_eq!(f.plane(NEAR).point, Vec3::ONE);
        assert_eq!(f.plane(BOTTOM).point, -Vec3::ONE);
        assert_eq!(f.plane(LEFT).normal, Vec3::Y);
    }
}
