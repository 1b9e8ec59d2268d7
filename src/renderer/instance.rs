//! Per-instance data for a renderer
//!
//! Plain `Pod` structs a rendering layer can copy straight into GPU buffers.
//! Nothing here talks to a graphics API.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

use crate::sim::{Body, Frustum, StaticObstacle, World};

/// One ball: model matrix plus its current tint
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub model: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl BodyInstance {
    pub fn from_body(body: &Body) -> Self {
        let tint = body.tint();
        Self {
            model: body.render_transform().to_cols_array_2d(),
            ambient: tint.ambient.to_array(),
            diffuse: tint.diffuse.to_array(),
            specular: tint.specular.to_array(),
        }
    }
}

/// One box: translation-only model matrix
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ObstacleInstance {
    pub model: [[f32; 4]; 4],
}

impl ObstacleInstance {
    pub fn from_obstacle(obstacle: &StaticObstacle) -> Self {
        // Unit cube mesh scaled up to the box size
        let model = obstacle.render_transform() * Mat4::from_scale(obstacle.size());
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

/// Clipping plane uniform (vec4-padded for uniform buffer layout)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ClipPlane {
    pub position: [f32; 4],
    pub normal: [f32; 4],
}

fn padded(v: Vec3) -> [f32; 4] {
    v.extend(0.0).to_array()
}

/// The six clipping planes in frustum order
pub fn clip_planes(frustum: &Frustum) -> [ClipPlane; 6] {
    let planes = *frustum.planes();
    planes.map(|plane| ClipPlane {
        position: padded(plane.point),
        normal: padded(plane.normal),
    })
}

/// Instance data for every ball, in world order
pub fn body_instances(world: &World) -> Vec<BodyInstance> {
    world.bodies().iter().map(BodyInstance::from_body).collect()
}

pub fn obstacle_instances(world: &World) -> Vec<ObstacleInstance> {
    world.obstacles().iter().map(ObstacleInstance::from_obstacle).collect()
}

/// Fixed materials for non-ball geometry
pub mod colors {
    use super::Vec4;

    pub const OBSTACLE_AMBIENT: Vec4 = Vec4::new(0.02, 0.02, 0.02, 1.0);
    pub const OBSTACLE_DIFFUSE: Vec4 = Vec4::new(0.1, 0.35, 0.1, 1.0);
    pub const OBSTACLE_SPECULAR: Vec4 = Vec4::new(0.45, 0.55, 0.45, 1.0);
    /// Translucent view-volume walls
    pub const VIEW_VOLUME_AMBIENT: Vec4 = Vec4::new(0.2, 0.2, 0.2, 0.6);
    pub const VIEW_VOLUME_DIFFUSE: Vec4 = Vec4::new(0.6, 0.6, 0.6, 0.6);
    pub const VIEW_VOLUME_SPECULAR: Vec4 = Vec4::new(0.0, 0.0, 0.0, 0.6);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimConfig;
    use crate::sim::{Tint, frustum::Projection};

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<BodyInstance>(), 28 * 4);
        assert_eq!(std::mem::size_of::<ObstacleInstance>(), 16 * 4);
        assert_eq!(std::mem::size_of::<ClipPlane>(), 8 * 4);
        let plane = ClipPlane::zeroed();
        let bytes: &[u8] = bytemuck::bytes_of(&plane);
        assert_eq!(bytes.len(), 32);
    }

    #[test]
    fn test_body_instance_matches_body() {
        let mut world = World::new(SimConfig::default()).unwrap();
        world
            .create_body(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, 2.0)
            .unwrap();
        let instances = body_instances(&world);
        assert_eq!(instances.len(), 1);
        let model = Mat4::from_cols_array_2d(&instances[0].model);
        assert_eq!(model.w_axis, Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert!((model.x_axis.x - 0.1).abs() < 1e-6);
        assert_eq!(instances[0].diffuse, Tint::INSIDE.diffuse.to_array());
    }

    #[test]
    fn test_obstacle_instance_scales_unit_cube() {
        let instance = ObstacleInstance::from_obstacle(&StaticObstacle::new(Vec3::new(3.0, 1.0, 0.0)));
        let model = Mat4::from_cols_array_2d(&instance.model);
        assert_eq!(model.transform_point3(Vec3::splat(0.5)), Vec3::new(4.0, 2.0, 1.0));
    }

    #[test]
    fn test_material_colors() {
        for color in [colors::OBSTACLE_AMBIENT, colors::OBSTACLE_DIFFUSE, colors::OBSTACLE_SPECULAR] {
            assert_eq!(color.w, 1.0);
        }
        // View-volume walls are drawn see-through
        for color in [
            colors::VIEW_VOLUME_AMBIENT,
            colors::VIEW_VOLUME_DIFFUSE,
            colors::VIEW_VOLUME_SPECULAR,
        ] {
            assert!(color.w < 1.0);
        }
        assert!(colors::OBSTACLE_DIFFUSE.y > colors::OBSTACLE_DIFFUSE.x);
    }

    #[test]
    fn test_clip_planes_follow_frustum_order() {
        let frustum = Frustum::from_camera(
            Projection::Orthographic {
                height: 2.0,
                aspect: 1.0,
                near: 1.0,
                far: 3.0,
            },
            Mat4::IDENTITY,
        )
        .unwrap();
        let planes = clip_planes(&frustum);
        for (clip, plane) in planes.iter().zip(frustum.planes()) {
            assert_eq!(clip.position, padded(plane.point));
            assert_eq!(clip.normal, padded(plane.normal));
        }
        assert_eq!(planes[0].position, planes[2].position);
        assert_eq!(planes[3].position, planes[5].position);
    }
}
