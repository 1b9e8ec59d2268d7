//! Axis-aligned box obstacles
//!
//! Boxes are immovable by default. A box flagged `kinetic` drifts with its own
//! velocity and bounces off the room walls without losing energy.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use super::boundary::RoomBounds;
use super::geometry::closest_point_on_aabb;
use crate::consts::OBSTACLE_SIZE;
use crate::settings::SpeedClamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticObstacle {
    position: Vec3,
    size: Vec3,
    velocity: Vec3,
    acceleration: Vec3,
    /// Moves during `World::step` when set
    pub kinetic: bool,
    model: Mat4,
}

impl StaticObstacle {
    /// A 2×2×2 box at `position`
    pub fn new(position: Vec3) -> Self {
        Self::with_size(position, Vec3::splat(OBSTACLE_SIZE))
    }

    pub fn with_size(position: Vec3, size: Vec3) -> Self {
        Self {
            position,
            size: size.abs(),
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            kinetic: false,
            model: Mat4::from_translation(position),
        }
    }

    /// A box that moves with `velocity` each step
    pub fn moving(position: Vec3, velocity: Vec3) -> Self {
        Self {
            velocity,
            kinetic: true,
            ..Self::new(position)
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    /// Translation-only model matrix
    pub fn render_transform(&self) -> Mat4 {
        self.model
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.model = Mat4::from_translation(position);
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn set_acceleration(&mut self, acceleration: Vec3) {
        self.acceleration = acceleration;
    }

    /// Closest point on (or inside) the box
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        closest_point_on_aabb(point, self.position, self.half_extents())
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        let d = (point - self.position).abs();
        d.cmple(self.half_extents()).all()
    }

    /// Explicit-Euler drift: position from the old velocity, then velocity.
    /// Only the clamp's upper bound applies to boxes.
    pub fn update(&mut self, dt: f32, clamp: Option<SpeedClamp>) {
        self.position += self.velocity * dt;
        self.velocity += self.acceleration * dt;
        if let Some(clamp) = clamp {
            self.velocity = self.velocity.clamp_length_max(clamp.max);
        }
        self.model = Mat4::from_translation(self.position);
    }

    /// Reverse each velocity component whose extent crosses a wall. Position isn't
    /// corrected; the box drifts back in on the following steps.
    pub fn edge(&mut self, room: &RoomBounds) -> bool {
        let half = self.half_extents();
        let mut hit = false;
        for axis in 0..3 {
            if self.position[axis] + half[axis] > room.max[axis]
                || self.position[axis] - half[axis] < room.min[axis]
            {
                self.velocity[axis] = -self.velocity[axis];
                hit = true;
            }
        }
        hit
    }
}
