//! Room walls
//!
//! The room is an axis-aligned box. A ball poking through a wall is put back
//! against it and that velocity component is reversed and scaled by elasticity.
//! Each axis is handled on its own.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::consts::{ROOM_HALF_WIDTH, ROOM_HEIGHT};
use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for RoomBounds {
    fn default() -> Self {
        Self {
            min: Vec3::new(-ROOM_HALF_WIDTH, 0.0, -ROOM_HALF_WIDTH),
            max: Vec3::new(ROOM_HALF_WIDTH, ROOM_HEIGHT, ROOM_HALF_WIDTH),
        }
    }
}

impl RoomBounds {
    pub fn new(min: Vec3, max: Vec3) -> Result<Self> {
        let room = Self { min, max };
        room.validate()?;
        Ok(room)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(SimError::invalid("room", f32::NAN));
        }
        for axis in 0..3 {
            if self.min[axis] >= self.max[axis] {
                return Err(SimError::invalid("room.max", self.max[axis]));
            }
        }
        Ok(())
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// True when a sphere fits entirely inside
    pub fn contains_sphere(&self, center: Vec3, radius: f32) -> bool {
        (center - radius).cmpge(self.min).all() && (center + radius).cmple(self.max).all()
    }
}

/// Push a ball back inside the room. Returns true when any wall was hit.
///
/// The test is written against `bound ∓ radius` so a ball that was just put
/// back passes untouched on the next call.
pub fn resolve_boundary(body: &mut Body, room: &RoomBounds, elasticity: f32) -> bool {
    let e = elasticity.clamp(0.0, 1.0);
    let r = body.radius();
    let mut position = body.position();
    let mut velocity = body.velocity();
    let mut hit = false;

    for axis in 0..3 {
        let upper = room.max[axis] - r;
        let lower = room.min[axis] + r;
        if position[axis] > upper {
            position[axis] = upper;
            velocity[axis] = -velocity[axis] * e;
            hit = true;
        } else if position[axis] < lower {
            position[axis] = lower;
            velocity[axis] = -velocity[axis] * e;
            hit = true;
        }
    }

    if hit {
        log::trace!("Body {:?} hit a wall, v={:?}", body.id(), velocity);
        body.set_position(position);
        body.set_velocity(velocity);
    }
    hit
}
