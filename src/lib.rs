//! Ball Room - a frame-stepped rigid-ball simulation
//!
//! Core modules:
//! - `sim`: Renderer-agnostic simulation (bodies, obstacles, collisions, frustum tests)
//! - `settings`: Tunable simulation configuration (gravity, elasticity, drag, room)
//! - `renderer`: Plain GPU-facing instance data built from the simulation
//! - `error`: Crate error type

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Result, SimError};
pub use settings::{FixedStep, SimConfig, SpeedClamp};

/// Simulation constants
pub mod consts {
    /// Ball radius per unit of mass (radius = mass * k)
    pub const RADIUS_PER_MASS: f32 = 0.05;
    /// Mass used when the caller doesn't give one
    pub const DEFAULT_MASS: f32 = 1.0;

    /// Push-out distance added to the radius after a ball/box overlap
    pub const OBSTACLE_SKIN: f32 = 0.01;
    /// Extra slop on the ball/ball contact distance, as a fraction of the combined radii
    pub const BALL_CONTACT_SLOP: f32 = 0.005;
    /// Separation after a ball/ball hit, as a multiple of the combined radii
    pub const BALL_SEPARATION_FACTOR: f32 = 2.005;

    /// Default obstacle edge length (cube)
    pub const OBSTACLE_SIZE: f32 = 2.0;

    /// Room extents (meters)
    pub const ROOM_HALF_WIDTH: f32 = 10.0;
    pub const ROOM_HEIGHT: f32 = 20.0;

    /// Environment defaults
    pub const DEFAULT_GRAVITY: f32 = 9.81;
    pub const DEFAULT_ELASTICITY: f32 = 0.2;
    pub const DEFAULT_DRAG: f32 = 0.2;

    /// Speed range used by the early, clamped integrator
    pub const LEGACY_MIN_SPEED: f32 = 1.0;
    pub const LEGACY_MAX_SPEED: f32 = 5.0;

    /// Fixed simulation timestep (120 Hz) for the optional accumulator
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock frame fed into the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;
}
