//! Rendering-side data
//!
//! The simulation never draws. This module turns world state into plain
//! instance and uniform data for whichever renderer consumes it.

pub mod instance;

pub use instance::{BodyInstance, ClipPlane, ObstacleInstance, body_instances, clip_planes, colors, obstacle_instances};
