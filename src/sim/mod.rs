//! Simulation module
//!
//! All physics lives here. This module must stay renderer-agnostic:
//! - No drawing calls; only positions, transforms and tints for a renderer to read
//! - Stable iteration order (insertion order)
//! - Single-threaded, one sweep per frame

pub mod body;
pub mod boundary;
pub mod collision;
pub mod frustum;
pub mod geometry;
pub mod obstacle;
pub mod scene;
pub mod world;

pub use body::{Body, BodyDiagnostics, BodyId, Tint, integrate};
pub use boundary::{RoomBounds, resolve_boundary};
pub use collision::{CollisionResult, resolve_obstacle, resolve_pairwise};
pub use frustum::{Containment, Frustum, Plane, Projection, classify_against_frustum};
pub use obstacle::StaticObstacle;
pub use scene::{Spawner, build_default_scene, default_obstacles};
pub use world::{FrameStats, World};
