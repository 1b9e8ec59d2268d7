//! Simulation settings
//!
//! Everything the UI layer can tune lives here and is handed to the world
//! explicitly. Persisted as JSON when the driver asks for it.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};
use crate::sim::RoomBounds;

/// Clamp-by-magnitude range for velocities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedClamp {
    pub min: f32,
    pub max: f32,
}

impl SpeedClamp {
    /// Range used by the early integrator (`[1.0, 5.0]`)
    pub const LEGACY: SpeedClamp = SpeedClamp {
        min: LEGACY_MIN_SPEED,
        max: LEGACY_MAX_SPEED,
    };

    pub fn new(min: f32, max: f32) -> Result<Self> {
        if !(min.is_finite() && min >= 0.0) {
            return Err(SimError::invalid("speed_clamp.min", min));
        }
        if !(max.is_finite() && max >= min) {
            return Err(SimError::invalid("speed_clamp.max", max));
        }
        Ok(Self { min, max })
    }

    /// Scale `v` so its length lies in `[min, max]`. A zero vector has no direction
    /// and stays zero.
    pub fn apply(&self, v: Vec3) -> Vec3 {
        let speed = v.length();
        if speed <= f32::EPSILON {
            return v;
        }
        let clamped = speed.clamp(self.min, self.max);
        v * (clamped / speed)
    }
}

/// Fixed-step accumulator parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedStep {
    pub dt: f32,
    pub max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self {
            dt: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Gravitational acceleration (m/s², applied along -Y)
    pub gravity: f32,
    /// Collision elasticity (0 = absorbed, 1 = lossless)
    pub elasticity: f32,
    /// Linear drag coefficient
    pub drag: f32,
    /// Room walls
    pub room: RoomBounds,
    /// Velocity magnitude clamp, off unless set
    pub velocity_clamp: Option<SpeedClamp>,
    /// Fixed-step accumulator, off unless set (wall-clock stepping)
    pub fixed_step: Option<FixedStep>,
    /// Ball culling display toggle (read by the renderer only)
    pub culling_enabled: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            elasticity: DEFAULT_ELASTICITY,
            drag: DEFAULT_DRAG,
            room: RoomBounds::default(),
            velocity_clamp: None,
            fixed_step: None,
            culling_enabled: false,
        }
    }
}

impl SimConfig {
    /// No energy loss anywhere: perfect bounces, no drag
    pub fn lossless() -> Self {
        Self {
            elasticity: 1.0,
            drag: 0.0,
            ..Self::default()
        }
    }

    /// Zero gravity and drag, perfect bounces
    pub fn weightless() -> Self {
        Self {
            gravity: 0.0,
            ..Self::lossless()
        }
    }

    /// Copy with UI-tunable coefficients clamped to `[0, 1]`
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();
        config.elasticity = clamp_unit("elasticity", self.elasticity);
        config.drag = clamp_unit("drag", self.drag);
        config
    }

    /// Reject settings the core can't run with
    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_finite() {
            return Err(SimError::invalid("gravity", self.gravity));
        }
        self.room.validate()?;
        if let Some(clamp) = self.velocity_clamp {
            SpeedClamp::new(clamp.min, clamp.max)?;
        }
        if let Some(step) = self.fixed_step {
            if !(step.dt.is_finite() && step.dt > 0.0) {
                return Err(SimError::invalid("fixed_step.dt", step.dt));
            }
            if step.max_substeps == 0 {
                return Err(SimError::invalid("fixed_step.max_substeps", 0.0));
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config.sanitized())
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json_string()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

fn clamp_unit(name: &str, value: f32) -> f32 {
    // NaN becomes 0 rather than poisoning every velocity it touches
    let clamped = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    if clamped != value {
        log::debug!("Clamped {} from {} to {}", name, value, clamped);
    }
    clamped
}
