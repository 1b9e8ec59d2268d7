//! Error types for the simulation core

use thiserror::Error;

use crate::sim::BodyId;

/// Errors surfaced by the simulation API
///
/// Geometry degeneracies (zero-length normals) are never errors; they fall back to
/// world up. Only construction and configuration can fail.
#[derive(Error, Debug)]
pub enum SimError {
    /// A numeric input outside its valid domain (e.g. zero mass)
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// A command-line value that doesn't parse
    #[error("invalid value for `--{name}`: {value:?}")]
    InvalidArgument {
        /// Option name
        name: &'static str,
        /// Text as given (empty when missing)
        value: String,
    },

    /// Handle doesn't refer to a live body
    #[error("unknown body {0:?}")]
    UnknownBody(BodyId),

    /// Configuration JSON couldn't be parsed or written
    #[error("settings: {0}")]
    Settings(#[from] serde_json::Error),

    /// Configuration file couldn't be read or written
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, value: f32) -> Self {
        SimError::InvalidParameter { name, value }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
