//! # Strata Error Types
//!
//! All recoverable errors raised by the voxel subsystem.
//!
//! Programming errors (out-of-range local coordinates, writing `Nothing`
//! into a chunk grid) panic instead of returning one of these.

use thiserror::Error;

/// Errors that can occur in the voxel subsystem.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrataError {
    /// A remap was requested over an empty input range.
    #[error("cannot remap over degenerate input range [{min}, {max}]")]
    DegenerateRange {
        /// Lower bound of the input range.
        min: f64,
        /// Upper bound of the input range.
        max: f64,
    },

    /// Configuration values are inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Reading a configuration file failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// A streaming reference position had a NaN or infinite component.
    #[error("reference position {0:?} is not finite")]
    NonFinitePosition([f32; 3]),

    /// A streaming reference position was so far out that the chunks
    /// around it have no `i32` world coordinates.
    #[error("reference position {0:?} is outside the world grid")]
    PositionOutOfRange([f32; 3]),

    /// An edit tried to store the "unloaded" marker in the world.
    #[error("cannot write the unloaded marker at ({x}, {y}, {z})")]
    UnloadedVoxelWrite {
        /// World X coordinate.
        x: i32,
        /// World Y coordinate.
        y: i32,
        /// World Z coordinate.
        z: i32,
    },
}

impl From<std::io::Error> for StrataError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for voxel subsystem operations.
pub type StrataResult<T> = Result<T, StrataError>;
