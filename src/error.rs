/*
 * Error Module
 *
 * Errors raised by configuration validation and by the spatial grid build.
 * Numerical degeneracies inside a tick are handled locally and never show up here.
 */

use thiserror::Error;

// Startup configuration errors, fatal before the first tick
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("grid resolution must be positive on every axis (axis {axis} is 0)")]
    ZeroGridResolution { axis: usize },

    #[error("bounding volume is degenerate on axis {axis}: min {min} >= max {max}")]
    DegenerateBounds { axis: usize, min: f32, max: f32 },

    #[error("bounding volume corners must be finite")]
    NonFiniteBounds,

    #[error("grid cell capacity must be positive")]
    ZeroCellCapacity,

    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error(transparent)]
    Grid(#[from] GridError),
}

// Spatial grid errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid resolution must be positive on every axis (axis {axis} is 0)")]
    ZeroResolution { axis: usize },

    #[error("cell {cell:?} is full (capacity {capacity})")]
    CellOverflow { cell: [usize; 3], capacity: usize },
}
