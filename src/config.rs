/*
 * Config Module
 *
 * Startup configuration: aquarium extents, grid resolution, containment
 * policy and the initial tuning values. Loaded once from JSON (or defaulted)
 * and validated before the first tick; anything wrong here is fatal.
 */

use std::fs;
use std::path::Path;

use nannou::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bounds::{Bounds, ContainmentPolicy};
use crate::error::ConfigError;
use crate::params::SimulationParams;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub min_range: [f32; 3],
    pub max_range: [f32; 3],
    pub grid_cells_count: [usize; 3],
    // Per-cell capacity of the spatial grid; the flock size when unset
    pub grid_cell_capacity: Option<usize>,
    pub containment: ContainmentPolicy,
    // Fixed seed for reproducible spawning
    pub seed: Option<u64>,
    pub params: SimulationParams,
}

impl Default for WorldConfig {
    fn default() -> Self {
        let scale = crate::AQUARIUM_SCALE;
        Self {
            min_range: [-scale, 0.0, -scale],
            max_range: [scale, scale, scale],
            grid_cells_count: [3, 3, 3],
            grid_cell_capacity: None,
            containment: ContainmentPolicy::default(),
            seed: None,
            params: SimulationParams::default(),
        }
    }
}

impl WorldConfig {
    pub fn bounds(&self) -> Result<Bounds, ConfigError> {
        Bounds::new(Vec3::from(self.min_range), Vec3::from(self.max_range))
    }

    // Validate everything the first tick depends on
    pub fn validate(&self) -> Result<Bounds, ConfigError> {
        let bounds = self.bounds()?;

        if let Some(axis) = self.grid_cells_count.iter().position(|&n| n == 0) {
            return Err(ConfigError::ZeroGridResolution { axis });
        }

        if self.grid_cell_capacity == Some(0) {
            return Err(ConfigError::ZeroCellCapacity);
        }

        self.params.validate()?;
        Ok(bounds)
    }

    pub fn cell_capacity_for(&self, boid_count: usize) -> usize {
        self.grid_cell_capacity.unwrap_or_else(|| boid_count.max(1))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
