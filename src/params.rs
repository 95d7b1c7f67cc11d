/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that contains all the
 * adjustable parameters for the boid simulation. These parameters can be
 * modified through the UI. It also provides methods for parameter change detection.
 *
 * SharedParams is the hand-off between the UI (single writer) and the
 * simulation (single reader). Every field is an atomic accessed with relaxed
 * ordering: the simulation reads a copy once at the start of a tick, and a
 * value that is one tick stale is fine.
 */

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// Parameters for the simulation that can be adjusted via UI
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub num_boids: usize,
    pub visual_range: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub wall_force_weight: f32,
    pub model_speed: f32,
    pub model_scale: f32,
    pub pause_simulation: bool,
    pub show_debug: bool,
    pub show_grid: bool,
    // Performance settings
    pub enable_parallel: bool,
    pub enable_spatial_grid: bool,

    // Internal state for tracking changes
    #[serde(skip)]
    previous_values: Option<ParamSnapshot>,
}

// A snapshot of parameter values used for change detection
#[derive(Clone, Debug, PartialEq)]
struct ParamSnapshot {
    num_boids: usize,
    visual_range: f32,
    cohesion_weight: f32,
    separation_weight: f32,
    alignment_weight: f32,
    wall_force_weight: f32,
    model_speed: f32,
    model_scale: f32,
    pause_simulation: bool,
    show_debug: bool,
    show_grid: bool,
    enable_parallel: bool,
    enable_spatial_grid: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            num_boids: 500,
            visual_range: 1.0,
            cohesion_weight: 0.001,
            separation_weight: 0.001,
            alignment_weight: 0.001,
            wall_force_weight: 0.1,
            model_speed: 0.1,
            model_scale: 0.5,
            pause_simulation: false,
            show_debug: false,
            show_grid: false,
            enable_parallel: true,
            enable_spatial_grid: true,
            previous_values: None,
        }
    }
}

impl SimulationParams {
    // Take a snapshot of current parameter values for change detection
    pub fn take_snapshot(&mut self) {
        self.previous_values = Some(ParamSnapshot {
            num_boids: self.num_boids,
            visual_range: self.visual_range,
            cohesion_weight: self.cohesion_weight,
            separation_weight: self.separation_weight,
            alignment_weight: self.alignment_weight,
            wall_force_weight: self.wall_force_weight,
            model_speed: self.model_speed,
            model_scale: self.model_scale,
            pause_simulation: self.pause_simulation,
            show_debug: self.show_debug,
            show_grid: self.show_grid,
            enable_parallel: self.enable_parallel,
            enable_spatial_grid: self.enable_spatial_grid,
        });
    }

    // Check if any parameters have changed since the last snapshot
    // Returns (num_boids_changed, any_changed)
    pub fn detect_changes(&self) -> (bool, bool) {
        let prev = match &self.previous_values {
            Some(prev) => prev,
            None => return (false, false),
        };

        let num_boids_changed = self.num_boids != prev.num_boids;
        let any_changed = num_boids_changed
            || self.visual_range != prev.visual_range
            || self.cohesion_weight != prev.cohesion_weight
            || self.separation_weight != prev.separation_weight
            || self.alignment_weight != prev.alignment_weight
            || self.wall_force_weight != prev.wall_force_weight
            || self.model_speed != prev.model_speed
            || self.model_scale != prev.model_scale
            || self.pause_simulation != prev.pause_simulation
            || self.show_debug != prev.show_debug
            || self.show_grid != prev.show_grid
            || self.enable_parallel != prev.enable_parallel
            || self.enable_spatial_grid != prev.enable_spatial_grid;

        (num_boids_changed, any_changed)
    }

    // Reject values that would poison every tick
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("visual_range", self.visual_range),
            ("cohesion_weight", self.cohesion_weight),
            ("separation_weight", self.separation_weight),
            ("alignment_weight", self.alignment_weight),
            ("wall_force_weight", self.wall_force_weight),
            ("model_speed", self.model_speed),
            ("model_scale", self.model_scale),
        ];

        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }

        if self.visual_range < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "visual_range",
                value: self.visual_range,
            });
        }

        Ok(())
    }

    // Get parameter ranges for UI sliders
    pub fn get_num_boids_range() -> RangeInclusive<usize> {
        1..=5000
    }

    pub fn get_scale_range() -> RangeInclusive<f32> {
        0.01..=1.0
    }

    pub fn get_speed_range() -> RangeInclusive<f32> {
        -1.0..=1.0
    }

    pub fn get_weight_range() -> RangeInclusive<f32> {
        0.0..=1.0
    }

    pub fn get_visual_range_range() -> RangeInclusive<f32> {
        0.0..=30.0
    }

    pub fn get_wall_force_range() -> RangeInclusive<f32> {
        0.0..=1.0
    }
}

#[derive(Debug, Default)]
struct ParamsCell {
    num_boids: AtomicUsize,
    visual_range: AtomicU32,
    cohesion_weight: AtomicU32,
    separation_weight: AtomicU32,
    alignment_weight: AtomicU32,
    wall_force_weight: AtomicU32,
    model_speed: AtomicU32,
    model_scale: AtomicU32,
    pause_simulation: AtomicBool,
    show_debug: AtomicBool,
    show_grid: AtomicBool,
    enable_parallel: AtomicBool,
    enable_spatial_grid: AtomicBool,
}

// Cloneable handle: the UI publishes, the simulation loads once per tick
#[derive(Clone, Debug, Default)]
pub struct SharedParams {
    cell: Arc<ParamsCell>,
}

#[inline]
fn store_f32(slot: &AtomicU32, value: f32) {
    slot.store(value.to_bits(), Ordering::Relaxed);
}

#[inline]
fn load_f32(slot: &AtomicU32) -> f32 {
    f32::from_bits(slot.load(Ordering::Relaxed))
}

impl SharedParams {
    pub fn new(initial: &SimulationParams) -> Self {
        let shared = Self::default();
        shared.publish(initial);
        shared
    }

    pub fn publish(&self, params: &SimulationParams) {
        let c = &self.cell;
        c.num_boids.store(params.num_boids, Ordering::Relaxed);
        store_f32(&c.visual_range, params.visual_range);
        store_f32(&c.cohesion_weight, params.cohesion_weight);
        store_f32(&c.separation_weight, params.separation_weight);
        store_f32(&c.alignment_weight, params.alignment_weight);
        store_f32(&c.wall_force_weight, params.wall_force_weight);
        store_f32(&c.model_speed, params.model_speed);
        store_f32(&c.model_scale, params.model_scale);
        c.pause_simulation.store(params.pause_simulation, Ordering::Relaxed);
        c.show_debug.store(params.show_debug, Ordering::Relaxed);
        c.show_grid.store(params.show_grid, Ordering::Relaxed);
        c.enable_parallel.store(params.enable_parallel, Ordering::Relaxed);
        c.enable_spatial_grid.store(params.enable_spatial_grid, Ordering::Relaxed);
    }

    // Per-field relaxed reads; fields may come from different publishes
    pub fn load(&self) -> SimulationParams {
        let c = &self.cell;
        SimulationParams {
            num_boids: c.num_boids.load(Ordering::Relaxed),
            visual_range: load_f32(&c.visual_range),
            cohesion_weight: load_f32(&c.cohesion_weight),
            separation_weight: load_f32(&c.separation_weight),
            alignment_weight: load_f32(&c.alignment_weight),
            wall_force_weight: load_f32(&c.wall_force_weight),
            model_speed: load_f32(&c.model_speed),
            model_scale: load_f32(&c.model_scale),
            pause_simulation: c.pause_simulation.load(Ordering::Relaxed),
            show_debug: c.show_debug.load(Ordering::Relaxed),
            show_grid: c.show_grid.load(Ordering::Relaxed),
            enable_parallel: c.enable_parallel.load(Ordering::Relaxed),
            enable_spatial_grid: c.enable_spatial_grid.load(Ordering::Relaxed),
            previous_values: None,
        }
    }
}
