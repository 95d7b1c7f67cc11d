/*
 * Aquarium Boids - Module Definitions
 *
 * This file defines the module structure for the boid simulation.
 * The simulation core (boid, store, steering, bounds, spatial_grid,
 * simulation) has no window dependency; app, input, renderer and ui wire it
 * to nannou and egui.
 */

// Re-export key components for easier access
pub use boid::Boid;
pub use bounds::{Bounds, ContainmentPolicy};
pub use camera::Camera;
pub use config::WorldConfig;
pub use debug::DebugInfo;
pub use error::{ConfigError, GridError};
pub use instance::BoidInstance;
pub use params::{SharedParams, SimulationParams};
pub use simulation::{Simulation, TickStats};
pub use spatial_grid::SpatialGrid;
pub use store::AgentStore;

// Define modules
pub mod app;
pub mod boid;
pub mod bounds;
pub mod camera;
pub mod config;
pub mod debug;
pub mod error;
pub mod input;
pub mod instance;
pub mod params;
pub mod renderer;
pub mod simulation;
pub mod spatial_grid;
pub mod steering;
pub mod store;
pub mod ui;

// Constants
pub const AQUARIUM_SCALE: f32 = 30.0;
pub const DEFAULT_BOID_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
