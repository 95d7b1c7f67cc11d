/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * and other debug information to be displayed in the UI.
 *
 * Includes metrics for:
 * - FPS (frames per second) and frame time
 * - Duration and outcome of the last simulation tick
 * - Spatial grid occupancy
 * - Grid fallbacks and discarded non-finite boids
 */

use std::time::Duration;

use crate::simulation::{Simulation, TickStats};

#[derive(Clone, Debug, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub tick_time: Duration,
    pub ticks: u64,
    pub used_grid: bool,
    pub grid_fallbacks: u64,
    pub discarded_boids: u64,
    pub occupied_cells: usize,
    pub total_cells: usize,
    pub max_cell_occupancy: usize,
    pub selected_boid_index: Option<usize>,
}

impl DebugInfo {
    // Pull counters from the driver after a tick
    pub fn record_tick(&mut self, stats: &TickStats, simulation: &Simulation) {
        self.tick_time = stats.duration;
        self.used_grid = stats.used_grid;
        self.refresh(simulation);
    }

    pub fn refresh(&mut self, simulation: &Simulation) {
        let grid = simulation.grid();
        self.ticks = simulation.ticks();
        self.grid_fallbacks = simulation.fallbacks();
        self.discarded_boids = simulation.discarded();
        self.occupied_cells = grid.occupied_cells();
        self.total_cells = grid.cell_count();
        self.max_cell_occupancy = grid.max_occupancy();
    }

    pub fn lines(&self, boid_count: usize) -> Vec<String> {
        vec![
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time.as_secs_f64() * 1000.0),
            format!("Tick time: {:.2} ms", self.tick_time.as_secs_f64() * 1000.0),
            format!("Ticks: {}", self.ticks),
            format!("Boids: {}", boid_count),
            format!(
                "Grid: {} ({}/{} cells, max {})",
                if self.used_grid { "on" } else { "off" },
                self.occupied_cells,
                self.total_cells,
                self.max_cell_occupancy
            ),
            format!("Grid fallbacks: {}", self.grid_fallbacks),
            format!("Discarded boids: {}", self.discarded_boids),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    #[test]
    fn record_tick_mirrors_the_driver() {
        let mut config = WorldConfig {
            seed: Some(1),
            ..WorldConfig::default()
        };
        config.params.num_boids = 20;

        let mut sim = Simulation::new(&config).unwrap();
        let stats = sim.tick(&config.params);

        let mut info = DebugInfo::default();
        info.record_tick(&stats, &sim);

        assert_eq!(info.ticks, 1);
        assert!(info.used_grid);
        assert_eq!(info.total_cells, 27);
        assert!(info.occupied_cells >= 1);
        assert_eq!(info.lines(20).len(), 8);
    }
}
