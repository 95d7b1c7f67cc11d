/*
 * Simulation Module
 *
 * This module drives one simulation tick, strictly in this order:
 * 1. Snapshot the live boids into the read buffer
 * 2. Rebuild the spatial grid from the snapshot (when enabled)
 * 3. For every boid: steer, fold in wall forces, integrate, contain, commit
 *
 * Every boid reads only the snapshot and writes only its own slot, so the
 * per-boid pass can run sequentially or on rayon with identical results.
 * If the grid build overflows a cell, that tick falls back to all-pairs.
 */

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::boid::Boid;
use crate::bounds::{contain_reflective, Bounds, Containment, ContainmentPolicy};
use crate::config::WorldConfig;
use crate::error::ConfigError;
use crate::params::SimulationParams;
use crate::spatial_grid::SpatialGrid;
use crate::steering::{steer_all_pairs, steer_with_grid, SteeringWeights};
use crate::store::AgentStore;

// What happened during one tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickStats {
    pub used_grid: bool,
    pub fell_back: bool,
    pub discarded: usize,
    // The loaded params failed validation and the last accepted set was used
    pub reused_params: bool,
    pub duration: Duration,
}

// Per-tick constants shared by every boid
#[derive(Clone, Copy, Debug)]
struct TickContext {
    bounds: Bounds,
    containment: ContainmentPolicy,
    weights: SteeringWeights,
    wall_force_weight: f32,
    model_speed: f32,
    model_scale: f32,
}

pub struct Simulation {
    bounds: Bounds,
    containment: ContainmentPolicy,
    grid: SpatialGrid,
    store: AgentStore,
    cell_capacity: Option<usize>,
    rng: StdRng,
    accepted_params: SimulationParams,
    ticks: u64,
    fallbacks: u64,
    discarded: u64,
}

impl Simulation {
    // Validate the config and spawn the initial flock
    pub fn new(config: &WorldConfig) -> Result<Self, ConfigError> {
        let bounds = config.validate()?;
        let count = config.params.num_boids;
        let grid = SpatialGrid::new(bounds, config.grid_cells_count, config.cell_capacity_for(count))?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut simulation = Self {
            bounds,
            containment: config.containment,
            grid,
            store: AgentStore::default(),
            cell_capacity: config.grid_cell_capacity,
            rng,
            accepted_params: config.params.clone(),
            ticks: 0,
            fallbacks: 0,
            discarded: 0,
        };
        simulation.respawn(count, config.params.model_scale);

        Ok(simulation)
    }

    // Replace the flock with freshly spawned boids and re-provision the grid
    pub fn respawn(&mut self, count: usize, model_scale: f32) {
        let bounds = self.bounds;
        let boids: Vec<Boid> = (0..count)
            .map(|_| {
                let mut boid = Boid::random(&mut self.rng, &bounds);
                boid.update_transform(model_scale);
                boid
            })
            .collect();

        self.set_boids(boids);
    }

    // Install an explicit flock (tests, benches, scripted scenes)
    pub fn set_boids(&mut self, boids: Vec<Boid>) {
        let capacity = self.cell_capacity.unwrap_or_else(|| boids.len().max(1));
        self.grid.set_cell_capacity(capacity);
        self.store.replace(boids);
    }

    pub fn boids(&self) -> &[Boid] {
        self.store.as_slice()
    }

    pub fn store(&self) -> &AgentStore {
        &self.store
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn containment(&self) -> ContainmentPolicy {
        self.containment
    }

    pub fn set_containment(&mut self, containment: ContainmentPolicy) {
        self.containment = containment;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn fallbacks(&self) -> u64 {
        self.fallbacks
    }

    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    // Advance the flock by one tick
    pub fn tick(&mut self, params: &SimulationParams) -> TickStats {
        let start = Instant::now();
        let mut stats = TickStats::default();

        match params.validate() {
            Ok(()) => self.accepted_params.clone_from(params),
            Err(err) => {
                stats.reused_params = true;
                log::warn!("rejected parameters for tick {} ({}), keeping the previous ones", self.ticks, err);
            }
        }
        let params = &self.accepted_params;

        let ctx = TickContext {
            bounds: self.bounds,
            containment: self.containment,
            weights: SteeringWeights::from_params(params),
            wall_force_weight: params.wall_force_weight,
            model_speed: params.model_speed,
            model_scale: params.model_scale,
        };

        self.store.snapshot();

        if params.enable_spatial_grid {
            match self.grid.rebuild(self.store.read_buffer()) {
                Ok(()) => stats.used_grid = true,
                Err(err) => {
                    stats.fell_back = true;
                    self.fallbacks += 1;
                    log::warn!("spatial grid build aborted ({}), using all-pairs for tick {}", err, self.ticks);
                }
            }
        } else {
            self.grid.clear();
        }

        let grid = if stats.used_grid { Some(&self.grid) } else { None };
        let (live, snapshot) = self.store.split_for_tick();

        stats.discarded = if params.enable_parallel {
            live.par_iter_mut()
                .enumerate()
                .map_init(Vec::new, |scratch, (i, boid)| {
                    step_boid(i, boid, snapshot, grid, &ctx, scratch) as usize
                })
                .sum()
        } else {
            let mut scratch = Vec::new();
            let mut discarded = 0;
            for (i, boid) in live.iter_mut().enumerate() {
                if step_boid(i, boid, snapshot, grid, &ctx, &mut scratch) {
                    discarded += 1;
                }
            }
            discarded
        };

        self.discarded += stats.discarded as u64;
        self.ticks += 1;
        stats.duration = start.elapsed();
        stats
    }
}

// Advance one boid from the frozen snapshot; returns true if the result was discarded
fn step_boid(
    index: usize,
    boid: &mut Boid,
    snapshot: &[Boid],
    grid: Option<&SpatialGrid>,
    ctx: &TickContext,
    scratch: &mut Vec<usize>,
) -> bool {
    let previous = &snapshot[index];

    let mut update = match grid {
        Some(grid) => steer_with_grid(index, snapshot, grid, &ctx.weights, scratch),
        None => steer_all_pairs(index, snapshot, &ctx.weights),
    };

    if ctx.containment.repels() {
        update += ctx.bounds.wall_repulsion(previous.position, ctx.wall_force_weight);
    }

    let velocity = (previous.direction + update) * ctx.model_speed;
    let mut direction = previous.direction;
    if velocity.length_squared() > 0.0 {
        direction = velocity.normalize();
    }

    let mut position = previous.position;
    if ctx.containment.reflects() {
        match contain_reflective(&ctx.bounds, position, velocity, direction) {
            Containment::Commit(next) => position = next,
            Containment::Bounce { direction: reflected, .. } => direction = reflected,
        }
    } else {
        // Repel alone can overshoot a whole box width next to a wall
        position = ctx.bounds.clamp(position + velocity);
    }

    if !(position.is_finite() && direction.is_finite() && velocity.is_finite()) {
        log::debug!("boid {} produced a non-finite state, keeping its previous state", index);
        boid.clone_from(previous);
        return true;
    }

    boid.position = position;
    boid.direction = direction;
    boid.velocity = velocity;
    boid.update_transform(ctx.model_scale);
    false
}
