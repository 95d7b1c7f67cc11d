/*
 * Steering Module
 *
 * Computes the velocity adjustment for one boid from the three flocking rules:
 * 1. Cohesion: steer towards the average position of observed neighbors
 * 2. Separation: steer away from each neighbor, scaled by 1 / distance
 * 3. Alignment: steer towards the average velocity of observed neighbors
 *
 * A neighbor is observed when its distance is strictly below the visual range.
 * The candidate set may come from the whole flock or from the spatial grid;
 * the exact distance test is always applied, so the grid only affects speed.
 */

use nannou::prelude::*;

use crate::boid::Boid;
use crate::bounds::axis_value;
use crate::params::SimulationParams;
use crate::spatial_grid::{CellCoord, SpatialGrid};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteeringWeights {
    pub visual_range: f32,
    pub cohesion: f32,
    pub separation: f32,
    pub alignment: f32,
}

impl SteeringWeights {
    pub fn from_params(params: &SimulationParams) -> Self {
        Self {
            visual_range: params.visual_range,
            cohesion: params.cohesion_weight,
            separation: params.separation_weight,
            alignment: params.alignment_weight,
        }
    }
}

#[inline]
pub fn is_observed(a: Vec3, b: Vec3, visual_range: f32) -> bool {
    a.distance(b) < visual_range
}

// Steering for boid `index` over the given candidate indices
pub fn steer<I>(index: usize, boids: &[Boid], candidates: I, weights: &SteeringWeights) -> Vec3
where
    I: IntoIterator<Item = usize>,
{
    let current = &boids[index];

    let mut observed = 0usize;
    let mut position_sum = Vec3::ZERO;
    let mut separation_sum = Vec3::ZERO;
    let mut velocity_sum = Vec3::ZERO;

    for j in candidates {
        if j == index {
            continue;
        }

        let other = &boids[j];
        let distance = current.position.distance(other.position);
        if distance >= weights.visual_range {
            continue;
        }

        observed += 1;
        position_sum += other.position;
        velocity_sum += other.velocity;

        // Coincident boids still count as observed but have no away-direction
        if distance > 0.0 {
            separation_sum += (current.position - other.position) / distance;
        }
    }

    if observed == 0 {
        return Vec3::ZERO;
    }

    let count = observed as f32;
    let cohesion = (position_sum / count - current.position) * weights.cohesion;
    let separation = separation_sum * weights.separation;
    let alignment = (velocity_sum / count) * weights.alignment;

    cohesion + separation + alignment
}

// All-pairs variant
pub fn steer_all_pairs(index: usize, boids: &[Boid], weights: &SteeringWeights) -> Vec3 {
    steer(index, boids, 0..boids.len(), weights)
}

// How many cells to walk in each direction so a full visual-range sphere is covered
pub fn neighbor_reach(cell_size: Vec3, visual_range: f32) -> [usize; 3] {
    let mut reach = [1usize; 3];
    for (axis, r) in reach.iter_mut().enumerate() {
        let size = axis_value(cell_size, axis);
        let cells = (visual_range / size).ceil();
        // Float-to-int casts saturate, so a huge range becomes usize::MAX
        if cells > 1.0 {
            *r = cells as usize;
        }
    }
    reach
}

// Union of the cells around `center` within `reach`, appended to `out`
pub fn grid_candidates(grid: &SpatialGrid, center: CellCoord, reach: [usize; 3], out: &mut Vec<usize>) {
    let dims = grid.dimensions();
    let lo = |axis: usize| center[axis].saturating_sub(reach[axis]);
    let hi = |axis: usize| center[axis].saturating_add(reach[axis]).min(dims[axis] - 1);

    for z in lo(2)..=hi(2) {
        for y in lo(1)..=hi(1) {
            for x in lo(0)..=hi(0) {
                out.extend_from_slice(grid.cell([x, y, z]));
            }
        }
    }
}

// Grid-accelerated variant; `scratch` is reused between calls
pub fn steer_with_grid(
    index: usize,
    boids: &[Boid],
    grid: &SpatialGrid,
    weights: &SteeringWeights,
    scratch: &mut Vec<usize>,
) -> Vec3 {
    scratch.clear();
    let reach = neighbor_reach(grid.cell_size(), weights.visual_range);
    grid_candidates(grid, grid.cell_coord(boids[index].position), reach, scratch);
    steer(index, boids, scratch.iter().copied(), weights)
}

// Indices of boids observed by `index`, sorted, for inspection and tests
pub fn observed_neighbors<I>(index: usize, boids: &[Boid], candidates: I, visual_range: f32) -> Vec<usize>
where
    I: IntoIterator<Item = usize>,
{
    let position = boids[index].position;
    let mut observed: Vec<usize> = candidates
        .into_iter()
        .filter(|&j| j != index && is_observed(position, boids[j].position, visual_range))
        .collect();
    observed.sort_unstable();
    observed
}
