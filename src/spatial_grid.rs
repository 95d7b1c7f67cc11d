/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for efficient neighbor lookups.
 * It divides the aquarium into a fixed 3D lattice of cells and buckets boid
 * indices by cell, so a neighbor query only has to look at a handful of cells
 * instead of the whole flock.
 *
 * The grid is a plain bucket store: it is cleared and refilled every tick and
 * knows nothing about neighborhoods. Callers that want the cells around a boid
 * walk them themselves (see steering::grid_candidates).
 *
 * Each cell has a fixed capacity. An insert into a full cell fails with
 * GridError::CellOverflow instead of dropping the boid.
 */

use nannou::prelude::*;

use crate::boid::Boid;
use crate::bounds::{axis_value, Bounds};
use crate::error::GridError;

pub type CellCoord = [usize; 3];

pub struct SpatialGrid {
    bounds: Bounds,
    dimensions: [usize; 3],
    cell_size: Vec3,
    cell_capacity: usize,
    cells: Vec<Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(bounds: Bounds, dimensions: [usize; 3], cell_capacity: usize) -> Result<Self, GridError> {
        if let Some(axis) = dimensions.iter().position(|&n| n == 0) {
            return Err(GridError::ZeroResolution { axis });
        }

        let extent = bounds.extent();
        let cell_size = vec3(
            extent.x / dimensions[0] as f32,
            extent.y / dimensions[1] as f32,
            extent.z / dimensions[2] as f32,
        );

        let cell_count = dimensions[0] * dimensions[1] * dimensions[2];
        let cells = (0..cell_count).map(|_| Vec::new()).collect();

        Ok(Self {
            bounds,
            dimensions,
            cell_size,
            cell_capacity,
            cells,
        })
    }

    pub fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    pub fn cell_size(&self) -> Vec3 {
        self.cell_size
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn cell_capacity(&self) -> usize {
        self.cell_capacity
    }

    pub fn set_cell_capacity(&mut self, capacity: usize) {
        self.cell_capacity = capacity;
        self.clear();
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    // Map a position to its cell; anything outside the box lands in the nearest edge cell
    #[inline]
    pub fn cell_coord(&self, position: Vec3) -> CellCoord {
        let mut coord = [0usize; 3];
        for axis in 0..3 {
            let offset = axis_value(position, axis) - axis_value(self.bounds.min, axis);
            let cell = (offset / axis_value(self.cell_size, axis)).floor();
            let last = (self.dimensions[axis] - 1) as f32;
            // NaN falls through both comparisons of clamp, so pin it to 0 explicitly
            coord[axis] = if cell.is_nan() { 0 } else { cell.clamp(0.0, last) as usize };
        }
        coord
    }

    #[inline]
    pub fn flat_index(&self, coord: CellCoord) -> usize {
        (coord[2] * self.dimensions[1] + coord[1]) * self.dimensions[0] + coord[0]
    }

    // Clear the grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    // Insert a boid into the grid
    #[inline]
    pub fn insert(&mut self, boid_index: usize, position: Vec3) -> Result<CellCoord, GridError> {
        let coord = self.cell_coord(position);
        let capacity = self.cell_capacity;
        let flat = self.flat_index(coord);
        let cell = &mut self.cells[flat];

        if cell.len() >= capacity {
            return Err(GridError::CellOverflow { cell: coord, capacity });
        }

        cell.push(boid_index);
        Ok(coord)
    }

    // Clear and refill from a snapshot; on overflow the grid is left empty
    pub fn rebuild(&mut self, boids: &[Boid]) -> Result<(), GridError> {
        self.clear();

        for (i, boid) in boids.iter().enumerate() {
            if let Err(err) = self.insert(i, boid.position) {
                self.clear();
                return Err(err);
            }
        }

        Ok(())
    }

    // Boid indices bucketed into one cell, in insertion order
    pub fn cell(&self, coord: CellCoord) -> &[usize] {
        &self.cells[self.flat_index(coord)]
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    pub fn max_occupancy(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(0)
    }
}
