/*
 * Instance Module
 *
 * Per-boid data laid out for a GPU instance buffer. The simulation never
 * touches this type; the render side maps the store into it once per frame.
 *
 * Layout (128 bytes, every field at a 16-byte offset):
 *   position, direction, velocity, color : [f32; 4]  (w = 0 for the vectors)
 *   model                                : [[f32; 4]; 4], column-major
 */

use bytemuck::{Pod, Zeroable};

use crate::boid::Boid;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct BoidInstance {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub velocity: [f32; 4],
    pub color: [f32; 4],
    pub model: [[f32; 4]; 4],
}

impl BoidInstance {
    pub fn from_boid(boid: &Boid) -> Self {
        let p = boid.position;
        let d = boid.direction;
        let v = boid.velocity;

        Self {
            position: [p.x, p.y, p.z, 0.0],
            direction: [d.x, d.y, d.z, 0.0],
            velocity: [v.x, v.y, v.z, 0.0],
            color: boid.color,
            model: boid.transform.to_cols_array_2d(),
        }
    }
}

// Refill `out` from the store, reusing its allocation
pub fn write_instances(boids: &[Boid], out: &mut Vec<BoidInstance>) {
    out.clear();
    out.extend(boids.iter().map(BoidInstance::from_boid));
}

pub fn as_bytes(instances: &[BoidInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
