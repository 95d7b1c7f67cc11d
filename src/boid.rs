/*
 * Boid Module
 *
 * This module defines the Boid struct, the per-agent simulation state.
 * Each boid carries:
 * 1. Position inside the aquarium
 * 2. Direction: its unit heading
 * 3. Velocity: the raw movement delta of the last tick
 * 4. A cached model transform for the renderer (never read by the simulation)
 */

use nannou::prelude::*;
use rand::Rng;

use crate::bounds::Bounds;

#[derive(Clone, Debug, PartialEq)]
pub struct Boid {
    pub position: Vec3,
    pub direction: Vec3,
    pub velocity: Vec3,
    pub color: [f32; 4],
    pub transform: Mat4,
}

impl Boid {
    pub fn new(position: Vec3, direction: Vec3) -> Self {
        let direction = if direction.length_squared() > 0.0 {
            direction.normalize()
        } else {
            Vec3::Y
        };

        Self {
            position,
            direction,
            velocity: direction,
            color: crate::DEFAULT_BOID_COLOR,
            transform: Mat4::from_translation(position),
        }
    }

    // Spawn at a uniformly random point in the box, heading in a random direction
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: &Bounds) -> Self {
        let position = vec3(
            rng.gen_range(bounds.min.x..bounds.max.x),
            rng.gen_range(bounds.min.y..bounds.max.y),
            rng.gen_range(bounds.min.z..bounds.max.z),
        );

        // Rejection keeps the zero vector out of normalize
        let mut direction = Vec3::ZERO;
        while direction.length_squared() < 1.0e-6 {
            direction = vec3(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
        }

        Self::new(position, direction)
    }

    // Recompute the render transform: translate * rotate(+Y -> direction) * scale
    pub fn update_transform(&mut self, model_scale: f32) {
        self.transform = compose_transform(self.position, self.direction, model_scale);
    }
}

pub fn compose_transform(position: Vec3, direction: Vec3, model_scale: f32) -> Mat4 {
    let heading = if direction.length_squared() > 0.0 {
        direction.normalize()
    } else {
        Vec3::Y
    };

    Mat4::from_translation(position)
        * rotation_between(Vec3::Y, heading)
        * Mat4::from_scale(Vec3::splat(model_scale * 0.5))
}

// Rotation taking unit vector `from` onto unit vector `to` (Rodrigues)
pub fn rotation_between(from: Vec3, to: Vec3) -> Mat4 {
    let axis = from.cross(to);
    let cos = from.dot(to);

    if axis.length_squared() < 1.0e-12 {
        if cos > 0.0 {
            return Mat4::IDENTITY;
        }
        // Antiparallel: half turn about any axis perpendicular to `from`
        let perpendicular = if from.x.abs() < 0.9 { Vec3::X } else { Vec3::Z };
        let half_turn_axis = from.cross(perpendicular).normalize();
        return Mat4::from_axis_angle(half_turn_axis, PI);
    }

    let k = 1.0 / (1.0 + cos);
    let (x, y, z) = (axis.x, axis.y, axis.z);

    Mat4::from_cols(
        vec4(x * x * k + cos, x * y * k + z, x * z * k - y, 0.0),
        vec4(x * y * k - z, y * y * k + cos, y * z * k + x, 0.0),
        vec4(x * z * k + y, y * z * k - x, z * z * k + cos, 0.0),
        vec4(0.0, 0.0, 0.0, 1.0),
    )
}
