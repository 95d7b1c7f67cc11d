/*
 * Bounds Module
 *
 * This module defines the axis-aligned aquarium the boids live in and the
 * two ways of keeping them inside it:
 * 1. Reflection: veto a move that would leave the box and mirror the heading
 * 2. Repulsion: every wall pushes boids away with an inverse-square force
 *
 * The six walls are plain data (a face plus the plane offset along its axis),
 * so both policies loop over the same descriptors.
 */

use nannou::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// Squared wall distance never drops below this, so a boid sitting on a plane gets a large but finite push
pub const MIN_WALL_DISTANCE_SQ: f32 = 1.0e-6;

// How the aquarium keeps boids inside
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainmentPolicy {
    Reflect,
    Repel,
    ReflectAndRepel,
}

impl ContainmentPolicy {
    pub fn reflects(self) -> bool {
        matches!(self, ContainmentPolicy::Reflect | ContainmentPolicy::ReflectAndRepel)
    }

    pub fn repels(self) -> bool {
        matches!(self, ContainmentPolicy::Repel | ContainmentPolicy::ReflectAndRepel)
    }

    pub fn label(self) -> &'static str {
        match self {
            ContainmentPolicy::Reflect => "reflect",
            ContainmentPolicy::Repel => "repel",
            ContainmentPolicy::ReflectAndRepel => "reflect + repel",
        }
    }
}

impl Default for ContainmentPolicy {
    fn default() -> Self {
        ContainmentPolicy::ReflectAndRepel
    }
}

// One face of the box, named from the inside looking out
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Left,   // min x
    Right,  // max x
    Bottom, // min y
    Top,    // max y
    Back,   // min z
    Front,  // max z
}

impl Face {
    // Collision precedence: -x, +x, -y, +y, -z, +z
    pub const ALL: [Face; 6] = [
        Face::Left,
        Face::Right,
        Face::Bottom,
        Face::Top,
        Face::Back,
        Face::Front,
    ];

    pub fn axis(self) -> usize {
        match self {
            Face::Left | Face::Right => 0,
            Face::Bottom | Face::Top => 1,
            Face::Back | Face::Front => 2,
        }
    }

    pub fn inward_normal(self) -> Vec3 {
        match self {
            Face::Left => vec3(1.0, 0.0, 0.0),
            Face::Right => vec3(-1.0, 0.0, 0.0),
            Face::Bottom => vec3(0.0, 1.0, 0.0),
            Face::Top => vec3(0.0, -1.0, 0.0),
            Face::Back => vec3(0.0, 0.0, 1.0),
            Face::Front => vec3(0.0, 0.0, -1.0),
        }
    }
}

// A wall plane: the face and where it sits along the face's axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    pub face: Face,
    pub offset: f32,
}

impl Wall {
    #[inline]
    pub fn distance_squared(&self, position: Vec3) -> f32 {
        let d = axis_value(position, self.face.axis()) - self.offset;
        d * d
    }

    // Inverse-square push along the inward normal
    #[inline]
    pub fn repulsion(&self, position: Vec3, weight: f32) -> Vec3 {
        let distance_sq = self.distance_squared(position).max(MIN_WALL_DISTANCE_SQ);
        self.face.inward_normal() / distance_sq * weight
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Result<Self, ConfigError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::NonFiniteBounds);
        }

        for axis in 0..3 {
            let (lo, hi) = (axis_value(min, axis), axis_value(max, axis));
            if lo >= hi {
                return Err(ConfigError::DegenerateBounds { axis, min: lo, max: hi });
            }
        }

        Ok(Self { min, max })
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    // Nearest point inside the box
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    pub fn walls(&self) -> [Wall; 6] {
        Face::ALL.map(|face| Wall {
            face,
            offset: self.face_offset(face),
        })
    }

    pub fn face_offset(&self, face: Face) -> f32 {
        match face {
            Face::Left => self.min.x,
            Face::Right => self.max.x,
            Face::Bottom => self.min.y,
            Face::Top => self.max.y,
            Face::Back => self.min.z,
            Face::Front => self.max.z,
        }
    }

    // First violated face in precedence order, if the point is outside the box
    pub fn check_collision(&self, point: Vec3) -> Option<Face> {
        if point.x < self.min.x {
            Some(Face::Left)
        } else if point.x > self.max.x {
            Some(Face::Right)
        } else if point.y < self.min.y {
            Some(Face::Bottom)
        } else if point.y > self.max.y {
            Some(Face::Top)
        } else if point.z < self.min.z {
            Some(Face::Back)
        } else if point.z > self.max.z {
            Some(Face::Front)
        } else {
            None
        }
    }

    // Sum of the six wall pushes at a position
    pub fn wall_repulsion(&self, position: Vec3, weight: f32) -> Vec3 {
        self.walls()
            .iter()
            .fold(Vec3::ZERO, |total, wall| total + wall.repulsion(position, weight))
    }

    // Eight corners, bit 0 = x, bit 1 = y, bit 2 = z
    pub fn corners(&self) -> [Vec3; 8] {
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            *corner = vec3(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
        }
        corners
    }
}

// Outcome of the reflective check for one proposed move
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Containment {
    Commit(Vec3),
    Bounce { face: Face, direction: Vec3 },
}

// Reflect a vector about a plane with the given unit normal
#[inline]
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}

// Either commit position + velocity or bounce the direction off the first violated face
pub fn contain_reflective(bounds: &Bounds, position: Vec3, velocity: Vec3, direction: Vec3) -> Containment {
    let proposed = position + velocity;
    match bounds.check_collision(proposed) {
        Some(face) => Containment::Bounce {
            face,
            direction: reflect(direction, face.inward_normal()),
        },
        None => Containment::Commit(proposed),
    }
}

#[inline]
pub fn axis_value(v: Vec3, axis: usize) -> f32 {
    match axis {
        0 => v.x,
        1 => v.y,
        _ => v.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aquarium() -> Bounds {
        Bounds::new(vec3(-30.0, 0.0, -30.0), vec3(30.0, 30.0, 30.0)).unwrap()
    }

    #[test]
    fn degenerate_bounds_are_rejected() {
        let err = Bounds::new(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 1.0)).unwrap_err();
        assert!(matches!(err, ConfigError::DegenerateBounds { axis: 1, .. }));

        let err = Bounds::new(vec3(5.0, 0.0, 0.0), vec3(1.0, 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, ConfigError::DegenerateBounds { axis: 0, .. }));

        let err = Bounds::new(vec3(f32::NAN, 0.0, 0.0), vec3(1.0, 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, ConfigError::NonFiniteBounds));
    }

    #[test]
    fn collision_precedence_follows_axis_order() {
        let bounds = aquarium();
        assert_eq!(bounds.check_collision(vec3(0.0, 15.0, 0.0)), None);
        assert_eq!(bounds.check_collision(vec3(-31.0, 15.0, 0.0)), Some(Face::Left));
        assert_eq!(bounds.check_collision(vec3(31.0, 15.0, 0.0)), Some(Face::Right));
        assert_eq!(bounds.check_collision(vec3(0.0, -1.0, 0.0)), Some(Face::Bottom));
        assert_eq!(bounds.check_collision(vec3(0.0, 31.0, 0.0)), Some(Face::Top));
        assert_eq!(bounds.check_collision(vec3(0.0, 15.0, -31.0)), Some(Face::Back));
        assert_eq!(bounds.check_collision(vec3(0.0, 15.0, 31.0)), Some(Face::Front));

        // Outside on x, y and z at once: only x counts
        assert_eq!(bounds.check_collision(vec3(31.0, -5.0, 40.0)), Some(Face::Right));
        // Outside on y and z: y wins
        assert_eq!(bounds.check_collision(vec3(0.0, 40.0, -40.0)), Some(Face::Top));
    }

    #[test]
    fn points_on_the_boundary_are_inside() {
        let bounds = aquarium();
        assert_eq!(bounds.check_collision(vec3(30.0, 30.0, -30.0)), None);
        assert!(bounds.contains(vec3(-30.0, 0.0, 30.0)));
    }

    #[test]
    fn clamp_pulls_outside_points_onto_the_box() {
        let bounds = aquarium();
        assert_eq!(bounds.clamp(vec3(-370.0, 15.0, 0.0)), vec3(-30.0, 15.0, 0.0));
        assert_eq!(bounds.clamp(vec3(40.0, -2.0, 31.0)), vec3(30.0, 0.0, 30.0));
        assert_eq!(bounds.clamp(vec3(1.0, 2.0, 3.0)), vec3(1.0, 2.0, 3.0));
    }

    #[test]
    fn reflection_mirrors_and_preserves_length() {
        let direction = vec3(0.6, 0.0, 0.8);
        for face in Face::ALL {
            let reflected = reflect(direction, face.inward_normal());
            assert!((reflected.length() - direction.length()).abs() < 1e-6);

            let axis = face.axis();
            for other in 0..3 {
                let before = axis_value(direction, other);
                let after = axis_value(reflected, other);
                if other == axis {
                    assert!((after + before).abs() < 1e-6);
                } else {
                    assert_eq!(after, before);
                }
            }
        }
    }

    #[test]
    fn reflective_containment_flips_x_near_right_wall() {
        let bounds = aquarium();
        let position = vec3(29.9, 1.0, 1.0);
        let velocity = vec3(1.0, 0.0, 0.0);

        match contain_reflective(&bounds, position, velocity, velocity) {
            Containment::Bounce { face, direction } => {
                assert_eq!(face, Face::Right);
                assert_eq!(direction, vec3(-1.0, 0.0, 0.0));
            }
            other => panic!("expected a bounce, got {:?}", other),
        }

        let inside = contain_reflective(&bounds, vec3(0.0, 1.0, 1.0), velocity, velocity);
        assert_eq!(inside, Containment::Commit(vec3(1.0, 1.0, 1.0)));
    }

    #[test]
    fn repulsion_near_right_wall_is_dominated_by_x() {
        let bounds = aquarium();
        let force = bounds.wall_repulsion(vec3(29.9, 1.0, 1.0), 0.1);

        assert!(force.x < 0.0);
        assert!(force.x.abs() > 10.0 * force.y.abs());
        assert!(force.x.abs() > 10.0 * force.z.abs());
    }

    #[test]
    fn repulsion_is_finite_on_a_wall() {
        let bounds = aquarium();
        let force = bounds.wall_repulsion(vec3(30.0, 15.0, 0.0), 0.1);
        assert!(force.is_finite());
        assert!(force.x < 0.0);
    }

    #[test]
    fn repulsion_cancels_at_the_center_of_a_cube() {
        let bounds = Bounds::new(Vec3::splat(-10.0), Vec3::splat(10.0)).unwrap();
        let force = bounds.wall_repulsion(Vec3::ZERO, 1.0);
        assert!(force.length() < 1e-6);
    }

    #[test]
    fn policy_flags() {
        assert!(ContainmentPolicy::Reflect.reflects());
        assert!(!ContainmentPolicy::Reflect.repels());
        assert!(ContainmentPolicy::Repel.repels());
        assert!(!ContainmentPolicy::Repel.reflects());
        assert!(ContainmentPolicy::ReflectAndRepel.reflects());
        assert!(ContainmentPolicy::ReflectAndRepel.repels());
    }
}
