/*
 * Agent Store Module
 *
 * Holds the authoritative boid array plus a read buffer that freezes the
 * previous tick's state. During a tick every boid reads only the read buffer
 * and writes only its own slot in the live array, so no boid can observe a
 * neighbour that has already moved this tick.
 */

use crate::boid::Boid;

#[derive(Clone, Debug, Default)]
pub struct AgentStore {
    boids: Vec<Boid>,
    read_buffer: Vec<Boid>,
}

impl AgentStore {
    pub fn new(boids: Vec<Boid>) -> Self {
        let read_buffer = Vec::with_capacity(boids.len());
        Self { boids, read_buffer }
    }

    pub fn count(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Boid> {
        self.boids.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Boid> {
        self.boids.get_mut(index)
    }

    pub fn as_slice(&self) -> &[Boid] {
        &self.boids
    }

    // Replace the whole flock (respawn)
    pub fn replace(&mut self, boids: Vec<Boid>) {
        self.boids = boids;
        self.read_buffer.clear();
    }

    // Copy the live state into the read buffer and return it
    pub fn snapshot(&mut self) -> &[Boid] {
        self.read_buffer.clone_from(&self.boids);
        &self.read_buffer
    }

    // The buffer captured by the last snapshot
    pub fn read_buffer(&self) -> &[Boid] {
        &self.read_buffer
    }

    // Live array for writing, frozen buffer for reading
    pub fn split_for_tick(&mut self) -> (&mut [Boid], &[Boid]) {
        (&mut self.boids, &self.read_buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nannou::prelude::*;

    fn flock() -> Vec<Boid> {
        (0..4)
            .map(|i| Boid::new(vec3(i as f32, 0.0, 0.0), Vec3::X))
            .collect()
    }

    #[test]
    fn snapshot_is_isolated_from_later_writes() {
        let mut store = AgentStore::new(flock());
        assert_eq!(store.count(), 4);

        store.snapshot();
        store.get_mut(0).unwrap().position = vec3(100.0, 0.0, 0.0);

        assert_eq!(store.read_buffer()[0].position, vec3(0.0, 0.0, 0.0));
        assert_eq!(store.get(0).unwrap().position, vec3(100.0, 0.0, 0.0));
    }

    #[test]
    fn split_gives_live_and_frozen_views() {
        let mut store = AgentStore::new(flock());
        store.snapshot();

        let (live, frozen) = store.split_for_tick();
        live[1].position = Vec3::splat(9.0);
        assert_eq!(frozen[1].position, vec3(1.0, 0.0, 0.0));
    }

    #[test]
    fn replace_resets_the_read_buffer() {
        let mut store = AgentStore::new(flock());
        store.snapshot();
        store.replace(vec![Boid::new(Vec3::ZERO, Vec3::Y)]);

        assert_eq!(store.count(), 1);
        assert!(store.read_buffer().is_empty());
        assert!(store.get(1).is_none());
    }
}
