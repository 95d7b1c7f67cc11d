// Flock-level properties of the simulation core, checked on seeded random flocks.

use nannou::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use aquarium_boids::steering::{grid_candidates, neighbor_reach, observed_neighbors, steer_all_pairs};
use aquarium_boids::{Boid, Bounds, ContainmentPolicy, Simulation, SimulationParams, SpatialGrid, WorldConfig};

fn aquarium() -> Bounds {
    Bounds::new(vec3(-30.0, 0.0, -30.0), vec3(30.0, 30.0, 30.0)).unwrap()
}

fn random_flock(n: usize, seed: u64, bounds: &Bounds) -> Vec<Boid> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| Boid::random(&mut rng, bounds)).collect()
}

// A flock squeezed into a small corner so neighborhoods are dense
fn clustered_flock(n: usize, seed: u64) -> Vec<Boid> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let position = vec3(
                rng.gen_range(-30.0..-20.0),
                rng.gen_range(0.0..10.0),
                rng.gen_range(20.0..30.0),
            );
            Boid::new(position, vec3(rng.gen_range(-1.0..1.0), 1.0, 0.0))
        })
        .collect()
}

fn simulation_with(boids: Vec<Boid>, containment: ContainmentPolicy) -> Simulation {
    let mut config = WorldConfig {
        seed: Some(0),
        containment,
        ..WorldConfig::default()
    };
    config.params.num_boids = 0;

    let mut sim = Simulation::new(&config).unwrap();
    sim.set_boids(boids);
    sim
}

#[test]
fn grid_neighbors_match_all_pairs_across_resolutions() {
    let bounds = aquarium();
    let resolutions = [[1, 1, 1], [2, 2, 2], [3, 3, 3], [4, 4, 4], [5, 5, 5], [5, 2, 3], [1, 5, 1]];

    for (seed, &n) in [2usize, 10, 50, 200].iter().enumerate() {
        let mut flocks = vec![random_flock(n, seed as u64, &bounds)];
        flocks.push(clustered_flock(n, seed as u64 + 100));

        for boids in &flocks {
            for dims in resolutions {
                let mut grid = SpatialGrid::new(bounds, dims, n).unwrap();
                grid.rebuild(boids).unwrap();

                for visual_range in [0.5, 1.0, 5.0, 15.0, 40.0] {
                    let reach = neighbor_reach(grid.cell_size(), visual_range);

                    for i in 0..boids.len() {
                        let naive = observed_neighbors(i, boids, 0..boids.len(), visual_range);

                        let mut candidates = Vec::new();
                        grid_candidates(&grid, grid.cell_coord(boids[i].position), reach, &mut candidates);
                        let fast = observed_neighbors(i, boids, candidates, visual_range);

                        assert_eq!(naive, fast, "n={} dims={:?} range={} boid={}", n, dims, visual_range, i);
                    }
                }
            }
        }
    }
}

#[test]
fn observation_is_symmetric_on_random_flocks() {
    let bounds = aquarium();
    let boids = random_flock(120, 11, &bounds);
    let mut grid = SpatialGrid::new(bounds, [3, 3, 3], boids.len()).unwrap();
    grid.rebuild(&boids).unwrap();

    let visual_range = 8.0;
    let reach = neighbor_reach(grid.cell_size(), visual_range);
    let grid_observed = |i: usize| {
        let mut candidates = Vec::new();
        grid_candidates(&grid, grid.cell_coord(boids[i].position), reach, &mut candidates);
        observed_neighbors(i, &boids, candidates, visual_range)
    };

    for i in 0..boids.len() {
        for j in observed_neighbors(i, &boids, 0..boids.len(), visual_range) {
            assert!(observed_neighbors(j, &boids, 0..boids.len(), visual_range).contains(&i));
        }
        for j in grid_observed(i) {
            assert!(grid_observed(j).contains(&i));
        }
    }
}

#[test]
fn isolated_boids_never_steer() {
    let boids: Vec<Boid> = (0..5)
        .map(|i| Boid::new(vec3(-25.0 + 12.0 * i as f32, 15.0, 0.0), Vec3::X))
        .collect();
    let mut params = SimulationParams::default();
    params.visual_range = 10.0;
    let weights = aquarium_boids::steering::SteeringWeights::from_params(&params);

    for i in 0..boids.len() {
        assert_eq!(steer_all_pairs(i, &boids, &weights), Vec3::ZERO);
    }
}

#[test]
fn containment_holds_over_many_ticks() {
    let bounds = aquarium();
    let mut params = SimulationParams::default();
    params.model_speed = 0.8;
    params.visual_range = 6.0;
    params.cohesion_weight = 0.2;
    params.separation_weight = 0.2;
    params.alignment_weight = 0.2;

    for policy in [ContainmentPolicy::Reflect, ContainmentPolicy::Repel, ContainmentPolicy::ReflectAndRepel] {
        let mut sim = simulation_with(random_flock(150, 3, &bounds), policy);

        for tick in 0..300 {
            params.enable_parallel = tick % 2 == 0;
            params.enable_spatial_grid = tick % 3 != 0;
            sim.tick(&params);

            for boid in sim.boids() {
                assert!(bounds.contains(boid.position), "{:?} escaped at tick {}", boid.position, tick);
                assert!((boid.direction.length() - 1.0).abs() < 1e-4);
            }
        }
    }
}

#[test]
fn repel_alone_holds_a_flock_pressed_against_the_walls() {
    let bounds = aquarium();
    let params = SimulationParams::default();

    // Every boid starts a hair inside a wall, heading straight at it
    let mut boids = Vec::new();
    for wall in bounds.walls() {
        let inward = wall.face.inward_normal();
        let position = bounds.clamp(bounds.center() - inward * 1000.0) + inward * 0.005;
        boids.push(Boid::new(position, -inward));
    }
    let mut sim = simulation_with(boids, ContainmentPolicy::Repel);

    for tick in 0..2000 {
        let stats = sim.tick(&params);
        assert_eq!(stats.discarded, 0);
        for boid in sim.boids() {
            assert!(bounds.contains(boid.position), "{:?} escaped at tick {}", boid.position, tick);
        }
    }
}

#[test]
fn tick_from_the_same_state_is_bit_identical() {
    let bounds = aquarium();
    let boids = random_flock(250, 21, &bounds);
    let mut params = SimulationParams::default();
    params.visual_range = 7.0;
    params.cohesion_weight = 0.05;
    params.separation_weight = 0.05;
    params.alignment_weight = 0.05;

    for (grid, parallel) in [(false, false), (true, false), (false, true), (true, true)] {
        params.enable_spatial_grid = grid;
        params.enable_parallel = parallel;

        let mut a = simulation_with(boids.clone(), ContainmentPolicy::ReflectAndRepel);
        let mut b = simulation_with(boids.clone(), ContainmentPolicy::ReflectAndRepel);
        a.tick(&params);
        b.tick(&params);

        assert_eq!(a.boids(), b.boids());
    }
}

#[test]
fn tick_order_is_not_observable() {
    let bounds = aquarium();
    let boids = random_flock(60, 5, &bounds);
    let mut params = SimulationParams::default();
    params.visual_range = 10.0;
    params.cohesion_weight = 0.1;
    params.enable_parallel = false;
    params.enable_spatial_grid = false;

    let mut forward = simulation_with(boids.clone(), ContainmentPolicy::ReflectAndRepel);
    forward.tick(&params);

    // Same flock stored in reverse: every boid must land in the same place
    let mut reversed: Vec<Boid> = boids;
    reversed.reverse();
    let mut backward = simulation_with(reversed, ContainmentPolicy::ReflectAndRepel);
    backward.tick(&params);

    for (a, b) in forward.boids().iter().zip(backward.boids().iter().rev()) {
        assert!((a.position - b.position).length() < 1e-5);
        assert!((a.direction - b.direction).length() < 1e-5);
    }
}

#[test]
fn repel_only_turns_a_boid_away_from_the_right_wall() {
    let mut params = SimulationParams::default();
    params.model_speed = 1.0;

    let start = Boid::new(vec3(29.9, 1.0, 1.0), vec3(1.0, 0.0, 0.0));
    let mut sim = simulation_with(vec![start], ContainmentPolicy::Repel);
    sim.tick(&params);

    let boid = &sim.boids()[0];
    assert!(boid.direction.x < 0.0);
    assert!(boid.direction.x.abs() > 10.0 * boid.direction.y.abs());
    assert!(boid.position.x < 29.9);
}

#[test]
fn coincident_flock_stays_finite() {
    let boids: Vec<Boid> = (0..10)
        .map(|i| Boid::new(vec3(0.0, 15.0, 0.0), vec3(i as f32, 1.0, 0.0)))
        .collect();
    let mut params = SimulationParams::default();
    params.visual_range = 5.0;
    params.separation_weight = 1.0;

    let mut sim = simulation_with(boids, ContainmentPolicy::ReflectAndRepel);
    for _ in 0..20 {
        let stats = sim.tick(&params);
        assert_eq!(stats.discarded, 0);
    }

    for boid in sim.boids() {
        assert!(boid.position.is_finite());
        assert!(boid.direction.is_finite());
    }
}
