/*
 * Aquarium Boids
 *
 * This application simulates a flock of boids inside a 3D aquarium. Each boid
 * steers by three rules applied to the neighbors within its visual range:
 * 1. Cohesion: steer towards the average position of neighbors
 * 2. Separation: steer away from each neighbor
 * 3. Alignment: steer towards the average velocity of neighbors
 *
 * The walls repel boids and bounce them back when they would leave the box.
 * A uniform spatial grid prunes the neighbor search, and an egui overlay
 * tunes the parameters live.
 *
 * Usage: aquarium-boids [config.json]   (or set BOIDS_CONFIG)
 */

use std::env;
use std::process;

use aquarium_boids::app;
use aquarium_boids::config::WorldConfig;

const CONFIG_ENV: &str = "BOIDS_CONFIG";

fn load_config() -> WorldConfig {
    let path = env::args().nth(1).or_else(|| env::var(CONFIG_ENV).ok());

    let config = match path {
        Some(path) => match WorldConfig::load(&path) {
            Ok(config) => {
                log::info!("loaded config from {}", path);
                config
            }
            Err(err) => {
                log::error!("failed to load config {}: {}", path, err);
                process::exit(1);
            }
        },
        None => WorldConfig::default(),
    };

    // Fail fast: nothing below runs with an invalid configuration
    match config.validate() {
        Ok(bounds) => {
            log::info!(
                "{} boids in ({:?})..({:?}), grid {:?}, containment {}",
                config.params.num_boids,
                bounds.min,
                bounds.max,
                config.grid_cells_count,
                config.containment.label()
            );
        }
        Err(err) => {
            log::error!("invalid configuration: {}", err);
            process::exit(1);
        }
    }

    config
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    app::install_config(load_config());

    nannou::app(app::model).update(app::update).run();
}
