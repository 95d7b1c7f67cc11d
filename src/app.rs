/*
 * Application Module
 *
 * This module defines the main application model and logic for the boid simulation.
 * It handles the initialization and per-frame update, and wires the window
 * events to the input and renderer modules.
 *
 * Each frame:
 * - The overlay edits the UI's copy of the parameters and publishes it
 * - The simulation loads the published parameters once and runs one tick
 * - The store is mapped into the instance buffer the renderer draws from
 */

use std::sync::OnceLock;

use nannou::prelude::*;
use nannou_egui::Egui;

use crate::camera::Camera;
use crate::config::WorldConfig;
use crate::debug::DebugInfo;
use crate::input;
use crate::instance::{self, BoidInstance};
use crate::params::{SharedParams, SimulationParams};
use crate::renderer;
use crate::simulation::Simulation;
use crate::ui;

// Startup config, installed by main before the event loop starts
static CONFIG: OnceLock<WorldConfig> = OnceLock::new();

pub fn install_config(config: WorldConfig) {
    if CONFIG.set(config).is_err() {
        log::warn!("config already installed, keeping the first one");
    }
}

// Main model for the application
pub struct Model {
    pub simulation: Simulation,
    pub params: SimulationParams,
    pub shared_params: SharedParams,
    pub egui: Egui,
    pub camera: Camera,
    pub debug_info: DebugInfo,
    pub instances: Vec<BoidInstance>,
}

fn fatal(message: &str) -> ! {
    log::error!("{}", message);
    std::process::exit(1);
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let config = CONFIG.get_or_init(WorldConfig::default);

    // 80% of the primary monitor, or a fixed size if there is none
    let (window_width, window_height) = app
        .primary_monitor()
        .map(|monitor| {
            let size = monitor.size();
            (size.width as f32 * 0.8, size.height as f32 * 0.8)
        })
        .unwrap_or((1280.0, 800.0));

    let window_id = match app
        .new_window()
        .title("Aquarium Boids")
        .size(window_width as u32, window_height as u32)
        .view(renderer::view)
        .mouse_moved(input::mouse_moved)
        .mouse_pressed(input::mouse_pressed)
        .mouse_released(input::mouse_released)
        .mouse_wheel(input::mouse_wheel)
        .raw_event(input::raw_window_event)
        .build()
    {
        Ok(id) => id,
        Err(err) => fatal(&format!("failed to create window: {:?}", err)),
    };

    let egui = match app.window(window_id) {
        Some(window) => Egui::from_window(&window),
        None => fatal("window closed before the UI was created"),
    };

    let simulation = match Simulation::new(config) {
        Ok(simulation) => simulation,
        Err(err) => fatal(&format!("invalid configuration: {}", err)),
    };

    let params = config.params.clone();
    let shared_params = SharedParams::new(&params);

    let mut instances = Vec::with_capacity(simulation.boids().len());
    instance::write_instances(simulation.boids(), &mut instances);

    let mut debug_info = DebugInfo::default();
    debug_info.refresh(&simulation);

    let center = simulation.bounds().center();
    let camera = Camera::new(vec3(center.x, center.y, simulation.bounds().max.z + 50.0));

    Model {
        simulation,
        params,
        shared_params,
        egui,
        camera,
        debug_info,
        instances,
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;
    model.egui.set_elapsed_time(update.since_start);

    input::handle_keys(app, model);

    let response = ui::update_ui(
        &mut model.egui,
        &mut model.params,
        model.simulation.containment(),
        &mut model.debug_info,
        model.simulation.boids(),
    );

    if response.params_changed {
        log::debug!("parameters changed: {:?}", model.params);
        model.shared_params.publish(&model.params);
    }

    if let Some(containment) = response.containment {
        log::debug!("containment policy changed to {}", containment.label());
        model.simulation.set_containment(containment);
    }

    // The simulation sees the published values, read once for this tick
    let params = model.shared_params.load();

    if response.respawn || response.num_boids_changed {
        log::info!("respawning {} boids", params.num_boids);
        model.simulation.respawn(params.num_boids, params.model_scale);
        model.debug_info.selected_boid_index = None;
        model.debug_info.refresh(&model.simulation);
    }

    if !params.pause_simulation {
        let stats = model.simulation.tick(&params);
        model.debug_info.record_tick(&stats, &model.simulation);
    }

    instance::write_instances(model.simulation.boids(), &mut model.instances);
}
