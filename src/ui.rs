/*
 * UI Module
 *
 * This module contains functions for creating and updating the user interface
 * using nannou_egui. It provides controls for adjusting simulation parameters,
 * frame statistics and an inspector for individual boids.
 * Parameter change detection is handled by the SimulationParams struct.
 */

use nannou_egui::{egui, Egui};

use crate::boid::Boid;
use crate::bounds::ContainmentPolicy;
use crate::debug::DebugInfo;
use crate::params::SimulationParams;

// What the overlay asked the app to do this frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UiResponse {
    pub respawn: bool,
    pub num_boids_changed: bool,
    pub params_changed: bool,
    pub containment: Option<ContainmentPolicy>,
}

const INSPECTOR_ROWS: usize = 64;

// Update the UI; the caller applies the response
pub fn update_ui(
    egui: &mut Egui,
    params: &mut SimulationParams,
    containment: ContainmentPolicy,
    debug_info: &mut DebugInfo,
    boids: &[Boid],
) -> UiResponse {
    let mut response = UiResponse::default();
    let mut policy = containment;

    // Take a snapshot of current parameter values for change detection
    params.take_snapshot();

    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Boid Parameters", |ui| {
                ui.add(egui::Slider::new(&mut params.num_boids, SimulationParams::get_num_boids_range()).text("Number of Boids"));

                if ui.button("Respawn Boids").clicked() {
                    response.respawn = true;
                }

                ui.add(egui::Slider::new(&mut params.model_scale, SimulationParams::get_scale_range()).text("Scale"));
                ui.add(egui::Slider::new(&mut params.model_speed, SimulationParams::get_speed_range()).text("Speed"));
            });

            ui.collapsing("Flocking Behavior", |ui| {
                ui.add(egui::Slider::new(&mut params.cohesion_weight, SimulationParams::get_weight_range()).text("Cohesion"));
                ui.add(egui::Slider::new(&mut params.separation_weight, SimulationParams::get_weight_range()).text("Separation"));
                ui.add(egui::Slider::new(&mut params.alignment_weight, SimulationParams::get_weight_range()).text("Alignment"));
                ui.add(egui::Slider::new(&mut params.visual_range, SimulationParams::get_visual_range_range()).text("Visual Range"));
                ui.add(egui::Slider::new(&mut params.wall_force_weight, SimulationParams::get_wall_force_range()).text("Wall Force"));
            });

            ui.collapsing("Containment", |ui| {
                for option in [
                    ContainmentPolicy::Reflect,
                    ContainmentPolicy::Repel,
                    ContainmentPolicy::ReflectAndRepel,
                ] {
                    ui.radio_value(&mut policy, option, option.label());
                }
            });

            ui.collapsing("Camera Controls", |ui| {
                ui.label("Look: drag with the left mouse button");
                ui.label("Move: W / A / S / D");
                ui.label("Zoom: mouse wheel");
            });

            ui.collapsing("Performance Tuning", |ui| {
                ui.checkbox(&mut params.enable_parallel, "Enable Parallel Processing");
                ui.checkbox(&mut params.enable_spatial_grid, "Enable Spatial Grid");
                ui.checkbox(&mut params.show_grid, "Show Grid");

                ui.separator();

                for line in debug_info.lines(boids.len()) {
                    ui.label(line);
                }
            });

            ui.collapsing("Instances", |ui| {
                inspector(ui, boids, &mut debug_info.selected_boid_index);
            });

            ui.checkbox(&mut params.show_debug, "Show Debug Info");
            ui.checkbox(&mut params.pause_simulation, "Pause Simulation");
        });

    if policy != containment {
        response.containment = Some(policy);
    }

    let (num_boids_changed, params_changed) = params.detect_changes();
    response.num_boids_changed = num_boids_changed;
    response.params_changed = params_changed;
    response
}

// One row per boid, capped; clicking a row highlights that boid
fn inspector(ui: &mut egui::Ui, boids: &[Boid], selected: &mut Option<usize>) {
    if boids.len() > INSPECTOR_ROWS {
        ui.label(format!("Showing the first {} of {} boids", INSPECTOR_ROWS, boids.len()));
    }

    for (i, boid) in boids.iter().take(INSPECTOR_ROWS).enumerate() {
        let is_selected = *selected == Some(i);
        let header = format!("Boid {}", i);
        if ui.selectable_label(is_selected, header).clicked() {
            *selected = if is_selected { None } else { Some(i) };
        }

        if is_selected {
            let (p, d, v, c) = (boid.position, boid.direction, boid.velocity, boid.color);
            ui.label(format!("position:  ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z));
            ui.label(format!("direction: ({:.3}, {:.3}, {:.3})", d.x, d.y, d.z));
            ui.label(format!("velocity:  ({:.3}, {:.3}, {:.3})", v.x, v.y, v.z));
            ui.label(format!("color:     ({:.2}, {:.2}, {:.2}, {:.2})", c[0], c[1], c[2], c[3]));
        }
    }
}
