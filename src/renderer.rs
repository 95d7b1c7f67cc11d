/*
 * Renderer Module
 *
 * This module handles the rendering of the boid simulation.
 * It draws the aquarium wireframe, the optional grid lattice, every boid as
 * a cone and the debug text. Boids are drawn from the instance buffer the app
 * refreshes each frame: the local cone (+Y axis) goes through the instance's
 * model matrix and is then projected with the camera.
 */

use nannou::prelude::*;

use crate::app::Model;
use crate::bounds::Bounds;
use crate::camera::Camera;
use crate::instance::BoidInstance;
use crate::spatial_grid::SpatialGrid;

const CONE_SEGMENTS: usize = 12;
const CONE_HEIGHT: f32 = 2.0;
const SELECTED_COLOR: [f32; 4] = [1.0, 0.85, 0.1, 1.0];

// Local cone: base ring of radius 1 at y = 0, apex on +Y
pub fn cone_vertices() -> ([Vec3; CONE_SEGMENTS], Vec3) {
    let mut ring = [Vec3::ZERO; CONE_SEGMENTS];
    let step = 2.0 * PI / CONE_SEGMENTS as f32;
    for (i, vertex) in ring.iter_mut().enumerate() {
        let angle = i as f32 * step;
        *vertex = vec3(angle.sin(), 0.0, angle.cos());
    }
    (ring, vec3(0.0, CONE_HEIGHT, 0.0))
}

// The twelve edges of a box, as index pairs into Bounds::corners
fn box_edges() -> impl Iterator<Item = (usize, usize)> {
    (0..8usize).flat_map(|a| {
        [1usize, 2, 4]
            .into_iter()
            .filter(move |bit| a & bit == 0)
            .map(move |bit| (a, a | bit))
    })
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let window_rect = app.window_rect();
    let view_projection = model.camera.view_projection(window_rect);
    let bounds = model.simulation.bounds();

    if model.params.show_grid {
        draw_grid(&draw, &model.camera, &view_projection, window_rect, model.simulation.grid());
    }

    draw_bounds(&draw, &model.camera, &view_projection, window_rect, bounds);
    draw_boids(&draw, model, &view_projection, window_rect);

    if model.params.show_debug {
        draw_debug_info(&draw, &model.debug_info.lines(model.instances.len()), window_rect);
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        log::error!("failed to draw frame: {:?}", err);
    }

    if let Err(err) = model.egui.draw_to_frame(&frame) {
        log::error!("failed to draw ui: {:?}", err);
    }
}

fn draw_segment(draw: &Draw, camera: &Camera, vp: &Mat4, window_rect: Rect, a: Vec3, b: Vec3, color: Rgba) {
    if let (Some(start), Some(end)) = (camera.project(vp, a, window_rect), camera.project(vp, b, window_rect)) {
        draw.line().start(start).end(end).weight(1.0).color(color);
    }
}

fn draw_bounds(draw: &Draw, camera: &Camera, vp: &Mat4, window_rect: Rect, bounds: &Bounds) {
    let corners = bounds.corners();
    for (a, b) in box_edges() {
        draw_segment(draw, camera, vp, window_rect, corners[a], corners[b], rgba(0.6, 0.8, 1.0, 0.8));
    }
}

// Cell boundaries: lines parallel to each axis through every lattice point of the other two
fn draw_grid(draw: &Draw, camera: &Camera, vp: &Mat4, window_rect: Rect, grid: &SpatialGrid) {
    let bounds = grid.bounds();
    let size = grid.cell_size();
    let [nx, ny, nz] = grid.dimensions();
    let color = rgba(0.3, 0.3, 0.4, 0.5);

    for j in 0..=ny {
        for k in 0..=nz {
            let (y, z) = (bounds.min.y + j as f32 * size.y, bounds.min.z + k as f32 * size.z);
            draw_segment(draw, camera, vp, window_rect, vec3(bounds.min.x, y, z), vec3(bounds.max.x, y, z), color);
        }
    }
    for i in 0..=nx {
        for k in 0..=nz {
            let (x, z) = (bounds.min.x + i as f32 * size.x, bounds.min.z + k as f32 * size.z);
            draw_segment(draw, camera, vp, window_rect, vec3(x, bounds.min.y, z), vec3(x, bounds.max.y, z), color);
        }
    }
    for i in 0..=nx {
        for j in 0..=ny {
            let (x, y) = (bounds.min.x + i as f32 * size.x, bounds.min.y + j as f32 * size.y);
            draw_segment(draw, camera, vp, window_rect, vec3(x, y, bounds.min.z), vec3(x, y, bounds.max.z), color);
        }
    }
}

fn draw_boids(draw: &Draw, model: &Model, vp: &Mat4, window_rect: Rect) {
    let (ring, apex) = cone_vertices();
    let eye = model.camera.position;

    // Far to near, so nearer cones paint over farther ones
    let mut order: Vec<(usize, f32)> = model
        .instances
        .iter()
        .enumerate()
        .map(|(i, instance)| {
            let [x, y, z, _] = instance.model[3];
            (i, vec3(x, y, z).distance_squared(eye))
        })
        .collect();
    order.sort_unstable_by(|a, b| b.1.total_cmp(&a.1));

    for (i, _) in order {
        let instance = &model.instances[i];
        let color = if model.debug_info.selected_boid_index == Some(i) {
            SELECTED_COLOR
        } else {
            instance.color
        };
        draw_cone(draw, &model.camera, vp, window_rect, instance, &ring, apex, color);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_cone(
    draw: &Draw,
    camera: &Camera,
    vp: &Mat4,
    window_rect: Rect,
    instance: &BoidInstance,
    ring: &[Vec3; CONE_SEGMENTS],
    apex: Vec3,
    color: [f32; 4],
) {
    let transform = Mat4::from_cols_array_2d(&instance.model);
    let project = |local: Vec3| camera.project(vp, transform.transform_point3(local), window_rect);

    let tip = match project(apex) {
        Some(tip) => tip,
        None => return,
    };

    let mut projected = [Vec2::ZERO; CONE_SEGMENTS];
    for (out, vertex) in projected.iter_mut().zip(ring.iter()) {
        *out = match project(*vertex) {
            Some(point) => point,
            None => return,
        };
    }

    let [r, g, b, a] = color;
    let side = rgba(r, g, b, a);
    let base = rgba(r * 0.6, g * 0.6, b * 0.6, a);

    let center = projected.iter().fold(Vec2::ZERO, |sum, p| sum + *p) / CONE_SEGMENTS as f32;
    for i in 0..CONE_SEGMENTS {
        let next = projected[(i + 1) % CONE_SEGMENTS];
        draw.tri().points(projected[i], next, center).color(base);
        draw.tri().points(projected[i], next, tip).color(side);
    }
}

// Draw debug information on the screen
pub fn draw_debug_info(draw: &Draw, lines: &[String], window_rect: Rect) {
    let margin = 20.0;
    let line_height = 20.0;
    let panel_width = 260.0;
    let panel_height = line_height * lines.len() as f32 + margin;

    // Background panel in the bottom-left corner, clear of the egui window
    draw.rect()
        .x_y(window_rect.left() + panel_width / 2.0, window_rect.bottom() + panel_height / 2.0)
        .w_h(panel_width, panel_height)
        .color(rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.left() + margin;
    let text_y = window_rect.bottom() + panel_height - margin;

    for (i, text) in lines.iter().enumerate() {
        draw.text(text)
            .x_y(text_x + panel_width / 2.0 - margin, text_y - i as f32 * line_height)
            .w(panel_width - margin)
            .left_justify()
            .color(WHITE)
            .font_size(14);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_twelve_axis_aligned_edges() {
        let edges: Vec<_> = box_edges().collect();
        assert_eq!(edges.len(), 12);
        for (a, b) in edges {
            assert_eq!((a ^ b).count_ones(), 1);
        }
    }

    #[test]
    fn cone_ring_is_unit_and_apex_is_up() {
        let (ring, apex) = cone_vertices();
        assert_eq!(apex, vec3(0.0, 2.0, 0.0));
        for vertex in ring {
            assert!((vertex.length() - 1.0).abs() < 1e-5);
            assert_eq!(vertex.y, 0.0);
        }
    }
}
