/*
 * Input Module
 *
 * This module handles user input events for the boid simulation.
 * It processes mouse movements, clicks, wheel events and keys for camera control.
 *
 * Features:
 * - Mouse-look while dragging with the left button
 * - Field-of-view zoom with the mouse wheel
 * - W/A/S/D fly movement, polled every frame
 * - Handing events to egui and ignoring clicks on the UI
 */

use nannou::prelude::*;
use nannou::winit::event::{MouseButton, MouseScrollDelta, TouchPhase};

use crate::app::Model;

// Mouse moved event handler
pub fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    model.camera.look(vec2(pos.x, pos.y));
}

// Mouse pressed event handler
pub fn mouse_pressed(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left && !model.egui.ctx().is_pointer_over_area() {
        model.camera.start_drag();
    }
}

// Mouse released event handler
pub fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.camera.end_drag();
    }
}

// Mouse wheel event handler for zooming
pub fn mouse_wheel(_app: &App, model: &mut Model, delta: MouseScrollDelta, _phase: TouchPhase) {
    if model.egui.ctx().is_pointer_over_area() {
        return;
    }

    match delta {
        MouseScrollDelta::LineDelta(_, y) => model.camera.zoom(y),
        MouseScrollDelta::PixelDelta(pos) => model.camera.zoom(pos.y as f32 * 0.1),
    }
}

// Move the camera for every movement key currently held
pub fn handle_keys(app: &App, model: &mut Model) {
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }

    let keys = &app.keys.down;
    if keys.contains(&Key::W) {
        model.camera.move_forward();
    }
    if keys.contains(&Key::S) {
        model.camera.move_back();
    }
    if keys.contains(&Key::A) {
        model.camera.strafe_left();
    }
    if keys.contains(&Key::D) {
        model.camera.strafe_right();
    }
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
