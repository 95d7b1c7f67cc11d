/*
 * Camera Module
 *
 * This module defines the Camera struct, a first-person fly camera for
 * looking into the aquarium. It handles mouse-look while dragging, WASD
 * movement and field-of-view zoom, and projects world points to the
 * nannou window (origin at the center, y up).
 */

use nannou::prelude::*;

const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 300.0;
const MIN_FOV: f32 = 1.0;
const MAX_FOV: f32 = 45.0;
const PITCH_LIMIT: f32 = 89.0;

pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub speed: f32,
    pub sensitivity: f32,
    pub is_dragging: bool,
    // None until the first cursor sample of a drag arrives
    last_cursor_pos: Option<Vec2>,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: vec3(0.0, 0.0, -1.0),
            up: Vec3::Y,
            right: Vec3::X,
            yaw: -90.0,
            pitch: 0.0,
            fov: MAX_FOV,
            speed: 0.25,
            sensitivity: 0.1,
            is_dragging: false,
            last_cursor_pos: None,
        };
        camera.update_vectors();
        camera
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = vec3(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(Vec3::Y).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    pub fn move_forward(&mut self) {
        self.position += self.front * self.speed;
    }

    pub fn move_back(&mut self) {
        self.position -= self.front * self.speed;
    }

    pub fn strafe_left(&mut self) {
        self.position -= self.right * self.speed;
    }

    pub fn strafe_right(&mut self) {
        self.position += self.right * self.speed;
    }

    // Wheel zoom: scrolling up narrows the field of view
    pub fn zoom(&mut self, offset: f32) {
        self.fov = (self.fov - offset).clamp(MIN_FOV, MAX_FOV);
    }

    pub fn start_drag(&mut self) {
        self.is_dragging = true;
        self.last_cursor_pos = None;
    }

    pub fn end_drag(&mut self) {
        self.is_dragging = false;
        self.last_cursor_pos = None;
    }

    // Turn by the cursor delta since the last sample (window coordinates, y up)
    pub fn look(&mut self, cursor: Vec2) {
        if !self.is_dragging {
            return;
        }

        let last = match self.last_cursor_pos.replace(cursor) {
            Some(last) => last,
            None => return,
        };

        let offset = (cursor - last) * self.sensitivity;
        self.yaw += offset.x;
        self.pitch = (self.pitch + offset.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
    }

    pub fn view_projection(&self, window_rect: Rect) -> Mat4 {
        let aspect = window_rect.w() / window_rect.h().max(1.0);
        self.projection_matrix(aspect) * self.view_matrix()
    }

    // World point to window coordinates; None when behind the camera
    pub fn project(&self, view_projection: &Mat4, point: Vec3, window_rect: Rect) -> Option<Vec2> {
        let clip = *view_projection * point.extend(1.0);
        if clip.w <= NEAR_PLANE {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        Some(vec2(ndc.x * window_rect.w() * 0.5, ndc.y * window_rect.h() * 0.5) + window_rect.xy())
    }
}
