use cgmath::Vector3;
use winit::keyboard::KeyCode;

use super::fly_camera::{CameraSettings, FlyCamera};
use crate::input::InputState;

/// Maps held keys, mouse motion and scroll onto the fly camera
pub struct CameraController {
    pub move_speed: f32,
}

impl CameraController {
    pub fn new(move_speed: f32) -> Self {
        Self { move_speed }
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self::new(settings.speed)
    }

    /// Applies one frame of input. Each key moves independently and each
    /// move is rejected on its own if it would leave the camera bounds.
    pub fn update(&self, camera: &mut FlyCamera, input: &InputState, dt: f32) {
        let step = self.move_speed * dt.max(0.0);
        let front = camera.front();
        let right = camera.right();

        let moves = [
            (KeyCode::KeyW, front),
            (KeyCode::KeyS, -front),
            (KeyCode::KeyA, -right),
            (KeyCode::KeyD, right),
            (KeyCode::Space, Vector3::unit_y()),
            (KeyCode::ShiftLeft, -Vector3::unit_y()),
        ];
        for (key, direction) in moves {
            if input.is_held(key) {
                camera.try_move(direction * step);
            }
        }
    }

    /// Applies drained mouse motion (device y grows downward) and scroll
    pub fn apply_pointer(&self, camera: &mut FlyCamera, mouse_delta: (f32, f32), scroll: f32) {
        if mouse_delta != (0.0, 0.0) {
            camera.process_mouse(mouse_delta.0, -mouse_delta.1);
        }
        if scroll != 0.0 {
            camera.process_scroll(scroll);
        }
    }
}
