use cgmath::{Matrix4, SquareMatrix};

use super::{camera_controller::CameraController, fly_camera::FlyCamera};
use crate::input::InputState;

/// Remaps OpenGL clip-space depth (-1..1) to wgpu's 0..1
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Owns the scene camera and the controller that drives it
pub struct CameraManager {
    pub camera: FlyCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: FlyCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    /// Applies one frame of held keys and drains mouse motion and scroll
    pub fn update(&mut self, input: &mut InputState, dt: f32) {
        self.controller.update(&mut self.camera, input, dt);
        let mouse_delta = input.take_mouse_delta();
        let scroll = input.take_scroll();
        self.controller
            .apply_pointer(&mut self.camera, mouse_delta, scroll);
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform::from_camera(&self.camera)
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
    fn eye(&self) -> cgmath::Vector3<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &impl Camera) -> Self {
        Self {
            view_position: camera.eye().extend(1.0).into(),
            view_proj: convert_matrix4_to_array(camera.build_view_projection_matrix()),
        }
    }
}

impl Default for CameraUniform {
    /// Creates a default [CameraUniform].
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            result[i][j] = matrix4[i][j];
        }
    }

    result
}
