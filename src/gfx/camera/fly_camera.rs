//! First-person fly camera confined to an axis-aligned box

use cgmath::{perspective, Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3};

use super::camera_utils::{Camera, OPENGL_TO_WGPU_MATRIX};

/// Axis-aligned region the camera may not leave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBounds {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl CameraBounds {
    pub fn contains(&self, p: Vector3<f32>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

/// Start pose and tuning of the fly camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub start_position: Vector3<f32>,
    /// Degrees; -90 looks down -z
    pub start_yaw: f32,
    pub start_pitch: f32,
    /// Units per second
    pub speed: f32,
    /// Degrees per mouse count
    pub sensitivity: f32,
    /// Vertical field of view in degrees
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub pitch_limit: f32,
    pub znear: f32,
    pub zfar: f32,
    pub bounds: CameraBounds,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            start_position: Vector3::new(0.0, 2.0, 10.0),
            start_yaw: -90.0,
            start_pitch: 0.0,
            speed: 5.0,
            sensitivity: 0.1,
            zoom: 45.0,
            min_zoom: 1.0,
            max_zoom: 45.0,
            pitch_limit: 89.0,
            znear: 0.1,
            zfar: 100.0,
            bounds: CameraBounds {
                min: Vector3::new(-50.0, -10.0, -50.0),
                max: Vector3::new(50.0, 50.0, 50.0),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Vector3<f32>,
    yaw: f32,
    pitch: f32,
    front: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
    zoom: f32,
    aspect: f32,
    settings: CameraSettings,
}

impl FlyCamera {
    pub fn new(settings: CameraSettings, aspect: f32) -> Self {
        let mut camera = Self {
            position: settings.start_position,
            yaw: settings.start_yaw,
            pitch: settings.start_pitch.clamp(-settings.pitch_limit, settings.pitch_limit),
            front: -Vector3::unit_z(),
            right: Vector3::unit_x(),
            up: Vector3::unit_y(),
            zoom: settings.zoom,
            aspect,
            settings,
        };
        camera.update_vectors();
        camera
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Moves by `offset` unless the result would leave the bounds
    pub fn try_move(&mut self, offset: Vector3<f32>) -> bool {
        let target = self.position + offset;
        if self.settings.bounds.contains(target) {
            self.position = target;
            true
        } else {
            false
        }
    }

    /// Turns the camera by mouse deltas; `dy` is positive for upward motion
    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.settings.sensitivity;
        self.pitch += dy * self.settings.sensitivity;
        let limit = self.settings.pitch_limit;
        self.pitch = self.pitch.clamp(-limit, limit);
        self.update_vectors();
    }

    /// Narrows the field of view for positive scroll
    pub fn process_scroll(&mut self, amount: f32) {
        self.zoom = (self.zoom - amount).clamp(self.settings.min_zoom, self.settings.max_zoom);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    fn update_vectors(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();
        self.front = Vector3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize();
        self.right = self.front.cross(Vector3::unit_y()).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.position);
        Matrix4::look_to_rh(eye, self.front, self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX
            * perspective(Deg(self.zoom), self.aspect, self.settings.znear, self.settings.zfar)
    }
}

impl Camera for FlyCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn eye(&self) -> Vector3<f32> {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn camera() -> FlyCamera {
        FlyCamera::new(CameraSettings::default(), 800.0 / 600.0)
    }

    #[test]
    fn test_start_pose_looks_down_negative_z() {
        let cam = camera();
        assert_eq!(cam.position, Vector3::new(0.0, 2.0, 10.0));
        assert!((cam.front() - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-6);
        assert!((cam.right() - Vector3::new(1.0, 0.0, 0.0)).magnitude() < 1e-6);
        assert!((cam.up() - Vector3::unit_y()).magnitude() < 1e-6);
    }

    #[test]
    fn test_pitch_stays_clamped() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut cam = camera();
        for _ in 0..2000 {
            let dx = rng.random_range(-5000.0f32..5000.0);
            let dy = rng.random_range(-5000.0f32..5000.0);
            cam.process_mouse(dx, dy);
            assert!(cam.pitch() >= -89.0 && cam.pitch() <= 89.0);
            assert!((cam.front().magnitude() - 1.0).abs() < 1e-4);
            assert!(cam.right().y.abs() < 1e-5);
        }
    }

    #[test]
    fn test_basis_follows_yaw() {
        let mut cam = camera();
        // 900 counts at 0.1 deg each = +90 deg, from -90 to 0 => looking down +x
        cam.process_mouse(900.0, 0.0);
        assert!((cam.yaw() - 0.0).abs() < 1e-3);
        assert!((cam.front() - Vector3::unit_x()).magnitude() < 1e-4);
    }

    #[test]
    fn test_moves_outside_bounds_are_rejected() {
        let mut cam = camera();
        assert!(cam.try_move(Vector3::new(0.0, 0.0, -20.0)));
        assert!(!cam.try_move(Vector3::new(0.0, 0.0, -100.0)));
        assert_eq!(cam.position, Vector3::new(0.0, 2.0, -10.0));

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let offset = Vector3::new(
                rng.random_range(-30.0f32..30.0),
                rng.random_range(-30.0f32..30.0),
                rng.random_range(-30.0f32..30.0),
            );
            cam.try_move(offset);
            assert!(cam.settings().bounds.contains(cam.position));
        }
    }

    #[test]
    fn test_zoom_clamped() {
        let mut cam = camera();
        cam.process_scroll(100.0);
        assert_eq!(cam.zoom(), 1.0);
        cam.process_scroll(-100.0);
        assert_eq!(cam.zoom(), 45.0);
        cam.process_scroll(5.0);
        assert_eq!(cam.zoom(), 40.0);
    }

    #[test]
    fn test_projection_depth_range() {
        let cam = camera();
        let proj = cam.projection_matrix();
        let near = proj * cgmath::Vector4::new(0.0, 0.0, -0.1, 1.0);
        let far = proj * cgmath::Vector4::new(0.0, 0.0, -100.0, 1.0);
        assert!((near.z / near.w).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }
}
