use cgmath::Matrix4;

use super::{
    drawable::{build_catalog, DrawableConfig, DrawableId, SceneDrawables},
    layout::{build_layout, Placement},
    robot::{Robot, RobotInput, RobotPartKind, RobotSettings},
};
use crate::{
    gfx::{
        camera::{camera_utils::CameraManager, CameraController, CameraSettings, FlyCamera},
        rendering::instanced_renderer::InstanceData,
    },
    input::InputState,
};

/// Instances to draw this frame, grouped by drawable
///
/// Both the shadow pass and the color pass walk the same list.
#[derive(Debug, Default)]
pub struct FrameDraws {
    instances: Vec<Vec<InstanceData>>,
}

impl FrameDraws {
    pub fn new(drawable_count: usize) -> Self {
        Self {
            instances: vec![Vec::new(); drawable_count],
        }
    }

    /// Empties every list, keeping allocations
    pub fn clear(&mut self) {
        for list in &mut self.instances {
            list.clear();
        }
    }

    pub fn push(&mut self, drawable: DrawableId, model: Matrix4<f32>, color: [f32; 4]) {
        if drawable.0 >= self.instances.len() {
            self.instances.resize_with(drawable.0 + 1, Vec::new);
        }
        self.instances[drawable.0].push(InstanceData::from_transform(model, color));
    }

    pub fn instances(&self, drawable: DrawableId) -> &[InstanceData] {
        self.instances
            .get(drawable.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Drawables with at least one instance
    pub fn iter(&self) -> impl Iterator<Item = (DrawableId, &[InstanceData])> + '_ {
        self.instances
            .iter()
            .enumerate()
            .filter(|(_, list)| !list.is_empty())
            .map(|(index, list)| (DrawableId(index), list.as_slice()))
    }

    pub fn total_instances(&self) -> usize {
        self.instances.iter().map(Vec::len).sum()
    }
}

/// Owns every drawable description, the static layout, the camera and the robot
pub struct Scene {
    pub camera_manager: CameraManager,
    pub robot: Robot,
    drawables: Vec<DrawableConfig>,
    ids: SceneDrawables,
    placements: Vec<Placement>,
    frame: FrameDraws,
}

impl Scene {
    pub fn new(camera: CameraSettings, robot: RobotSettings, aspect: f32) -> Self {
        let (drawables, ids) = build_catalog();
        let placements = build_layout(&ids);
        log::info!(
            "Scene built: {} drawables, {} placements",
            drawables.len(),
            placements.len()
        );

        let controller = CameraController::from_settings(&camera);
        Self {
            camera_manager: CameraManager::new(FlyCamera::new(camera, aspect), controller),
            robot: Robot::new(robot),
            frame: FrameDraws::new(drawables.len()),
            drawables,
            ids,
            placements,
        }
    }

    /// Advances camera and robot by one frame of input
    pub fn update(&mut self, input: &mut InputState, dt: f32) {
        self.camera_manager.update(input, dt);
        self.robot.update(RobotInput::from_input(input), dt);
    }

    /// Rebuilds this frame's instance lists from the layout and the robot pose
    pub fn frame_draws(&mut self) -> &FrameDraws {
        let eye = self.camera_manager.camera.position;
        self.frame.clear();

        for placement in &self.placements {
            self.frame.push(
                placement.drawable,
                placement.model_matrix(eye),
                placement.color,
            );
        }

        let robot = self.ids.robot;
        for part in self.robot.parts() {
            let drawable = match part.kind {
                RobotPartKind::HeadFace(face) => robot.head_face(face),
                RobotPartKind::HeadOverlay => robot.overlay,
                RobotPartKind::Body => robot.body,
            };
            self.frame.push(drawable, part.model, part.color);
        }

        log::trace!("Frame draws: {} instances", self.frame.total_instances());
        &self.frame
    }

    pub fn drawables(&self) -> &[DrawableConfig] {
        &self.drawables
    }

    pub fn ids(&self) -> &SceneDrawables {
        &self.ids
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera_manager.camera.resize_projection(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::{event::ElementState, keyboard::KeyCode};

    fn scene() -> Scene {
        Scene::new(CameraSettings::default(), RobotSettings::default(), 800.0 / 600.0)
    }

    #[test]
    fn test_frame_draws_cover_layout_and_robot() {
        let mut scene = scene();
        let placements = scene.placements().len();
        let ids = *scene.ids();
        let draws = scene.frame_draws();
        assert_eq!(draws.total_instances(), placements + 16);
        assert_eq!(draws.instances(ids.robot.body).len(), 9);
        assert_eq!(draws.instances(ids.robot.overlay).len(), 1);
        for id in ids.robot.head {
            assert_eq!(draws.instances(id).len(), 1);
        }
    }

    #[test]
    fn test_frame_draws_rebuild_without_growing() {
        let mut scene = scene();
        let first = scene.frame_draws().total_instances();
        let second = scene.frame_draws().total_instances();
        assert_eq!(first, second);
    }

    #[test]
    fn test_flowers_follow_the_camera() {
        let mut scene = scene();
        let flower = scene.ids().flowers[0];
        let before = scene.frame_draws().instances(flower)[0].transform;
        scene.camera_manager.camera.position.x += 6.0;
        let after = scene.frame_draws().instances(flower)[0].transform;
        assert_ne!(before, after);
        // Translation column is unchanged
        assert_eq!(before[3], after[3]);
    }

    #[test]
    fn test_update_moves_camera_and_robot() {
        let mut scene = scene();
        let mut input = InputState::new();
        input.process_key(KeyCode::KeyW, ElementState::Pressed);
        input.process_key(KeyCode::ArrowUp, ElementState::Pressed);
        let camera_start = scene.camera_manager.camera.position;
        let robot_start = scene.robot.position;

        for _ in 0..10 {
            scene.update(&mut input, 0.016);
        }

        assert!(scene.camera_manager.camera.position != camera_start);
        assert!(scene.robot.position != robot_start);
        assert!(scene.robot.position.y >= scene.robot.settings().floor());
    }

    #[test]
    fn test_iter_skips_empty_drawables() {
        let mut draws = FrameDraws::new(4);
        draws.push(DrawableId(2), Matrix4::from_scale(1.0), [1.0; 4]);
        let ids: Vec<_> = draws.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![DrawableId(2)]);
        assert!(draws.instances(DrawableId(9)).is_empty());
    }
}
