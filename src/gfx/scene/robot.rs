//! Walking robot built from cubes.
//!
//! The robot falls under gravity until it rests on the ground plane, turns and
//! walks from the arrow keys while grounded, and swings its limbs from a walk
//! phase that only advances while it moves.

use cgmath::{Deg, InnerSpace, Matrix4, Rad, Vector2, Vector3};
use winit::keyboard::KeyCode;

use crate::gfx::geometry::CubeFace;
use crate::input::InputState;

const TORSO_COLOR: [f32; 3] = [14.0 / 255.0, 174.0 / 255.0, 174.0 / 255.0];
const SKIN_COLOR: [f32; 3] = [169.0 / 255.0, 125.0 / 255.0, 100.0 / 255.0];
const LEG_COLOR: [f32; 3] = [73.0 / 255.0, 70.0 / 255.0, 151.0 / 255.0];
/// Space left between an upper and lower limb segment
const JOINT_GAP: f32 = 0.01;

/// Physical and animation tuning of the robot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotSettings {
    pub start_position: Vector3<f32>,
    pub gravity: f32,
    pub ground_height: f32,
    /// Height of the robot origin above the ground
    pub base_offset: f32,
    pub move_speed: f32,
    /// Degrees per second
    pub turn_speed: f32,
    pub scale: f32,
    /// Walk phase advance per second while moving
    pub walk_cycle_rate: f32,
    /// Peak limb angle in radians
    pub swing_amplitude: f32,
    /// Horizontal speed below which the walk phase holds still
    pub walk_threshold: f32,
}

impl Default for RobotSettings {
    fn default() -> Self {
        Self {
            start_position: Vector3::new(2.0, 2.0, 0.0),
            gravity: -9.8,
            ground_height: 0.2,
            base_offset: 0.6,
            move_speed: 3.0,
            turn_speed: 90.0,
            scale: 1.0 / 20.0,
            walk_cycle_rate: 6.0,
            swing_amplitude: 0.5,
            walk_threshold: 0.1,
        }
    }
}

impl RobotSettings {
    /// Lowest height the robot origin can reach
    pub fn floor(&self) -> f32 {
        self.ground_height + self.base_offset
    }
}

/// Walk and turn intent for one frame, each in `[-1, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RobotInput {
    pub forward: f32,
    /// Positive turns left (counter-clockwise seen from above)
    pub turn: f32,
}

impl RobotInput {
    pub fn from_input(input: &InputState) -> Self {
        Self {
            forward: input.axis(KeyCode::ArrowUp, KeyCode::ArrowDown),
            turn: input.axis(KeyCode::ArrowLeft, KeyCode::ArrowRight),
        }
    }
}

/// Which drawable a robot part is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotPartKind {
    HeadFace(CubeFace),
    /// Eyebrow decal over the face side of the head
    HeadOverlay,
    /// Plain coloured unit cube
    Body,
}

/// One posed cube of the robot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotPart {
    pub kind: RobotPartKind,
    pub model: Matrix4<f32>,
    pub color: [f32; 4],
}

/// Side of the head that carries the face
pub const FACE_SIDE: CubeFace = CubeFace::NegZ;

#[derive(Debug, Clone)]
pub struct Robot {
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    /// Degrees; 0 walks toward +z
    pub yaw: f32,
    pub walk_phase: f32,
    grounded: bool,
    settings: RobotSettings,
}

impl Robot {
    pub fn new(settings: RobotSettings) -> Self {
        let mut robot = Self {
            position: settings.start_position,
            velocity: Vector3::new(0.0, 0.0, 0.0),
            yaw: 0.0,
            walk_phase: 0.0,
            grounded: false,
            settings,
        };
        robot.position.y = robot.position.y.max(settings.floor());
        robot.grounded = robot.position.y <= settings.floor();
        robot
    }

    pub fn settings(&self) -> &RobotSettings {
        &self.settings
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Unit vector the robot walks along
    pub fn heading(&self) -> Vector3<f32> {
        let (sin, cos) = self.yaw.to_radians().sin_cos();
        Vector3::new(sin, 0.0, cos)
    }

    /// Advances the robot by `dt` seconds
    pub fn update(&mut self, input: RobotInput, dt: f32) {
        let dt = dt.max(0.0);

        // Steering only takes effect with feet on the ground
        if self.grounded {
            self.yaw += input.turn.clamp(-1.0, 1.0) * self.settings.turn_speed * dt;
            let walk = self.heading() * input.forward.clamp(-1.0, 1.0) * self.settings.move_speed;
            self.velocity.x = walk.x;
            self.velocity.z = walk.z;
        }

        self.velocity.y += self.settings.gravity * dt;
        self.position += self.velocity * dt;

        let floor = self.settings.floor();
        if self.position.y <= floor {
            self.position.y = floor;
            self.velocity.y = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }

        let horizontal = Vector2::new(self.velocity.x, self.velocity.z).magnitude();
        if horizontal > self.settings.walk_threshold {
            self.walk_phase += dt * self.settings.walk_cycle_rate;
        }
    }

    /// Shoulder and hip angle for the current walk phase
    pub fn limb_swing(&self) -> f32 {
        self.walk_phase.sin() * self.settings.swing_amplitude
    }

    /// Root transform: position, facing and scale
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_y(Deg(180.0 + self.yaw))
            * Matrix4::from_scale(self.settings.scale)
    }

    /// Every posed cube of the robot, in model-space units of the root
    pub fn parts(&self) -> Vec<RobotPart> {
        let root = self.model_matrix();
        let swing = self.limb_swing();
        let elbow = -swing;
        let mut parts = Vec::with_capacity(16);

        let head = root * box_transform(Vector3::new(0.0, 5.0, 0.0), Vector3::new(4.0, 4.0, 4.0));
        for face in CubeFace::ALL {
            parts.push(RobotPart {
                kind: RobotPartKind::HeadFace(face),
                model: head,
                color: [1.0; 4],
            });
        }
        parts.push(RobotPart {
            kind: RobotPartKind::HeadOverlay,
            model: head,
            color: [1.0; 4],
        });

        parts.push(body(
            root * box_transform(Vector3::new(0.0, 0.0, 0.0), Vector3::new(4.0, 6.0, 2.0)),
            TORSO_COLOR,
        ));

        let arm = Limb {
            upper: Vector3::new(2.0, 4.0, 2.0),
            lower: Vector3::new(2.0, 3.0, 2.0),
            upper_color: TORSO_COLOR,
            lower_color: SKIN_COLOR,
        };
        let leg = Limb {
            upper: Vector3::new(2.0, 3.0, 2.0),
            lower: Vector3::new(2.0, 4.0, 2.0),
            upper_color: LEG_COLOR,
            lower_color: LEG_COLOR,
        };
        arm.pose(&mut parts, root, Vector3::new(-3.0, 3.0, 0.0), swing, elbow);
        arm.pose(&mut parts, root, Vector3::new(3.0, 3.0, 0.0), -swing, -elbow);
        leg.pose(&mut parts, root, Vector3::new(-1.0, -3.0, 0.0), -swing, 0.0);
        leg.pose(&mut parts, root, Vector3::new(1.0, -3.0, 0.0), swing, 0.0);

        parts
    }
}

fn box_transform(offset: Vector3<f32>, size: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(offset) * Matrix4::from_nonuniform_scale(size.x, size.y, size.z)
}

fn body(model: Matrix4<f32>, color: [f32; 3]) -> RobotPart {
    RobotPart {
        kind: RobotPartKind::Body,
        model,
        color: [color[0], color[1], color[2], 1.0],
    }
}

/// Two-segment limb hanging from a joint
struct Limb {
    upper: Vector3<f32>,
    lower: Vector3<f32>,
    upper_color: [f32; 3],
    lower_color: [f32; 3],
}

impl Limb {
    fn pose(
        &self,
        parts: &mut Vec<RobotPart>,
        parent: Matrix4<f32>,
        joint: Vector3<f32>,
        pitch: f32,
        bend: f32,
    ) {
        let shoulder = parent * Matrix4::from_translation(joint) * Matrix4::from_angle_x(Rad(pitch));
        let upper_center = Vector3::new(0.0, -self.upper.y / 2.0 - JOINT_GAP / 2.0, 0.0);
        parts.push(body(shoulder * box_transform(upper_center, self.upper), self.upper_color));

        let elbow = shoulder
            * Matrix4::from_translation(Vector3::new(0.0, -self.upper.y - JOINT_GAP, 0.0))
            * Matrix4::from_angle_x(Rad(bend));
        let lower_center = Vector3::new(0.0, -self.lower.y / 2.0 + JOINT_GAP / 2.0, 0.0);
        parts.push(body(elbow * box_transform(lower_center, self.lower), self.lower_color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Transform, Point3};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_robot_falls_then_rests_on_floor() {
        let mut robot = Robot::new(RobotSettings::default());
        assert!(!robot.is_grounded());
        for _ in 0..120 {
            robot.update(RobotInput::default(), 1.0 / 60.0);
        }
        assert!(robot.is_grounded());
        assert!((robot.position.y - 0.8).abs() < 1e-6);
        assert_eq!(robot.velocity.y, 0.0);
    }

    #[test]
    fn test_robot_never_sinks_below_floor() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut robot = Robot::new(RobotSettings::default());
        let floor = robot.settings().floor();
        for _ in 0..5000 {
            let input = RobotInput {
                forward: rng.random_range(-1.0f32..=1.0),
                turn: rng.random_range(-1.0f32..=1.0),
            };
            robot.update(input, rng.random_range(0.0f32..0.5));
            assert!(robot.position.y >= floor);
        }
    }

    #[test]
    fn test_airborne_robot_ignores_steering() {
        let mut robot = Robot::new(RobotSettings::default());
        robot.update(
            RobotInput {
                forward: 1.0,
                turn: 1.0,
            },
            0.01,
        );
        assert_eq!(robot.yaw, 0.0);
        assert_eq!(robot.velocity.x, 0.0);
        assert_eq!(robot.velocity.z, 0.0);
    }

    #[test]
    fn test_walk_moves_along_heading_and_advances_phase() {
        let mut robot = Robot::new(RobotSettings {
            start_position: Vector3::new(0.0, 0.0, 0.0),
            ..RobotSettings::default()
        });
        assert!(robot.is_grounded());

        robot.update(
            RobotInput {
                forward: 1.0,
                turn: 0.0,
            },
            0.5,
        );
        assert!((robot.position.z - 1.5).abs() < 1e-5);
        assert!((robot.walk_phase - 3.0).abs() < 1e-5);

        // Standing still keeps the phase
        robot.update(RobotInput::default(), 0.5);
        assert!((robot.walk_phase - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_turning_while_grounded() {
        let mut robot = Robot::new(RobotSettings {
            start_position: Vector3::new(0.0, 0.0, 0.0),
            ..RobotSettings::default()
        });
        robot.update(
            RobotInput {
                forward: 0.0,
                turn: 1.0,
            },
            1.0,
        );
        assert!((robot.yaw - 90.0).abs() < 1e-4);
        assert!((robot.heading() - Vector3::unit_x()).magnitude() < 1e-5);
    }

    #[test]
    fn test_parts_layout() {
        let robot = Robot::new(RobotSettings::default());
        let parts = robot.parts();
        assert_eq!(parts.len(), 16);
        let faces = parts
            .iter()
            .filter(|p| matches!(p.kind, RobotPartKind::HeadFace(_)))
            .count();
        assert_eq!(faces, 6);
        assert_eq!(
            parts
                .iter()
                .filter(|p| p.kind == RobotPartKind::HeadOverlay)
                .count(),
            1
        );
    }

    #[test]
    fn test_limbs_swing_in_opposition() {
        let mut robot = Robot::new(RobotSettings {
            start_position: Vector3::new(0.0, 0.0, 0.0),
            ..RobotSettings::default()
        });
        robot.walk_phase = std::f32::consts::FRAC_PI_2;
        assert!((robot.limb_swing() - 0.5).abs() < 1e-6);

        let parts = robot.parts();
        // Upper arms are parts 8 (left) and 10 (right); their centres swing
        // to opposite sides along z
        let center = |i: usize| parts[i].model.transform_point(Point3::new(0.0, 0.0, 0.0));
        let left = center(8);
        let right = center(10);
        assert!(left.z * right.z < 0.0);
        assert!((left.y - right.y).abs() < 1e-5);
    }

    #[test]
    fn test_rest_pose_hangs_limbs_straight() {
        let robot = Robot::new(RobotSettings {
            start_position: Vector3::new(0.0, 0.0, 0.0),
            ..RobotSettings::default()
        });
        let parts = robot.parts();
        let scale = robot.settings().scale;
        // Left upper leg at rest: centred below the hip
        let hip = parts[12].model.transform_point(Point3::new(0.0, 0.0, 0.0));
        let expected_y = robot.position.y + (-3.0 - 1.5 - JOINT_GAP / 2.0) * scale;
        assert!((hip.y - expected_y).abs() < 1e-5);
    }
}
