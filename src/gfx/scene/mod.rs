//! # Scene Management Module
//!
//! Describes what is drawn and where. Nothing here touches the GPU, so every
//! part of the scene can be tested without a device.
//!
//! ## Key Components
//!
//! - [`DrawableConfig`] - mesh, textures, shader variant and cutout flag of one drawable
//! - [`Placement`] - one static instance of a drawable in the world
//! - [`Robot`] - the walking character and its cube parts
//! - [`Scene`] - owns the catalog, the layout, the camera and the robot
//! - [`Vertex3D`] - vertex data structure with position, normal, and texture coordinates
//!
//! ## Usage
//!
//! ```rust
//! use hillside::gfx::{camera::CameraSettings, scene::{RobotSettings, Scene}};
//!
//! let mut scene = Scene::new(CameraSettings::default(), RobotSettings::default(), 4.0 / 3.0);
//! let draws = scene.frame_draws();
//! assert!(draws.total_instances() > 0);
//! ```

pub mod drawable;
pub mod layout;
pub mod robot;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use drawable::{DrawableConfig, DrawableId, MeshKind, SceneDrawables, ShaderVariant, TextureSet};
pub use layout::{Placement, PlacementTransform};
pub use robot::{Robot, RobotSettings};
pub use scene::{FrameDraws, Scene};
pub use vertex::Vertex3D;
