//! # Graphics Module
//!
//! All graphics-related functionality of hillside: camera, procedural
//! geometry, the shadow-mapped renderer, the scene description and GPU
//! resources.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - First-person fly camera confined to a box
//! - **Geometry** ([`geometry`]) - Blocks, panes, the hill and the rounded pyramid
//! - **Rendering Pipeline** ([`rendering`]) - Depth pass from the sun, then a lit color pass
//! - **Scene Management** ([`scene`]) - Drawable catalog, static layout and the robot
//! - **Resource Management** ([`resources`]) - Textures, materials and global uniforms
//!
//! The render engine is created by [`crate::app::HillsideApp`] once the window
//! exists; the scene can be built and stepped without one.

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::FlyCamera;
pub use rendering::render_engine::RenderEngine;
