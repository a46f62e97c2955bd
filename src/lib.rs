// src/lib.rs
//! Hillside
//!
//! A small wgpu/winit scene: a voxel house and garden, a procedural hill, a
//! rounded pyramid and a walking robot, lit by a shadow-casting sun.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod input;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::HillsideApp;
pub use config::AppConfig;
