//! Core rendering functionality
//!
//! Handles render pipelines, shadow mapping, instanced draws and frame
//! rendering.

pub mod instanced_renderer;
pub mod pipeline_manager;
pub mod render_engine;
pub mod shaders;
pub mod shadow;

// Re-export main types
pub use instanced_renderer::{GpuDrawable, InstanceData};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
pub use shadow::ShadowSettings;
