//! Error types for window, GPU and texture setup

use std::path::PathBuf;

/// Fatal initialization failures
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface is not supported by the adapter")]
    UnsupportedSurface,

    /// One entry per shader module or pipeline that failed validation
    #[error("failed to build render pipelines: {}", .0.join("; "))]
    Pipeline(Vec<String>),
}

/// Texture file could not be turned into pixels
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("cannot read texture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
