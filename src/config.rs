//! Application configuration
//!
//! Every tunable the program uses lives here with its default value. Only the
//! texture directory can be overridden from the environment.

use std::path::PathBuf;

use crate::gfx::{
    camera::CameraSettings, rendering::shadow::ShadowSettings,
    resources::global_bindings::LightConfig, scene::robot::RobotSettings,
};

/// Environment variable naming the texture directory
pub const TEXTURE_DIR_VAR: &str = "HILLSIDE_TEXTURE_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Root that texture names in the drawable catalog resolve against
    pub texture_dir: PathBuf,
    pub vsync: bool,
    pub clear_color: [f64; 4],
    pub light: LightConfig,
    pub shadow: ShadowSettings,
    pub camera: CameraSettings,
    pub robot: RobotSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Hillside".to_string(),
            width: 800,
            height: 600,
            texture_dir: PathBuf::from("textures"),
            vsync: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            light: LightConfig::default(),
            shadow: ShadowSettings::default(),
            camera: CameraSettings::default(),
            robot: RobotSettings::default(),
        }
    }
}

impl AppConfig {
    /// Defaults with `HILLSIDE_TEXTURE_DIR` applied
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides read through `lookup`; empty values are ignored
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(TEXTURE_DIR_VAR).filter(|dir| !dir.trim().is_empty()) {
            log::debug!("Texture directory overridden: {}", dir);
            config.texture_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
