//! Global uniform bindings for camera, lighting and shadow data
//!
//! One uniform block, bound to slot 0 of every pipeline, carries everything
//! that is constant across the draws of a frame.

use crate::{
    gfx::{
        camera::camera_utils::{convert_matrix4_to_array, CameraUniform},
        rendering::shadow::{light_space_matrix, ShadowSettings},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_proj: [[f32; 4]; 4],
    light_view_proj: [[f32; 4]; 4],
    view_position: [f32; 4],
    /// xyz = direction the sunlight travels
    light_direction: [f32; 4],
    light_color: [f32; 4],
    fill_position: [f32; 4],
    /// rgb = fill light color, a = fill strength
    fill_color: [f32; 4],
    /// x = depth bias, y = PCF radius, z = shadow map size, w = outline width
    shadow_params: [f32; 4],
}
// Total: 2 * 64 + 6 * 16 = 224 bytes

/// Tuning constant scaling the fill light's contribution to shading.
///
/// Hand-picked, not derived from any lighting model.
pub const FILL_STRENGTH: f32 = 0.1;

/// Sun and fill light, constant for the lifetime of the process
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightConfig {
    /// Direction the sunlight travels (need not be normalized)
    pub sun_direction: [f32; 3],
    pub sun_color: [f32; 3],
    /// Shadow-free point light
    pub fill_position: [f32; 3],
    pub fill_color: [f32; 3],
    pub fill_strength: f32,
    /// Width of the dark block outline in texture space
    pub outline_width: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            sun_direction: [0.4, -1.0, 0.4],
            sun_color: [2.0, 2.0, 2.0],
            fill_position: [0.0, 5.0, 0.0],
            fill_color: [1.0, 5.0, 1.0],
            fill_strength: FILL_STRENGTH,
            outline_width: 0.03,
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

impl GlobalUBOContent {
    pub fn new(camera: CameraUniform, light: &LightConfig, shadow: &ShadowSettings) -> Self {
        let extend = |v: [f32; 3], w: f32| [v[0], v[1], v[2], w];
        Self {
            view_proj: camera.view_proj,
            light_view_proj: convert_matrix4_to_array(light_space_matrix(light, shadow)),
            view_position: camera.view_position,
            light_direction: extend(light.sun_direction, 0.0),
            light_color: extend(light.sun_color, 1.0),
            fill_position: extend(light.fill_position, 1.0),
            fill_color: extend(light.fill_color, light.fill_strength),
            shadow_params: [
                shadow.bias,
                shadow.pcf_radius as f32,
                shadow.map_size as f32,
                light.outline_width,
            ],
        }
    }
}

/// Updates the global uniform buffer with camera, light and shadow data
///
/// Called once per frame before any pass is encoded.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    light: &LightConfig,
    shadow: &ShadowSettings,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, light, shadow));
}

/// Bind group layout and bind group for the global uniforms (slot 0)
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");
        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_block_size_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 224);
        assert_eq!(std::mem::size_of::<GlobalUBOContent>() % 16, 0);
    }

    #[test]
    fn test_content_packs_light_and_shadow_params() {
        let content = GlobalUBOContent::new(
            CameraUniform::default(),
            &LightConfig::default(),
            &ShadowSettings::default(),
        );
        assert_eq!(content.light_direction, [0.4, -1.0, 0.4, 0.0]);
        assert_eq!(content.fill_color, [1.0, 5.0, 1.0, FILL_STRENGTH]);
        assert_eq!(content.shadow_params, [0.005, 1.0, 1024.0, 0.03]);
    }

    #[test]
    fn test_fill_strength_is_the_tuning_constant() {
        let light = LightConfig::default();
        assert_eq!(light.fill_strength, FILL_STRENGTH);
        // Scaled fill stays dimmer than the sun on every channel
        for (fill, sun) in light.fill_color.iter().zip(light.sun_color) {
            assert!(fill * FILL_STRENGTH < sun);
        }
    }
}
