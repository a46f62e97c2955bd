//! WGPU-based rendering engine for the hillside scene
//!
//! Owns the surface, device and every GPU resource. Each frame runs a depth
//! pass from the sun into the shadow map followed by the color pass into the
//! surface, both over the same [`FrameDraws`].

use std::sync::Arc;
use wgpu::{Device, TextureFormat};

use crate::{
    config::AppConfig,
    error::RenderError,
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightConfig},
            material::{Material, MaterialBindings, TextureLibrary},
            texture_resource::TextureResource,
        },
        scene::{
            drawable::{DrawableConfig, DrawableId, ShaderVariant},
            scene::FrameDraws,
        },
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
    },
};

use super::{
    instanced_renderer::GpuDrawable,
    pipeline_manager::{PipelineConfig, PipelineManager},
    shaders::{scene_shader_source, shadow_shader_source},
    shadow::ShadowSettings,
};

const SHADOW_OPAQUE: &str = "shadow_opaque";
const SHADOW_CUTOUT: &str = "shadow_cutout";

/// Pipeline name of each color-pass shader variant
pub fn pipeline_name(variant: ShaderVariant) -> &'static str {
    match variant {
        ShaderVariant::Block => "block",
        ShaderVariant::Terrain => "terrain",
        ShaderVariant::SolidPhong => "solid",
        ShaderVariant::Unlit => "unlit",
    }
}

/// Depth-pass pipeline for a shadow caster
pub fn shadow_pipeline_name(cutout: bool) -> &'static str {
    if cutout {
        SHADOW_CUTOUT
    } else {
        SHADOW_OPAQUE
    }
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,

    shadow_map: TextureResource,
    shadow_bind_group: wgpu::BindGroup,
    shadow_settings: ShadowSettings,
    light_config: LightConfig,
    clear_color: wgpu::Color,

    drawables: Vec<GpuDrawable>,
}

impl RenderEngine {
    /// Creates the device, surface and every drawable's GPU resources
    ///
    /// `drawables` is the scene catalog; entry `i` becomes `DrawableId(i)`.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        app_config: &AppConfig,
        drawables: &[DrawableConfig],
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::UnsupportedSurface)?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(app_config.vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "Surface configured: {}x{} {:?}",
            config.width,
            config.height,
            format
        );

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let shadow_settings = app_config.shadow;
        let shadow_map = TextureResource::create_shadow_map(&device, shadow_settings.map_size);
        let shadow_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::depth_texture_2d())
            .create(&device, "Shadow Map Layout");
        let shadow_bind_group = BindGroupBuilder::new(&shadow_layout)
            .texture(&shadow_map.view)
            .create(&device, "Shadow Map Bind Group");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        let material_bindings = MaterialBindings::new(&device);
        let mut library = TextureLibrary::new(&device, &queue, app_config.texture_dir.clone());
        let gpu_drawables: Vec<GpuDrawable> = drawables
            .iter()
            .map(|drawable| {
                let material = Material::new(
                    &device,
                    &queue,
                    &material_bindings,
                    &mut library,
                    &drawable.textures,
                    drawable.label,
                );
                GpuDrawable::new(&device, drawable.clone(), material)
            })
            .collect();
        log::info!(
            "Uploaded {} drawables using {} textures from {}",
            gpu_drawables.len(),
            library.loaded_count(),
            app_config.texture_dir.display()
        );

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());
        let mut errors = Vec::new();
        for (name, source) in [
            ("scene", scene_shader_source()),
            ("shadow", shadow_shader_source()),
        ] {
            if let Err(error) = pipeline_manager.load_shader(name, &source).await {
                errors.push(error);
            }
        }
        register_pipelines(
            &mut pipeline_manager,
            format,
            &global_bindings,
            &material_bindings,
            &shadow_layout,
        );
        if let Err(pipeline_errors) = pipeline_manager.create_all_pipelines().await {
            errors.extend(pipeline_errors);
        }
        startup_result(errors)?;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            pipeline_manager,
            global_ubo,
            global_bindings,
            shadow_map,
            shadow_bind_group,
            shadow_settings,
            light_config: app_config.light,
            clear_color: clear_color(app_config.clear_color),
            drawables: gpu_drawables,
        })
    }

    /// Uploads instances and encodes the shadow and color passes
    ///
    /// A lost or outdated surface is reconfigured and the frame is skipped.
    pub fn render_frame(&mut self, draws: &FrameDraws) -> Result<(), wgpu::SurfaceError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        for (index, drawable) in self.drawables.iter_mut().enumerate() {
            let instances = draws.instances(DrawableId(index));
            drawable.upload_instances(&self.device, &self.queue, instances);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1: depth from the sun
        {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Depth Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            shadow_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for cutout in [false, true] {
                let Some(pipeline) = self
                    .pipeline_manager
                    .get_pipeline(shadow_pipeline_name(cutout))
                else {
                    continue;
                };
                shadow_pass.set_pipeline(pipeline);
                for drawable in self
                    .drawables
                    .iter()
                    .filter(|d| d.config.casts_shadow && d.config.cutout == cutout)
                {
                    drawable.draw(&mut shadow_pass, cutout);
                }
            }
        }

        // PASS 2: lit scene
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
            render_pass.set_bind_group(2, &self.shadow_bind_group, &[]);

            for variant in ShaderVariant::ALL {
                let Some(pipeline) = self.pipeline_manager.get_pipeline(pipeline_name(variant))
                else {
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                for drawable in self
                    .drawables
                    .iter()
                    .filter(|d| d.config.shader == variant)
                {
                    drawable.draw(&mut render_pass, true);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        log::trace!("Frame submitted: {} instances", draws.total_instances());
        Ok(())
    }

    /// Uploads camera, light and shadow uniforms for the next frame
    pub fn update(&mut self, camera_uniform: CameraUniform) {
        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            camera_uniform,
            &self.light_config,
            &self.shadow_settings,
        );
    }

    /// Reconfigures the surface and recreates the window depth buffer
    ///
    /// Zero-sized requests (minimized window) are ignored. The shadow map keeps
    /// its fixed resolution.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
        log::debug!("Resized surface to {}x{}", width, height);
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

fn clear_color(rgba: [f64; 4]) -> wgpu::Color {
    wgpu::Color {
        r: rgba[0],
        g: rgba[1],
        b: rgba[2],
        a: rgba[3],
    }
}

/// Every shader or pipeline failure aborts startup
fn startup_result(errors: Vec<String>) -> Result<(), RenderError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(RenderError::Pipeline(errors))
    }
}

fn register_pipelines(
    pipeline_manager: &mut PipelineManager,
    format: TextureFormat,
    global_bindings: &GlobalBindings,
    material_bindings: &MaterialBindings,
    shadow_layout: &BindGroupLayoutWithDesc,
) {
    let color_layouts = vec![
        global_bindings.bind_group_layout().clone(),
        material_bindings.bind_group_layout().clone(),
        shadow_layout.layout.clone(),
    ];
    let color_target = vec![Some(wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState::REPLACE),
        write_mask: wgpu::ColorWrites::ALL,
    })];

    for variant in ShaderVariant::ALL {
        let (fragment, cull, compare) = match variant {
            ShaderVariant::Block => ("fs_block", Some(wgpu::Face::Back), wgpu::CompareFunction::Less),
            ShaderVariant::Terrain => {
                ("fs_terrain", Some(wgpu::Face::Back), wgpu::CompareFunction::Less)
            }
            ShaderVariant::SolidPhong => ("fs_solid", None, wgpu::CompareFunction::Less),
            // Billboards and overlays sit on top of coplanar faces
            ShaderVariant::Unlit => ("fs_unlit", None, wgpu::CompareFunction::LessEqual),
        };
        let name = pipeline_name(variant);
        pipeline_manager.register_pipeline(
            name,
            PipelineConfig::default()
                .with_label(name)
                .with_shader("scene")
                .with_entry_points("vs_main", Some(fragment))
                .with_cull_mode(cull)
                .with_depth(TextureResource::DEPTH_FORMAT, compare)
                .with_bind_group_layouts(color_layouts.clone())
                .with_color_targets(color_target.clone()),
        );
    }

    // No culling so thin panes and cross flowers still cast
    pipeline_manager.register_pipeline(
        SHADOW_OPAQUE,
        PipelineConfig::default()
            .with_label(SHADOW_OPAQUE)
            .with_shader("shadow")
            .with_entry_points("vs_shadow", None)
            .with_cull_mode(None)
            .with_depth(TextureResource::DEPTH_FORMAT, wgpu::CompareFunction::Less)
            .with_bind_group_layouts(vec![global_bindings.bind_group_layout().clone()])
            .with_color_targets(vec![]),
    );
    pipeline_manager.register_pipeline(
        SHADOW_CUTOUT,
        PipelineConfig::default()
            .with_label(SHADOW_CUTOUT)
            .with_shader("shadow")
            .with_entry_points("vs_shadow", Some("fs_shadow_cutout"))
            .with_cull_mode(None)
            .with_depth(TextureResource::DEPTH_FORMAT, wgpu::CompareFunction::Less)
            .with_bind_group_layouts(vec![
                global_bindings.bind_group_layout().clone(),
                material_bindings.bind_group_layout().clone(),
            ])
            .with_color_targets(vec![]),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_has_a_distinct_pipeline() {
        let names: std::collections::HashSet<_> =
            ShaderVariant::ALL.iter().map(|v| pipeline_name(*v)).collect();
        assert_eq!(names.len(), ShaderVariant::ALL.len());
        assert!(!names.contains(SHADOW_OPAQUE));
        assert!(!names.contains(SHADOW_CUTOUT));
    }

    #[test]
    fn test_shadow_pipeline_selection() {
        assert_eq!(shadow_pipeline_name(false), "shadow_opaque");
        assert_eq!(shadow_pipeline_name(true), "shadow_cutout");
    }

    #[test]
    fn test_clear_color_conversion() {
        let color = clear_color([0.1, 0.2, 0.3, 1.0]);
        assert_eq!(color.g, 0.2);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_pipeline_failures_abort_startup() {
        assert!(startup_result(Vec::new()).is_ok());
        let err = startup_result(vec!["Pipeline 'block': bad entry point".to_string()])
            .unwrap_err();
        assert!(matches!(err, RenderError::Pipeline(ref errors) if errors.len() == 1));
    }
}
