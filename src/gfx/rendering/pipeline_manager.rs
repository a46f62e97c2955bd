//! Render pipeline management system for wgpu
//!
//! Pipelines are registered by name with a [`PipelineConfig`] and created in
//! one go once every shader module is loaded.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use super::instanced_renderer::InstanceData;
use crate::gfx::scene::vertex::Vertex3D;

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub vertex_entry: String,
    /// `None` builds a depth-only pipeline without a fragment stage
    pub fragment_entry: Option<String>,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub depth_compare: CompareFunction,
    pub color_targets: Vec<Option<ColorTargetState>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "scene".to_string(),
            vertex_entry: "vs_main".to_string(),
            fragment_entry: Some("fs_main".to_string()),
            bind_group_layouts: Vec::new(),
            cull_mode: Some(Face::Back),
            depth_format: None,
            depth_compare: CompareFunction::Less,
            color_targets: vec![Some(ColorTargetState {
                format: TextureFormat::Bgra8Unorm,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            })],
        }
    }
}

impl PipelineConfig {
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_shader(mut self, shader: &str) -> Self {
        self.shader = shader.to_string();
        self
    }

    pub fn with_entry_points(mut self, vertex: &str, fragment: Option<&str>) -> Self {
        self.vertex_entry = vertex.to_string();
        self.fragment_entry = fragment.map(str::to_string);
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    pub fn with_depth(mut self, format: TextureFormat, compare: CompareFunction) -> Self {
        self.depth_format = Some(format);
        self.depth_compare = compare;
        self
    }

    pub fn with_color_targets(mut self, targets: Vec<Option<ColorTargetState>>) -> Self {
        self.color_targets = targets;
        self
    }
}

/// Configurations registered by name, and the names not yet built
#[derive(Default)]
struct PipelineRegistry {
    configs: HashMap<String, PipelineConfig>,
    pending: Vec<String>,
}

impl PipelineRegistry {
    fn register(&mut self, name: &str, config: PipelineConfig) {
        self.configs.insert(name.to_string(), config);
        if !self.pending.iter().any(|pending| pending == name) {
            self.pending.push(name.to_string());
        }
    }

    fn take_pending(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    fn config(&self, name: &str) -> Option<&PipelineConfig> {
        self.configs.get(name)
    }
}

/// Owns shader modules and the pipelines built from them
pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    registry: PipelineRegistry,
    shader_modules: HashMap<String, ShaderModule>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            registry: PipelineRegistry::default(),
            shader_modules: HashMap::new(),
        }
    }

    /// Registers a pipeline configuration without creating it
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.registry.register(name, config);
    }

    /// Compiles a WGSL module, returning the validation error if it fails
    pub async fn load_shader(&mut self, name: &str, source: &str) -> Result<(), String> {
        self.device.push_error_scope(ErrorFilter::Validation);
        let shader_module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        if let Some(error) = self.device.pop_error_scope().await {
            return Err(format!("Shader '{}': {}", name, error));
        }
        self.shader_modules.insert(name.to_string(), shader_module);
        Ok(())
    }

    /// Gets a created pipeline
    pub fn get_pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    /// Creates every registered pipeline not built yet
    ///
    /// Each failure is reported once; failed pipelines are not retried.
    pub async fn create_all_pipelines(&mut self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for name in self.registry.take_pending() {
            let Some(config) = self.registry.config(&name) else {
                continue;
            };
            match self.create_pipeline_from_config(&name, config).await {
                Ok(pipeline) => {
                    self.pipelines.insert(name, pipeline);
                }
                Err(e) => errors.push(format!("Pipeline '{}': {}", name, e)),
            }
        }

        if errors.is_empty() {
            log::debug!("Created {} pipelines", self.pipelines.len());
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a render pipeline from configuration
    async fn create_pipeline_from_config(
        &self,
        name: &str,
        config: &PipelineConfig,
    ) -> Result<RenderPipeline, String> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| format!("Shader '{}' not found", config.shader))?;

        self.device.push_error_scope(ErrorFilter::Validation);
        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", name)),
                bind_group_layouts: &bind_group_layout_refs,
                push_constant_ranges: &[],
            });

        let fragment_state = config.fragment_entry.as_deref().map(|entry| FragmentState {
            module: shader,
            entry_point: Some(entry),
            targets: &config.color_targets,
            compilation_options: PipelineCompilationOptions::default(),
        });

        let vertex_buffers = [Vertex3D::desc(), InstanceData::vertex_buffer_layout()];

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: config.depth_compare,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let pipeline = self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some(&config.vertex_entry),
                    buffers: &vertex_buffers,
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: fragment_state,
                primitive: PrimitiveState {
                    topology: PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: FrontFace::Ccw,
                    cull_mode: config.cull_mode,
                    polygon_mode: PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil,
                multisample: MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        match self.device.pop_error_scope().await {
            Some(error) => Err(error.to_string()),
            None => Ok(pipeline),
        }
    }
}
