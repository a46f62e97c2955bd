//! Texture materials
//!
//! Every drawable binds one material at group 1: a top, side and bottom
//! texture followed by a sampler. Single-texture drawables bind the same view
//! in all three slots; untextured drawables bind a white texel.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use wgpu::Device;

use super::texture_resource::TextureResource;
use crate::{
    gfx::scene::drawable::TextureSet,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
    },
};

/// Layout of the material bind group (slot 1)
pub struct MaterialBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
}

impl MaterialBindings {
    pub fn new(device: &Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Material Bind Group Layout");

        MaterialBindings { bind_group_layout }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }
}

/// Loads each texture file once and shares it between drawables
pub struct TextureLibrary {
    root: PathBuf,
    loaded: HashMap<&'static str, TextureResource>,
    white: TextureResource,
}

impl TextureLibrary {
    pub fn new(device: &Device, queue: &wgpu::Queue, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            loaded: HashMap::new(),
            white: TextureResource::white(device, queue),
        }
    }

    pub fn resolve(&self, name: &str) -> PathBuf {
        resolve_texture_path(&self.root, name)
    }

    fn ensure_loaded(&mut self, device: &Device, queue: &wgpu::Queue, name: &'static str) {
        if !self.loaded.contains_key(name) {
            let texture = TextureResource::load_or_blank(device, queue, &self.resolve(name));
            self.loaded.insert(name, texture);
        }
    }

    /// Textures for the top, side and bottom slots of `set`
    pub fn slots(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        set: &TextureSet,
    ) -> [&TextureResource; 3] {
        let Some(names) = set.slots() else {
            return [&self.white; 3];
        };
        for name in set.unique_paths() {
            self.ensure_loaded(device, queue, name);
        }
        names.map(|name| self.loaded.get(name).unwrap_or(&self.white))
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}

pub fn resolve_texture_path(root: &Path, name: &str) -> PathBuf {
    root.join(name)
}

/// Bound textures of one drawable
pub struct Material {
    bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn new(
        device: &Device,
        queue: &wgpu::Queue,
        bindings: &MaterialBindings,
        library: &mut TextureLibrary,
        textures: &TextureSet,
        label: &str,
    ) -> Self {
        let [top, side, bottom] = library.slots(device, queue, textures);
        let bind_group = BindGroupBuilder::new(&bindings.bind_group_layout)
            .texture(&top.view)
            .texture(&side.view)
            .texture(&bottom.view)
            .sampler(&top.sampler)
            .create(device, &format!("{} Material", label));

        Self { bind_group }
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
