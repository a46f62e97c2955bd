//! Instanced drawing of scene drawables
//!
//! Each drawable owns one immutable mesh and one instance buffer that is
//! refilled every frame. A drawable with N placements is a single
//! `draw_indexed` call with N instances.

use bytemuck::{Pod, Zeroable};
use cgmath::Matrix4;
use wgpu::util::DeviceExt;
use wgpu::{Buffer, Device, Queue, RenderPass};

use crate::gfx::{
    geometry::GeometryData,
    resources::material::Material,
    scene::{drawable::DrawableConfig, vertex::Vertex3D},
};

/// Per-instance model matrix and color multiplier
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub transform: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceData {
    pub fn from_transform(transform: Matrix4<f32>, color: [f32; 4]) -> Self {
        Self {
            transform: transform.into(),
            color,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4
    ];

    /// Instance-rate layout; locations follow the three `Vertex3D` attributes
    pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Uploaded vertex and index data of one mesh
pub struct MeshBuffers {
    pub vertex_buffer: Buffer,
    pub index_buffer: Buffer,
    pub index_count: u32,
}

impl MeshBuffers {
    pub fn new(device: &Device, geometry: &GeometryData, label: &str) -> Self {
        let (vertices, indices): (Vec<Vertex3D>, Vec<u32>) = geometry.to_scene_format();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }
}

/// Instance capacity needed for `count` instances, doubling from `current`
pub fn grown_capacity(current: u32, count: u32) -> u32 {
    if count <= current {
        current
    } else {
        count.next_power_of_two().max(16)
    }
}

/// Vertex buffer of [`InstanceData`] that grows on demand
pub struct InstanceBuffer {
    buffer: Buffer,
    capacity: u32,
    count: u32,
    label: String,
}

impl InstanceBuffer {
    pub fn new(device: &Device, capacity: u32, label: &str) -> Self {
        let capacity = grown_capacity(0, capacity.max(1));
        Self {
            buffer: Self::allocate(device, capacity, label),
            capacity,
            count: 0,
            label: label.to_owned(),
        }
    }

    fn allocate(device: &Device, capacity: u32, label: &str) -> Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Instance Buffer", label)),
            size: capacity as u64 * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn update(&mut self, device: &Device, queue: &Queue, instances: &[InstanceData]) {
        let count = instances.len() as u32;
        let capacity = grown_capacity(self.capacity, count);
        if capacity != self.capacity {
            log::debug!(
                "Growing {} instance buffer {} -> {}",
                self.label,
                self.capacity,
                capacity
            );
            self.buffer = Self::allocate(device, capacity, &self.label);
            self.capacity = capacity;
        }

        self.count = count;
        if count > 0 {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(instances));
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// GPU side of one catalog entry
pub struct GpuDrawable {
    pub config: DrawableConfig,
    mesh: MeshBuffers,
    material: Material,
    instances: InstanceBuffer,
}

impl GpuDrawable {
    pub fn new(device: &Device, config: DrawableConfig, material: Material) -> Self {
        let geometry = config.mesh.build();
        let mesh = MeshBuffers::new(device, &geometry, config.label);
        let instances = InstanceBuffer::new(device, 1, config.label);
        Self {
            config,
            mesh,
            material,
            instances,
        }
    }

    pub fn upload_instances(&mut self, device: &Device, queue: &Queue, instances: &[InstanceData]) {
        self.instances.update(device, queue, instances);
    }

    /// Draws every uploaded instance; pipeline and group 0 are bound by the caller
    pub fn draw(&self, render_pass: &mut RenderPass<'_>, bind_material: bool) {
        let count = self.instances.count();
        if count == 0 {
            return;
        }

        if bind_material {
            render_pass.set_bind_group(1, self.material.bind_group(), &[]);
        }
        render_pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instances.buffer.slice(..));
        render_pass.set_index_buffer(self.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.mesh.index_count, 0, 0..count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout_follows_vertex_locations() {
        let layout = InstanceData::vertex_buffer_layout();
        assert_eq!(layout.array_stride, 80);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        let locations: Vec<u32> = layout.attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![3, 4, 5, 6, 7]);
        assert_eq!(layout.attributes[4].offset, 64);
    }

    #[test]
    fn test_capacity_growth() {
        assert_eq!(grown_capacity(0, 1), 16);
        assert_eq!(grown_capacity(16, 10), 16);
        assert_eq!(grown_capacity(16, 17), 32);
        assert_eq!(grown_capacity(32, 615), 1024);
        assert_eq!(grown_capacity(1024, 0), 1024);
    }

    #[test]
    fn test_instance_from_transform_is_column_major() {
        let m = Matrix4::from_translation(cgmath::Vector3::new(1.0, 2.0, 3.0));
        let instance = InstanceData::from_transform(m, [0.5; 4]);
        assert_eq!(instance.transform[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(instance.color, [0.5; 4]);
    }
}
