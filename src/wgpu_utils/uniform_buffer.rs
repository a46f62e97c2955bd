// src/wgpu_utils/uniform_buffer.rs
use std::marker::PhantomData;

/// GPU buffer holding exactly one `Content` value
///
/// Writes are skipped while the content stays the same, so static uniforms
/// cost nothing after the first frame.
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    last_written: Option<Content>,
    _content: PhantomData<Content>,
}

impl<Content: bytemuck::Pod + PartialEq> UniformBuffer<Content> {
    pub fn new(device: &wgpu::Device) -> Self {
        Self::with_label(device, short_type_name::<Content>())
    }

    pub fn with_label(device: &wgpu::Device, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Uniform Buffer", label)),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        UniformBuffer {
            buffer,
            last_written: None,
            _content: PhantomData,
        }
    }

    /// Queues a write unless `content` equals what was last written
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) {
        if !needs_write(self.last_written.as_ref(), &content) {
            return;
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&content));
        self.last_written = Some(content);
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}

fn needs_write<T: PartialEq>(last: Option<&T>, next: &T) -> bool {
    last != Some(next)
}

/// Type name without its module path
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
