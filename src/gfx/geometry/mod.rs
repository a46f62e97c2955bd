//! # Procedural Geometry Generation
//!
//! Every mesh in the scene is generated here; nothing is loaded from model
//! files.
//!
//! ## Supported Shapes
//!
//! - **Block**: textured voxel cube with per-face normals ([`primitives`])
//! - **Box / Pane / Cube face / Flower cross**: small textured shapes ([`primitives`])
//! - **Hill**: closed solid with a polynomial height profile ([`hill`])
//! - **Smooth pyramid**: Catmull-Rom surface of revolution ([`smooth_pyramid`])
//!
//! ## Usage
//!
//! ```rust
//! use hillside::gfx::geometry::{generate_block, hill::{generate_hill, HillParams}};
//!
//! let block = generate_block(0.2);
//! assert_eq!(block.vertex_count(), 24);
//!
//! let hill = generate_hill(&HillParams::default());
//! assert_eq!(hill.vertex_count(), 834);
//! ```

pub mod hill;
pub mod primitives;
pub mod smooth_pyramid;

pub use primitives::*;

use std::ops::Range;

use crate::gfx::scene::vertex::Vertex3D;

/// A named run of indices inside a mesh, e.g. the top surface of the hill
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSection {
    pub name: &'static str,
    pub indices: Range<usize>,
}

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding seen from outside)
    pub indices: Vec<u32>,
    /// Named index ranges
    pub sections: Vec<MeshSection>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a vertex and returns its index
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        self.tex_coords.push(uv);
        index
    }

    /// Appends a flat quad. `corners` must be counter-clockwise seen from the
    /// side `normal` points to.
    pub fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3], uvs: [[f32; 2]; 4]) {
        let base = self.vertices.len() as u32;
        for (corner, uv) in corners.iter().zip(uvs.iter()) {
            self.push_vertex(*corner, normal, *uv);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    /// Records the indices appended since `start` as a named section
    pub fn mark_section(&mut self, name: &'static str, start: usize) {
        self.sections.push(MeshSection {
            name,
            indices: start..self.indices.len(),
        });
    }

    /// Returns the indices of a named section, if present
    pub fn section(&self, name: &str) -> Option<&[u32]> {
        self.sections
            .iter()
            .find(|section| section.name == name)
            .map(|section| &self.indices[section.indices.clone()])
    }

    /// Convert to the interleaved vertex format used by the renderer
    pub fn to_scene_format(&self) -> (Vec<Vertex3D>, Vec<u32>) {
        let vertices: Vec<Vertex3D> = (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect();

        (vertices, self.indices.clone())
    }

    /// Average of all vertex positions
    pub fn centroid(&self) -> [f32; 3] {
        if self.vertices.is_empty() {
            return [0.0; 3];
        }
        let mut sum = [0.0f32; 3];
        for v in &self.vertices {
            sum[0] += v[0];
            sum[1] += v[1];
            sum[2] += v[2];
        }
        let n = self.vertices.len() as f32;
        [sum[0] / n, sum[1] / n, sum[2] / n]
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use cgmath::{InnerSpace, Vector3};

    use super::GeometryData;

    pub fn triangle(data: &GeometryData, tri: &[u32]) -> [Vector3<f32>; 3] {
        [
            Vector3::from(data.vertices[tri[0] as usize]),
            Vector3::from(data.vertices[tri[1] as usize]),
            Vector3::from(data.vertices[tri[2] as usize]),
        ]
    }

    /// Unnormalized geometric normal; its length is twice the triangle area
    pub fn face_normal(data: &GeometryData, tri: &[u32]) -> Vector3<f32> {
        let [a, b, c] = triangle(data, tri);
        (b - a).cross(c - a)
    }

    pub fn face_centroid(data: &GeometryData, tri: &[u32]) -> Vector3<f32> {
        let [a, b, c] = triangle(data, tri);
        (a + b + c) / 3.0
    }

    /// Asserts every non-degenerate triangle faces away from the mesh centroid
    pub fn assert_outward_winding(data: &GeometryData) {
        let center = Vector3::from(data.centroid());
        for tri in data.indices.chunks(3) {
            let normal = face_normal(data, tri);
            if normal.magnitude() < 1e-6 {
                continue;
            }
            let outward = face_centroid(data, tri) - center;
            assert!(
                normal.dot(outward) > 0.0,
                "triangle {:?} winds inward (normal {:?}, offset {:?})",
                tri,
                normal,
                outward
            );
        }
    }
}
