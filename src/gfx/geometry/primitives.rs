//! # Primitive Shape Generation
//!
//! Small textured shapes used by the voxel scene. All shapes are generated
//! with outward normals and image-oriented texture coordinates (v = 0 is the
//! top row of the image, so side faces show their texture upright).

use super::GeometryData;

/// One face of an axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosZ,
        CubeFace::NegZ,
        CubeFace::NegX,
        CubeFace::PosX,
        CubeFace::PosY,
        CubeFace::NegY,
    ];

    pub fn normal(self) -> [f32; 3] {
        match self {
            CubeFace::PosX => [1.0, 0.0, 0.0],
            CubeFace::NegX => [-1.0, 0.0, 0.0],
            CubeFace::PosY => [0.0, 1.0, 0.0],
            CubeFace::NegY => [0.0, -1.0, 0.0],
            CubeFace::PosZ => [0.0, 0.0, 1.0],
            CubeFace::NegZ => [0.0, 0.0, -1.0],
        }
    }

    /// Corners of this face of the box `[min, max]`, ordered bottom-left,
    /// bottom-right, top-right, top-left as seen from outside.
    fn corners(self, min: [f32; 3], max: [f32; 3]) -> [[f32; 3]; 4] {
        let [x0, y0, z0] = min;
        let [x1, y1, z1] = max;
        match self {
            CubeFace::PosZ => [[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]],
            CubeFace::NegZ => [[x1, y0, z0], [x0, y0, z0], [x0, y1, z0], [x1, y1, z0]],
            CubeFace::PosX => [[x1, y0, z1], [x1, y0, z0], [x1, y1, z0], [x1, y1, z1]],
            CubeFace::NegX => [[x0, y0, z0], [x0, y0, z1], [x0, y1, z1], [x0, y1, z0]],
            CubeFace::PosY => [[x0, y1, z1], [x1, y1, z1], [x1, y1, z0], [x0, y1, z0]],
            CubeFace::NegY => [[x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1]],
        }
    }
}

const FACE_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

fn push_box_face(data: &mut GeometryData, min: [f32; 3], max: [f32; 3], face: CubeFace) {
    data.push_quad(face.corners(min, max), face.normal(), FACE_UVS);
}

/// Generate an axis-aligned box spanning `min..max`, 4 vertices per face
pub fn generate_box(min: [f32; 3], max: [f32; 3]) -> GeometryData {
    let mut data = GeometryData::new();
    for face in CubeFace::ALL {
        push_box_face(&mut data, min, max, face);
    }
    data
}

/// Generate a voxel block: a cube of half-size `half_size` centred at the origin
pub fn generate_block(half_size: f32) -> GeometryData {
    generate_box([-half_size; 3], [half_size; 3])
}

/// Generate a unit cube centred at the origin (vertices from -0.5 to 0.5)
pub fn generate_unit_cube() -> GeometryData {
    generate_block(0.5)
}

/// Generate a single face of the unit cube
pub fn generate_cube_face(face: CubeFace) -> GeometryData {
    let mut data = GeometryData::new();
    push_box_face(&mut data, [-0.5; 3], [0.5; 3], face);
    data
}

/// Generate a thin glass pane of half-size `size`, facing ±z
pub fn generate_pane(size: f32) -> GeometryData {
    let thickness = size * 0.05;
    generate_box([-size, -size, -thickness], [size, size, thickness])
}

/// Height of the lower door half; the upper half stacks on top of it
pub const DOOR_MID_HEIGHT: f32 = 0.45;
const DOOR_TOP_HEIGHT: f32 = 0.9;
const DOOR_HALF_WIDTH: f32 = 0.2;
const DOOR_THICKNESS: f32 = 0.015;

/// Which half of the door to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorHalf {
    Lower,
    Upper,
}

/// Generate one half of the door slab, standing on y = 0
pub fn generate_door_half(half: DoorHalf) -> GeometryData {
    let (bottom, top) = match half {
        DoorHalf::Lower => (0.0, DOOR_MID_HEIGHT),
        DoorHalf::Upper => (DOOR_MID_HEIGHT, DOOR_TOP_HEIGHT),
    };
    generate_box(
        [-DOOR_HALF_WIDTH, bottom, -DOOR_THICKNESS],
        [DOOR_HALF_WIDTH, top, DOOR_THICKNESS],
    )
}

/// Generate two crossed vertical quads for a flower sprite.
///
/// The sprite is `3 * size` tall and hangs below its origin, with its top
/// edge `0.1 * size` above it.
pub fn generate_flower_cross(size: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let w = 0.6 * size;
    let top = 0.1 * size;
    let bottom = top - 3.0 * size;

    data.push_quad(
        [[-w, bottom, 0.0], [w, bottom, 0.0], [w, top, 0.0], [-w, top, 0.0]],
        [0.0, 0.0, 1.0],
        FACE_UVS,
    );
    data.push_quad(
        [[0.0, bottom, -w], [0.0, bottom, w], [0.0, top, w], [0.0, top, -w]],
        [-1.0, 0.0, 0.0],
        FACE_UVS,
    );
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::test_util::{assert_outward_winding, face_normal};
    use cgmath::{InnerSpace, Vector3};

    #[test]
    fn test_block_generation() {
        let block = generate_block(0.2);
        assert_eq!(block.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(block.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(block.triangle_count(), 12);
        for v in &block.vertices {
            for c in v {
                assert!((c.abs() - 0.2).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_box_winding_matches_normals() {
        let cube = generate_unit_cube();
        assert_outward_winding(&cube);
        for (quad, tri) in cube.indices.chunks(3).enumerate() {
            let geometric = face_normal(&cube, tri).normalize();
            let stored = Vector3::from(cube.normals[tri[0] as usize]);
            assert!(
                geometric.dot(stored) > 0.99,
                "triangle {} disagrees with its vertex normal",
                quad
            );
        }
    }

    #[test]
    fn test_side_faces_are_upright() {
        let cube = generate_unit_cube();
        // Vertices at the top of a side face sample the top row of the image
        for (i, normal) in cube.normals.iter().enumerate() {
            if normal[1] == 0.0 {
                let expected_v = if cube.vertices[i][1] > 0.0 { 0.0 } else { 1.0 };
                assert_eq!(cube.tex_coords[i][1], expected_v);
            }
        }
    }

    #[test]
    fn test_cube_face_single_quad() {
        for face in CubeFace::ALL {
            let quad = generate_cube_face(face);
            assert_eq!(quad.vertex_count(), 4);
            assert_eq!(quad.indices, vec![0, 1, 2, 2, 3, 0]);
            let n = face_normal(&quad, &quad.indices[0..3]).normalize();
            assert!(n.dot(Vector3::from(face.normal())) > 0.99);
        }
    }

    #[test]
    fn test_door_halves_stack() {
        let lower = generate_door_half(DoorHalf::Lower);
        let upper = generate_door_half(DoorHalf::Upper);
        let max_y = |g: &GeometryData| g.vertices.iter().map(|v| v[1]).fold(f32::MIN, f32::max);
        let min_y = |g: &GeometryData| g.vertices.iter().map(|v| v[1]).fold(f32::MAX, f32::min);
        assert_eq!(min_y(&lower), 0.0);
        assert_eq!(max_y(&lower), DOOR_MID_HEIGHT);
        assert_eq!(min_y(&upper), DOOR_MID_HEIGHT);
        assert!((max_y(&upper) - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_pane_is_thin() {
        let pane = generate_pane(0.2);
        let depth = pane.vertices.iter().map(|v| v[2].abs()).fold(0.0, f32::max);
        assert!((depth - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_flower_cross_extent() {
        let flower = generate_flower_cross(0.1);
        assert_eq!(flower.vertex_count(), 8);
        assert_eq!(flower.triangle_count(), 4);
        let top = flower.vertices.iter().map(|v| v[1]).fold(f32::MIN, f32::max);
        let bottom = flower.vertices.iter().map(|v| v[1]).fold(f32::MAX, f32::min);
        assert!((top - 0.01).abs() < 1e-6);
        assert!((bottom + 0.29).abs() < 1e-6);
    }
}
