//! Rounded pyramid: a surface of revolution whose profile is a Catmull-Rom
//! segment running from the apex down to the base rim.

use std::f32::consts::TAU;

use super::GeometryData;

/// Parameters for [`generate_smooth_pyramid`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PyramidParams {
    pub height: f32,
    pub radius: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
}

impl Default for PyramidParams {
    fn default() -> Self {
        Self {
            height: 1.2,
            radius: 0.6,
            radial_segments: 24,
            height_segments: 12,
        }
    }
}

type Point2 = [f32; 2];

/// Uniform Catmull-Rom interpolation between `p1` and `p2`
pub fn catmull_rom(p0: Point2, p1: Point2, p2: Point2, p3: Point2, t: f32) -> Point2 {
    let t2 = t * t;
    let t3 = t2 * t;
    let axis = |k: usize| {
        0.5 * ((2.0 * p1[k])
            + (-p0[k] + p2[k]) * t
            + (2.0 * p0[k] - 5.0 * p1[k] + 4.0 * p2[k] - p3[k]) * t2
            + (-p0[k] + 3.0 * p1[k] - 3.0 * p2[k] + p3[k]) * t3)
    };
    [axis(0), axis(1)]
}

/// Derivative of [`catmull_rom`] with respect to `t`
fn catmull_rom_tangent(p0: Point2, p1: Point2, p2: Point2, p3: Point2, t: f32) -> Point2 {
    let t2 = t * t;
    let axis = |k: usize| {
        0.5 * ((-p0[k] + p2[k])
            + 2.0 * (2.0 * p0[k] - 5.0 * p1[k] + 4.0 * p2[k] - p3[k]) * t
            + 3.0 * (-p0[k] + 3.0 * p1[k] - 3.0 * p2[k] + p3[k]) * t2)
    };
    [axis(0), axis(1)]
}

/// Generates the pyramid surface. The base is left open; the shape sits on
/// the ground.
pub fn generate_smooth_pyramid(params: &PyramidParams) -> GeometryData {
    let rs = params.radial_segments.max(3);
    let hs = params.height_segments.max(1);

    // (radius, height) control points; endpoints doubled so the curve
    // starts exactly at the apex and ends exactly on the rim
    let apex = [0.0, params.height];
    let rim = [params.radius, 0.0];
    let controls = [apex, apex, rim, rim];

    let mut data = GeometryData::new();
    for y in 0..=hs {
        let t = y as f32 / hs as f32;
        let [r, height] = catmull_rom(controls[0], controls[1], controls[2], controls[3], t);
        let [dr, dh] = catmull_rom_tangent(controls[0], controls[1], controls[2], controls[3], t);
        // Profile normal: tangent rotated a quarter turn away from the axis
        let len = (dr * dr + dh * dh).sqrt();
        let (n_radial, n_up) = (-dh / len, dr / len);

        for i in 0..=rs {
            let angle = i as f32 / rs as f32 * TAU;
            let (sin, cos) = angle.sin_cos();
            data.push_vertex(
                [r * cos, height, r * sin],
                [n_radial * cos, n_up, n_radial * sin],
                [i as f32 / rs as f32, t],
            );
        }
    }

    let row = rs + 1;
    for y in 0..hs {
        for i in 0..rs {
            let a = y * row + i;
            let b = a + row;
            data.indices
                .extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::test_util::{face_centroid, face_normal};
    use cgmath::{InnerSpace, Vector3};

    #[test]
    fn test_catmull_rom_endpoints() {
        let p = [[0.0, 0.0], [1.0, 2.0], [3.0, 1.0], [4.0, 4.0]];
        assert_eq!(catmull_rom(p[0], p[1], p[2], p[3], 0.0), p[1]);
        let end = catmull_rom(p[0], p[1], p[2], p[3], 1.0);
        assert!((end[0] - 3.0).abs() < 1e-6 && (end[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pyramid_counts() {
        let params = PyramidParams::default();
        let pyramid = generate_smooth_pyramid(&params);
        assert_eq!(pyramid.vertex_count(), 13 * 25);
        assert_eq!(pyramid.indices.len(), 12 * 24 * 6);
    }

    #[test]
    fn test_pyramid_apex_and_rim() {
        let params = PyramidParams::default();
        let pyramid = generate_smooth_pyramid(&params);
        let apex = pyramid.vertices[0];
        assert!((apex[1] - params.height).abs() < 1e-6);
        assert!(apex[0].abs() < 1e-6 && apex[2].abs() < 1e-6);

        let rim = pyramid.vertices[pyramid.vertex_count() - 25];
        assert!(rim[1].abs() < 1e-6);
        assert!((rim[0] - params.radius).abs() < 1e-6);
    }

    #[test]
    fn test_pyramid_faces_point_outward() {
        let pyramid = generate_smooth_pyramid(&PyramidParams::default());
        for tri in pyramid.indices.chunks(3) {
            let normal = face_normal(&pyramid, tri);
            if normal.magnitude() < 1e-7 {
                continue;
            }
            let center = face_centroid(&pyramid, tri);
            let radial = Vector3::new(center.x, 0.0, center.z);
            assert!(normal.dot(radial) > 0.0, "triangle {:?} faces inward", tri);
            assert!(normal.y > 0.0);
        }
    }

    #[test]
    fn test_pyramid_normals_are_unit_and_upward() {
        let pyramid = generate_smooth_pyramid(&PyramidParams::default());
        for n in &pyramid.normals {
            let n = Vector3::from(*n);
            assert!((n.magnitude() - 1.0).abs() < 1e-5);
            assert!(n.y > 0.0);
        }
    }
}
