//! Procedural hill: a closed solid whose height falls off along x as
//! `height * (1 - t^exponent)` and stays constant along z.
//!
//! The mesh is made of a top surface grid, a flat bottom cap and four walls,
//! each with its own vertices so that every part keeps flat, outward normals.

use super::GeometryData;

/// Texture coordinates are scaled so one tile spans `0.64 / square_size` units
const TILE_SCALE: f32 = 0.64;

/// Parameters for [`generate_hill`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HillParams {
    /// Side length of the square footprint
    pub base_size: f32,
    /// Height at the summit edge (t = 0)
    pub height: f32,
    /// Grid cells along each axis
    pub segments: u32,
    /// Falloff exponent of the height profile
    pub exponent: f32,
    /// Texture tile size multiplier
    pub square_size: f32,
}

impl Default for HillParams {
    fn default() -> Self {
        Self {
            base_size: 4.0,
            height: 1.0,
            segments: 16,
            exponent: 3.0,
            square_size: 1.0,
        }
    }
}

impl HillParams {
    /// Height of the profile at `t` in `[0, 1]`
    pub fn profile(&self, t: f32) -> f32 {
        self.height * (1.0 - t.powf(self.exponent))
    }

    /// Surface normal of the profile at `t`.
    ///
    /// At `t = 0` the slope is replaced by a sentinel so the summit edge
    /// shades like the vertical end cap.
    pub fn profile_normal(&self, t: f32) -> [f32; 3] {
        if t <= 0.0 {
            return [-1.0, 0.0, 0.0];
        }
        let slope =
            -self.height * self.exponent / self.base_size * t.powf(self.exponent - 1.0);
        normalize([-slope, 1.0, 0.0])
    }

    fn tiling(&self) -> f32 {
        self.square_size / TILE_SCALE
    }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / len, v[1] / len, v[2] / len]
}

/// Emits the two triangles of every cell of a `(segments+1)²` vertex grid
/// starting at `base`.
fn push_grid_indices(data: &mut GeometryData, base: u32, segments: u32) {
    let row = segments + 1;
    for i in 0..segments {
        for j in 0..segments {
            let a = base + i * row + j;
            let b = base + (i + 1) * row + j;
            data.indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
}

/// Generates the hill mesh.
///
/// Sections: `top`, `bottom`, `wall_-z`, `wall_+z`, `wall_-x`, `wall_+x`.
/// The `wall_+x` cap lies at zero height and is degenerate; it is kept so the
/// vertex layout does not depend on the exponent.
pub fn generate_hill(params: &HillParams) -> GeometryData {
    let n = params.segments.max(1);
    let size = params.base_size;
    let half = size * 0.5;
    let tiling = params.tiling();
    let step = |k: u32| k as f32 / n as f32;
    let coord = |k: u32| -half + step(k) * size;

    let mut data = GeometryData::new();

    // Top surface, one row per z so the shared pattern winds upward
    let top_base = data.vertex_count() as u32;
    for i in 0..=n {
        for j in 0..=n {
            let t = step(j);
            data.push_vertex(
                [coord(j), params.profile(t), coord(i)],
                params.profile_normal(t),
                [j as f32 * tiling, i as f32 * tiling],
            );
        }
    }
    let start = data.indices.len();
    push_grid_indices(&mut data, top_base, n);
    data.mark_section("top", start);

    // Bottom cap, one row per x so the same pattern winds downward
    let bottom_base = data.vertex_count() as u32;
    for i in 0..=n {
        for j in 0..=n {
            data.push_vertex(
                [coord(i), 0.0, coord(j)],
                [0.0, -1.0, 0.0],
                [i as f32 * tiling, j as f32 * tiling],
            );
        }
    }
    let start = data.indices.len();
    push_grid_indices(&mut data, bottom_base, n);
    data.mark_section("bottom", start);

    let cell = size / n as f32;
    let v_of = |y: f32| y / cell * tiling;

    // Side walls trace the profile
    let start = data.indices.len();
    for k in 0..n {
        let (x0, x1) = (coord(k), coord(k + 1));
        let (y0, y1) = (params.profile(step(k)), params.profile(step(k + 1)));
        let (u0, u1) = (k as f32 * tiling, (k + 1) as f32 * tiling);
        data.push_quad(
            [[x1, 0.0, -half], [x0, 0.0, -half], [x0, y0, -half], [x1, y1, -half]],
            [0.0, 0.0, -1.0],
            [[u1, 0.0], [u0, 0.0], [u0, v_of(y0)], [u1, v_of(y1)]],
        );
    }
    data.mark_section("wall_-z", start);

    let start = data.indices.len();
    for k in 0..n {
        let (x0, x1) = (coord(k), coord(k + 1));
        let (y0, y1) = (params.profile(step(k)), params.profile(step(k + 1)));
        let (u0, u1) = (k as f32 * tiling, (k + 1) as f32 * tiling);
        data.push_quad(
            [[x0, 0.0, half], [x1, 0.0, half], [x1, y1, half], [x0, y0, half]],
            [0.0, 0.0, 1.0],
            [[u0, 0.0], [u1, 0.0], [u1, v_of(y1)], [u0, v_of(y0)]],
        );
    }
    data.mark_section("wall_+z", start);

    // End caps span the summit height and the zero-height edge
    let summit = params.profile(0.0);
    let start = data.indices.len();
    for k in 0..n {
        let (z0, z1) = (coord(k), coord(k + 1));
        let (u0, u1) = (k as f32 * tiling, (k + 1) as f32 * tiling);
        data.push_quad(
            [[-half, 0.0, z0], [-half, 0.0, z1], [-half, summit, z1], [-half, summit, z0]],
            [-1.0, 0.0, 0.0],
            [[u0, 0.0], [u1, 0.0], [u1, v_of(summit)], [u0, v_of(summit)]],
        );
    }
    data.mark_section("wall_-x", start);

    let foot = params.profile(1.0);
    let start = data.indices.len();
    for k in 0..n {
        let (z0, z1) = (coord(k), coord(k + 1));
        let (u0, u1) = (k as f32 * tiling, (k + 1) as f32 * tiling);
        data.push_quad(
            [[half, 0.0, z1], [half, 0.0, z0], [half, foot, z0], [half, foot, z1]],
            [1.0, 0.0, 0.0],
            [[u1, 0.0], [u0, 0.0], [u0, v_of(foot)], [u1, v_of(foot)]],
        );
    }
    data.mark_section("wall_+x", start);

    data
}
