//! Directional-light shadow mapping: light-space projection and the
//! percentage-closer filter.
//!
//! [`pcf_shadow`] mirrors the filter in the scene shader so its behaviour can
//! be checked without a GPU.

use cgmath::{ortho, EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3, Vector4};

use crate::gfx::camera::camera_utils::OPENGL_TO_WGPU_MATRIX;
use crate::gfx::resources::global_bindings::LightConfig;

/// Shadow map resolution, filter and light frustum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSettings {
    /// Width and height of the square depth target
    pub map_size: u32,
    /// Subtracted from the fragment depth before comparing
    pub bias: f32,
    /// Filter radius in texels; 1 gives a 3x3 kernel
    pub pcf_radius: u32,
    /// Distance from the origin to the light eye, against the light direction
    pub distance: f32,
    /// Half-width of the orthographic light frustum
    pub extent: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            map_size: 1024,
            bias: 0.005,
            pcf_radius: 1,
            distance: 20.0,
            extent: 20.0,
            near: 1.0,
            far: 50.0,
        }
    }
}

/// Orthographic light view-projection looking along the sun direction at the
/// origin, with wgpu depth range.
pub fn light_space_matrix(light: &LightConfig, settings: &ShadowSettings) -> Matrix4<f32> {
    let direction = Vector3::from(light.sun_direction).normalize();
    let eye = Point3::from_vec(-direction * settings.distance);
    let up = if direction.y.abs() > 0.99 {
        Vector3::unit_z()
    } else {
        Vector3::unit_y()
    };
    let view = Matrix4::look_at_rh(eye, Point3::origin(), up);
    let e = settings.extent;
    let projection = OPENGL_TO_WGPU_MATRIX * ortho(-e, e, -e, e, settings.near, settings.far);
    projection * view
}

/// Projects a world position into shadow-map space: `(u, v, depth)` with
/// `v = 0` on the top row of the map.
pub fn shadow_coords(light_space: Matrix4<f32>, world: Vector3<f32>) -> Vector3<f32> {
    let clip: Vector4<f32> = light_space * world.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    Vector3::new(ndc.x * 0.5 + 0.5, -ndc.y * 0.5 + 0.5, ndc.z)
}

/// Fraction of filter taps that see an occluder, in `[0, 1]`.
///
/// `closest_depth(x, y)` returns the stored depth of texel `(x, y)`. Taps
/// that fall outside the map count as unoccluded, and fragments beyond the
/// far plane (`depth > 1`) are never shadowed.
pub fn pcf_shadow<F>(coords: Vector3<f32>, settings: &ShadowSettings, closest_depth: F) -> f32
where
    F: Fn(i32, i32) -> f32,
{
    if coords.z > 1.0 {
        return 0.0;
    }

    let size = settings.map_size as i32;
    let radius = settings.pcf_radius as i32;
    let center_x = (coords.x * size as f32).floor() as i32;
    let center_y = (coords.y * size as f32).floor() as i32;
    let current = coords.z - settings.bias;

    let mut occluded = 0u32;
    let mut taps = 0u32;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            taps += 1;
            let (x, y) = (center_x + dx, center_y + dy);
            if x < 0 || y < 0 || x >= size || y >= size {
                continue;
            }
            if current > closest_depth(x, y) {
                occluded += 1;
            }
        }
    }

    occluded as f32 / taps as f32
}
