//! WGSL sources for the shadow and color passes
//!
//! Both modules share the global uniform block, the vertex/instance inputs and
//! the material bindings. Each [`ShaderVariant`](crate::gfx::scene::drawable::ShaderVariant)
//! maps to one fragment entry point of [`SCENE_SHADER`].
//!
//! The fragment thresholds live in Rust and are prepended to every module by
//! [`scene_shader_source`] and [`shadow_shader_source`]. [`face_texture`] and
//! [`block_texel`] mirror the per-texel decisions of `fs_block` and
//! `fs_terrain` so they can be tested without a GPU.

/// Texels with a lower alpha are discarded
pub const CUTOUT_ALPHA: f32 = 0.1;

/// A normal whose y component exceeds this (or lies below its negation)
/// samples the top (or bottom) texture instead of the side one
pub const FACE_SELECT_Y: f32 = 0.9;

/// Texture slot a block face samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceTexture {
    Top,
    Side,
    Bottom,
}

pub fn face_texture(normal_y: f32) -> FaceTexture {
    if normal_y > FACE_SELECT_Y {
        FaceTexture::Top
    } else if normal_y < -FACE_SELECT_Y {
        FaceTexture::Bottom
    } else {
        FaceTexture::Side
    }
}

pub fn is_cut_out(alpha: f32) -> bool {
    alpha < CUTOUT_ALPHA
}

/// True within `width` of any border of the unit uv square
pub fn on_edge(uv: [f32; 2], width: f32) -> bool {
    uv.iter().any(|&c| c < width || c > 1.0 - width)
}

/// Terrain uvs tile, so the outline repeats on every unit cell
pub fn on_terrain_edge(uv: [f32; 2], width: f32) -> bool {
    // WGSL fract is x - floor(x), also for negative x
    on_edge(uv.map(|c| c - c.floor()), width)
}

/// What `fs_block` writes for one texel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTexel {
    Outline,
    Discarded,
    Shaded,
}

/// Edge texels are outlined even where the texture is cut out
pub fn block_texel(alpha: f32, uv: [f32; 2], outline_width: f32) -> BlockTexel {
    if on_edge(uv, outline_width) {
        BlockTexel::Outline
    } else if is_cut_out(alpha) {
        BlockTexel::Discarded
    } else {
        BlockTexel::Shaded
    }
}

fn shared_constants() -> String {
    format!(
        "const CUTOUT_ALPHA: f32 = {:?};\nconst FACE_SELECT_Y: f32 = {:?};\n",
        CUTOUT_ALPHA, FACE_SELECT_Y
    )
}

/// Declarations shared by every module
pub const COMMON: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    light_view_proj: mat4x4<f32>,
    view_position: vec4<f32>,
    light_direction: vec4<f32>,
    light_color: vec4<f32>,
    fill_position: vec4<f32>,
    fill_color: vec4<f32>,
    // x = bias, y = pcf radius, z = map size, w = outline width
    shadow_params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(1) @binding(0)
var tex_top: texture_2d<f32>;
@group(1) @binding(1)
var tex_side: texture_2d<f32>;
@group(1) @binding(2)
var tex_bottom: texture_2d<f32>;
@group(1) @binding(3)
var tex_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) tex_coords: vec2<f32>,
};

struct InstanceInput {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
    @location(7) color: vec4<f32>,
};

fn instance_model(instance: InstanceInput) -> mat4x4<f32> {
    return mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
}
"#;

/// Color pass: lit, shadowed and unlit variants
pub const SCENE_SHADER: &str = r#"
@group(2) @binding(0)
var shadow_map: texture_depth_2d;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) tex_coords: vec2<f32>,
    @location(3) light_space: vec4<f32>,
    @location(4) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = instance_model(instance);
    let world = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = globals.view_proj * world;
    out.world_position = world.xyz;
    out.world_normal = normalize((model * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.tex_coords = vertex.tex_coords;
    out.light_space = globals.light_view_proj * world;
    out.color = instance.color;
    return out;
}

// Fraction of PCF taps that see an occluder. Taps outside the map are lit.
fn shadow_factor(light_space: vec4<f32>) -> f32 {
    let ndc = light_space.xyz / light_space.w;
    if (ndc.z > 1.0) {
        return 0.0;
    }

    let bias = globals.shadow_params.x;
    let radius = i32(globals.shadow_params.y);
    let size = i32(globals.shadow_params.z);
    let uv = vec2<f32>(ndc.x * 0.5 + 0.5, -ndc.y * 0.5 + 0.5);
    let center = vec2<i32>(floor(uv * f32(size)));
    let current = ndc.z - bias;

    var occluded = 0.0;
    var taps = 0.0;
    for (var dy = -radius; dy <= radius; dy++) {
        for (var dx = -radius; dx <= radius; dx++) {
            taps += 1.0;
            let texel = center + vec2<i32>(dx, dy);
            if (texel.x < 0 || texel.y < 0 || texel.x >= size || texel.y >= size) {
                continue;
            }
            if (current > textureLoad(shadow_map, texel, 0)) {
                occluded += 1.0;
            }
        }
    }
    return occluded / max(taps, 1.0);
}

fn phong(n: vec3<f32>, light_dir: vec3<f32>, view_dir: vec3<f32>, color: vec3<f32>) -> vec3<f32> {
    let diffuse = max(dot(n, light_dir), 0.0);
    let reflected = reflect(-light_dir, n);
    let specular = pow(max(dot(view_dir, reflected), 0.0), 32.0);
    return (diffuse + specular) * color;
}

fn shade(base: vec3<f32>, n: vec3<f32>, in: VertexOutput, ambient: f32) -> vec3<f32> {
    let view_dir = normalize(globals.view_position.xyz - in.world_position);
    let sun_dir = normalize(-globals.light_direction.xyz);
    let shadow = shadow_factor(in.light_space);

    let sun = phong(n, sun_dir, view_dir, globals.light_color.rgb);
    var light = ambient * globals.light_color.rgb + (1.0 - shadow) * sun;

    let fill_dir = normalize(globals.fill_position.xyz - in.world_position);
    light += globals.fill_color.a * phong(n, fill_dir, view_dir, globals.fill_color.rgb);
    return base * light;
}

fn on_edge(uv: vec2<f32>, width: f32) -> bool {
    return uv.x < width || uv.x > 1.0 - width || uv.y < width || uv.y > 1.0 - width;
}

@fragment
fn fs_block(in: VertexOutput) -> @location(0) vec4<f32> {
    let top = textureSample(tex_top, tex_sampler, in.tex_coords);
    let side = textureSample(tex_side, tex_sampler, in.tex_coords);
    let bottom = textureSample(tex_bottom, tex_sampler, in.tex_coords);

    let n = normalize(in.world_normal);
    var base = side;
    if (n.y > FACE_SELECT_Y) {
        base = top;
    } else if (n.y < -FACE_SELECT_Y) {
        base = bottom;
    }
    if (on_edge(in.tex_coords, globals.shadow_params.w)) {
        return vec4<f32>(0.0, 0.0, 0.0, 1.0);
    }
    if (base.a < CUTOUT_ALPHA) {
        discard;
    }

    return vec4<f32>(shade(base.rgb * in.color.rgb, n, in, 0.2), 1.0);
}

@fragment
fn fs_terrain(in: VertexOutput) -> @location(0) vec4<f32> {
    let base = textureSample(tex_top, tex_sampler, in.tex_coords);
    if (on_edge(fract(in.tex_coords), globals.shadow_params.w)) {
        return vec4<f32>(0.0, 0.0, 0.0, 1.0);
    }
    let n = normalize(in.world_normal);
    return vec4<f32>(shade(base.rgb * in.color.rgb, n, in, 0.1), 1.0);
}

@fragment
fn fs_solid(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let view_dir = normalize(globals.view_position.xyz - in.world_position);
    let sun_dir = normalize(-globals.light_direction.xyz);
    let light = 0.1 * globals.light_color.rgb + phong(n, sun_dir, view_dir, globals.light_color.rgb);
    return vec4<f32>(in.color.rgb * light, in.color.a);
}

@fragment
fn fs_unlit(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(tex_side, tex_sampler, in.tex_coords) * in.color;
    if (texel.a < CUTOUT_ALPHA) {
        discard;
    }
    return vec4<f32>(texel.rgb, 1.0);
}
"#;

/// Depth pass from the light's point of view
pub const SHADOW_SHADER: &str = r#"
struct ShadowOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tex_coords: vec2<f32>,
};

@vertex
fn vs_shadow(vertex: VertexInput, instance: InstanceInput) -> ShadowOutput {
    let model = instance_model(instance);
    var out: ShadowOutput;
    out.clip_position = globals.light_view_proj * model * vec4<f32>(vertex.position, 1.0);
    out.tex_coords = vertex.tex_coords;
    return out;
}

@fragment
fn fs_shadow_cutout(in: ShadowOutput) {
    let texel = textureSample(tex_side, tex_sampler, in.tex_coords);
    if (texel.a < CUTOUT_ALPHA) {
        discard;
    }
}
"#;

pub fn scene_shader_source() -> String {
    format!("{}{}{}", shared_constants(), COMMON, SCENE_SHADER)
}

pub fn shadow_shader_source() -> String {
    format!("{}{}{}", shared_constants(), COMMON, SHADOW_SHADER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_declare_every_entry_point() {
        let scene = scene_shader_source();
        for entry in ["vs_main", "fs_block", "fs_terrain", "fs_solid", "fs_unlit"] {
            assert!(scene.contains(&format!("fn {}(", entry)), "missing {}", entry);
        }
        let shadow = shadow_shader_source();
        assert!(shadow.contains("fn vs_shadow("));
        assert!(shadow.contains("fn fs_shadow_cutout("));
        assert!(!shadow.contains("shadow_map"));
    }

    #[test]
    fn test_instance_locations_match_vertex_layout() {
        for location in 0..=7 {
            assert!(COMMON.contains(&format!("@location({})", location)));
        }
    }

    fn validate(name: &str, source: &str) {
        let module = naga::front::wgsl::parse_str(source)
            .unwrap_or_else(|e| panic!("{} shader: {}", name, e.emit_to_string(source)));
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .unwrap_or_else(|e| panic!("{} shader: {:?}", name, e));
    }

    #[test]
    fn test_scene_shader_validates() {
        validate("scene", &scene_shader_source());
    }

    #[test]
    fn test_shadow_shader_validates() {
        validate("shadow", &shadow_shader_source());
    }

    #[test]
    fn test_thresholds_are_injected_once() {
        for source in [scene_shader_source(), shadow_shader_source()] {
            assert_eq!(source.matches("const CUTOUT_ALPHA: f32 = 0.1;").count(), 1);
            assert_eq!(source.matches("const FACE_SELECT_Y: f32 = 0.9;").count(), 1);
        }
        assert!(!SCENE_SHADER.contains("0.9)"));
    }

    #[test]
    fn test_face_texture_from_normal() {
        assert_eq!(face_texture(1.0), FaceTexture::Top);
        assert_eq!(face_texture(-1.0), FaceTexture::Bottom);
        assert_eq!(face_texture(0.0), FaceTexture::Side);
        assert_eq!(face_texture(FACE_SELECT_Y), FaceTexture::Side);
        assert_eq!(face_texture(0.7), FaceTexture::Side);
        assert_eq!(face_texture(-0.95), FaceTexture::Bottom);
    }

    #[test]
    fn test_cutout_threshold() {
        assert!(is_cut_out(0.0));
        assert!(is_cut_out(0.05));
        assert!(!is_cut_out(CUTOUT_ALPHA));
        assert!(!is_cut_out(1.0));
    }

    #[test]
    fn test_outline_drawn_before_cutout() {
        let width = 0.02;
        assert_eq!(block_texel(0.0, [0.01, 0.5], width), BlockTexel::Outline);
        assert_eq!(block_texel(0.0, [0.5, 0.995], width), BlockTexel::Outline);
        assert_eq!(block_texel(0.0, [0.5, 0.5], width), BlockTexel::Discarded);
        assert_eq!(block_texel(1.0, [0.5, 0.5], width), BlockTexel::Shaded);

        let body = &SCENE_SHADER[SCENE_SHADER.find("fn fs_block(").unwrap()..];
        let body = &body[..body.find("fn fs_terrain(").unwrap()];
        assert!(body.find("on_edge(").unwrap() < body.find("discard").unwrap());
    }

    #[test]
    fn test_terrain_outline_repeats_per_cell() {
        let width = 0.02;
        assert!(on_terrain_edge([3.01, 0.5], width));
        assert!(on_terrain_edge([0.5, 7.99], width));
        assert!(on_terrain_edge([-0.995, 0.5], width));
        assert!(!on_terrain_edge([2.5, 4.5], width));
        assert!(!on_terrain_edge([-1.5, 0.5], width));
    }
}
