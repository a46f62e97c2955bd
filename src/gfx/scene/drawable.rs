//! Drawable catalog
//!
//! Every kind of thing the scene can draw is described once by a
//! [`DrawableConfig`]: which mesh to build, which textures to bind, which
//! shader family to run and whether it takes part in the shadow pass. The
//! renderer turns each config into GPU resources; placements refer to them
//! by [`DrawableId`].

use crate::gfx::geometry::{
    generate_block, generate_cube_face, generate_door_half, generate_flower_cross,
    generate_pane, generate_unit_cube,
    hill::{generate_hill, HillParams},
    smooth_pyramid::{generate_smooth_pyramid, PyramidParams},
    CubeFace, DoorHalf, GeometryData,
};

/// Half-size of a voxel block; blocks sit on a grid of twice this
pub const BLOCK_HALF_SIZE: f32 = 0.2;
const PANE_SIZE: f32 = 0.2;
const FLOWER_SIZE: f32 = 0.1;

/// Index into the drawable catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableId(pub usize);

/// Shader family a drawable is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderVariant {
    /// Lit, shadowed voxel block with per-face textures and edge outline
    Block,
    /// Lit, shadowed tiled ground with a per-tile outline
    Terrain,
    /// Untextured Phong surface colored per instance
    SolidPhong,
    /// Texture times instance color, no lighting
    Unlit,
}

impl ShaderVariant {
    pub const ALL: [ShaderVariant; 4] = [
        ShaderVariant::Block,
        ShaderVariant::Terrain,
        ShaderVariant::SolidPhong,
        ShaderVariant::Unlit,
    ];
}

/// Textures bound to a drawable, relative to the texture directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSet {
    None,
    Single(&'static str),
    Faces {
        top: &'static str,
        side: &'static str,
        bottom: &'static str,
    },
}

impl TextureSet {
    /// Texture for the top, side and bottom slots
    pub fn slots(&self) -> Option<[&'static str; 3]> {
        match *self {
            TextureSet::None => None,
            TextureSet::Single(path) => Some([path; 3]),
            TextureSet::Faces { top, side, bottom } => Some([top, side, bottom]),
        }
    }

    /// Each distinct file once, in slot order
    pub fn unique_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::new();
        for path in self.slots().into_iter().flatten() {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }
}

/// Mesh recipe
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshKind {
    Block { half_size: f32 },
    Pane { size: f32 },
    DoorHalf(DoorHalf),
    FlowerCross { size: f32 },
    CubeFace(CubeFace),
    UnitCube,
    Hill(HillParams),
    SmoothPyramid(PyramidParams),
}

impl MeshKind {
    pub fn build(&self) -> GeometryData {
        match *self {
            MeshKind::Block { half_size } => generate_block(half_size),
            MeshKind::Pane { size } => generate_pane(size),
            MeshKind::DoorHalf(half) => generate_door_half(half),
            MeshKind::FlowerCross { size } => generate_flower_cross(size),
            MeshKind::CubeFace(face) => generate_cube_face(face),
            MeshKind::UnitCube => generate_unit_cube(),
            MeshKind::Hill(params) => generate_hill(&params),
            MeshKind::SmoothPyramid(params) => generate_smooth_pyramid(&params),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawableConfig {
    pub label: &'static str,
    pub mesh: MeshKind,
    pub textures: TextureSet,
    /// Discard texels with alpha below the cutout threshold
    pub cutout: bool,
    pub shader: ShaderVariant,
    pub casts_shadow: bool,
}

/// Drawables making up the robot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotDrawables {
    /// One per head face, in `CubeFace::ALL` order
    pub head: [DrawableId; 6],
    pub overlay: DrawableId,
    pub body: DrawableId,
}

impl RobotDrawables {
    pub fn head_face(&self, face: CubeFace) -> DrawableId {
        let index = CubeFace::ALL
            .iter()
            .position(|f| *f == face)
            .unwrap_or_default();
        self.head[index]
    }
}

/// Named handles into the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneDrawables {
    pub grass: DrawableId,
    pub log: DrawableId,
    pub leaves: DrawableId,
    pub planks: DrawableId,
    pub glass: DrawableId,
    pub door_lower: DrawableId,
    pub door_upper: DrawableId,
    pub flowers: [DrawableId; 5],
    pub hill: DrawableId,
    pub pyramid: DrawableId,
    pub robot: RobotDrawables,
}

/// Parameters of the hill drawable
pub const HILL_PARAMS: HillParams = HillParams {
    base_size: 4.0,
    height: 1.0,
    segments: 16,
    exponent: 3.0,
    square_size: 1.0,
};

const FLOWER_TEXTURES: [&str; 5] = [
    "flower_blue_orchid.png",
    "flower_dandelion.png",
    "flower_tulip_white.png",
    "flower_oxeye_daisy.png",
    "flower_rose.png",
];

fn head_texture(face: CubeFace) -> &'static str {
    match face {
        CubeFace::NegZ => "skin/head_front.png",
        CubeFace::PosZ => "skin/head_back.png",
        CubeFace::NegX => "skin/head_left.png",
        CubeFace::PosX => "skin/head_right.png",
        CubeFace::PosY => "skin/head_top.png",
        CubeFace::NegY => "skin/head_bottom.png",
    }
}

struct CatalogBuilder {
    configs: Vec<DrawableConfig>,
}

impl CatalogBuilder {
    fn add(&mut self, config: DrawableConfig) -> DrawableId {
        self.configs.push(config);
        DrawableId(self.configs.len() - 1)
    }

    fn block(&mut self, label: &'static str, textures: TextureSet, cutout: bool) -> DrawableId {
        self.add(DrawableConfig {
            label,
            mesh: MeshKind::Block {
                half_size: BLOCK_HALF_SIZE,
            },
            textures,
            cutout,
            shader: ShaderVariant::Block,
            casts_shadow: true,
        })
    }

    fn unlit(
        &mut self,
        label: &'static str,
        mesh: MeshKind,
        textures: TextureSet,
        casts_shadow: bool,
    ) -> DrawableId {
        self.add(DrawableConfig {
            label,
            mesh,
            textures,
            cutout: true,
            shader: ShaderVariant::Unlit,
            casts_shadow,
        })
    }
}

/// Builds every drawable the scene uses
pub fn build_catalog() -> (Vec<DrawableConfig>, SceneDrawables) {
    let mut builder = CatalogBuilder {
        configs: Vec::new(),
    };

    let grass = builder.block(
        "grass",
        TextureSet::Faces {
            top: "grass_carried.png",
            side: "grass_side_carried.png",
            bottom: "dirt.png",
        },
        false,
    );
    let log = builder.block(
        "oak log",
        TextureSet::Faces {
            top: "log_oak_top.png",
            side: "log_oak.png",
            bottom: "log_oak_top.png",
        },
        false,
    );
    let leaves = builder.block("leaves", TextureSet::Single("azalea_leaves.png"), true);
    let planks = builder.block("stairs", TextureSet::Single("planks_oak.png"), false);
    let glass = builder.add(DrawableConfig {
        label: "glass",
        mesh: MeshKind::Pane { size: PANE_SIZE },
        textures: TextureSet::Single("glass.png"),
        cutout: true,
        shader: ShaderVariant::Block,
        casts_shadow: true,
    });

    let door_lower = builder.unlit(
        "door lower",
        MeshKind::DoorHalf(DoorHalf::Lower),
        TextureSet::Single("door_wood_lower.png"),
        true,
    );
    let door_upper = builder.unlit(
        "door upper",
        MeshKind::DoorHalf(DoorHalf::Upper),
        TextureSet::Single("door_wood_upper.png"),
        true,
    );

    let flowers = FLOWER_TEXTURES.map(|texture| {
        builder.unlit(
            "flower",
            MeshKind::FlowerCross { size: FLOWER_SIZE },
            TextureSet::Single(texture),
            true,
        )
    });

    let hill = builder.add(DrawableConfig {
        label: "hill",
        mesh: MeshKind::Hill(HILL_PARAMS),
        textures: TextureSet::Single("grass_carried.png"),
        cutout: false,
        shader: ShaderVariant::Terrain,
        casts_shadow: false,
    });
    let pyramid = builder.add(DrawableConfig {
        label: "pyramid",
        mesh: MeshKind::SmoothPyramid(PyramidParams::default()),
        textures: TextureSet::None,
        cutout: false,
        shader: ShaderVariant::SolidPhong,
        casts_shadow: true,
    });

    let head = CubeFace::ALL.map(|face| {
        builder.unlit(
            "robot head",
            MeshKind::CubeFace(face),
            TextureSet::Single(head_texture(face)),
            false,
        )
    });
    let overlay = builder.unlit(
        "robot eyebrows",
        MeshKind::CubeFace(crate::gfx::scene::robot::FACE_SIDE),
        TextureSet::Single("skin/head_eyebrows.png"),
        false,
    );
    let body = builder.unlit("robot body", MeshKind::UnitCube, TextureSet::None, false);

    let ids = SceneDrawables {
        grass,
        log,
        leaves,
        planks,
        glass,
        door_lower,
        door_upper,
        flowers,
        hill,
        pyramid,
        robot: RobotDrawables {
            head,
            overlay,
            body,
        },
    };
    (builder.configs, ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_index_their_configs() {
        let (configs, ids) = build_catalog();
        assert_eq!(configs.len(), 7 + 5 + 2 + 8);
        assert_eq!(configs[ids.grass.0].label, "grass");
        assert_eq!(configs[ids.hill.0].shader, ShaderVariant::Terrain);
        assert_eq!(configs[ids.pyramid.0].shader, ShaderVariant::SolidPhong);
        assert_eq!(configs[ids.glass.0].mesh, MeshKind::Pane { size: PANE_SIZE });
        for id in ids.flowers {
            assert!(configs[id.0].cutout);
            assert_eq!(configs[id.0].shader, ShaderVariant::Unlit);
        }
    }

    #[test]
    fn test_robot_draws_unshadowed() {
        let (configs, ids) = build_catalog();
        let robot = ids.robot;
        for id in robot.head.iter().chain([&robot.overlay, &robot.body]) {
            assert!(!configs[id.0].casts_shadow);
            assert_eq!(configs[id.0].shader, ShaderVariant::Unlit);
        }
        assert_eq!(
            configs[robot.head_face(CubeFace::NegZ).0].textures,
            TextureSet::Single("skin/head_front.png")
        );
        assert_eq!(
            configs[robot.overlay.0].mesh,
            MeshKind::CubeFace(CubeFace::NegZ)
        );
    }

    #[test]
    fn test_leaves_cast_cutout_shadows() {
        let (configs, ids) = build_catalog();
        let leaves = &configs[ids.leaves.0];
        assert!(leaves.cutout && leaves.casts_shadow);
    }

    #[test]
    fn test_texture_paths_are_deduplicated() {
        let log = TextureSet::Faces {
            top: "log_oak_top.png",
            side: "log_oak.png",
            bottom: "log_oak_top.png",
        };
        assert_eq!(log.unique_paths(), vec!["log_oak_top.png", "log_oak.png"]);
        assert_eq!(TextureSet::Single("a.png").unique_paths(), vec!["a.png"]);
        assert!(TextureSet::None.unique_paths().is_empty());
        assert_eq!(TextureSet::Single("a.png").slots(), Some(["a.png"; 3]));
    }

    #[test]
    fn test_catalog_uses_every_mesh_kind() {
        let (configs, _) = build_catalog();
        let used = |matches: fn(&MeshKind) -> bool| configs.iter().any(|c| matches(&c.mesh));
        assert!(used(|m| matches!(m, MeshKind::Block { .. })));
        assert!(used(|m| matches!(m, MeshKind::Pane { .. })));
        assert!(used(|m| matches!(m, MeshKind::DoorHalf(_))));
        assert!(used(|m| matches!(m, MeshKind::FlowerCross { .. })));
        assert!(used(|m| matches!(m, MeshKind::CubeFace(_))));
        assert!(used(|m| matches!(m, MeshKind::UnitCube)));
        assert!(used(|m| matches!(m, MeshKind::Hill(_))));
        assert!(used(|m| matches!(m, MeshKind::SmoothPyramid(_))));
    }

    #[test]
    fn test_every_mesh_kind_builds_triangles() {
        let (configs, _) = build_catalog();
        for config in &configs {
            let mesh = config.mesh.build();
            assert!(mesh.triangle_count() > 0, "{} is empty", config.label);
            assert_eq!(mesh.indices.len() % 3, 0);
        }
    }
}
