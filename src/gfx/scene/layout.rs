//! Fixed world layout
//!
//! The world is a declarative list of [`Placement`]s built once at startup.
//! Everything sits on a grid of 0.4-unit blocks; grid cell `(i, j)` of the
//! 25×25 grass plane is centred at `(i * 0.4 - 4.8, 0, j * 0.4 - 4.8)`.

use cgmath::{Deg, Matrix4, Rad, Vector3};

use super::drawable::{DrawableId, SceneDrawables, HILL_PARAMS};

pub const SPACING: f32 = 0.4;
pub const GRID_SIZE: i32 = 25;
/// Shift that centres the grass plane on the origin
pub const PLANE_OFFSET: f32 = (GRID_SIZE - 1) as f32 * SPACING * 0.5;

const WHITE: [f32; 4] = [1.0; 4];
pub const PYRAMID_COLOR: [f32; 4] = [0.3, 0.8, 0.2, 1.0];

/// (grid x, grid z, trunk height)
const TREES: [(i32, i32, i32); 9] = [
    (2, 2, 7),
    (2, 22, 7),
    (22, 2, 7),
    (22, 22, 7),
    (22, 12, 7),
    (5, -15, 12),
    (10, -5, 10),
    (15, 10, 12),
    (20, -12, 12),
];

/// (grid x, grid z, flower texture)
#[rustfmt::skip]
const FLOWERS: [(i32, i32, usize); 60] = [
    (22, 4, 0), (3, 3, 1), (7, 5, 2), (19, 4, 3), (15, 6, 4), (5, 2, 0), (17, 3, 1), (9, 4, 2), (13, 5, 3), (21, 6, 4),
    (4, 8, 0), (20, 9, 1), (8, 7, 2), (16, 8, 3), (12, 7, 4), (6, 9, 0), (18, 7, 1), (10, 8, 2), (14, 9, 3), (22, 8, 4),
    (3, 15, 0), (21, 16, 1), (7, 17, 2), (19, 15, 3), (15, 16, 4), (5, 18, 0), (17, 19, 1), (9, 20, 2), (13, 18, 3), (21, 20, 4),
    (2, 6, 0), (4, 12, 1), (3, 9, 2), (2, 15, 3), (4, 18, 4), (3, 21, 0), (2, 12, 1), (4, 15, 2), (3, 18, 3), (2, 9, 4),
    (20, 6, 0), (22, 12, 1), (21, 9, 2), (20, 15, 3), (22, 18, 4), (21, 21, 0), (20, 12, 1), (22, 15, 2), (21, 18, 3), (20, 9, 4),
    (8, 22, 0), (16, 22, 1), (12, 21, 2), (14, 20, 3), (10, 19, 4), (6, 20, 0), (18, 21, 1), (11, 22, 2), (15, 19, 3), (7, 21, 4),
];

const HOUSE_CELL: (i32, i32) = (12, 12);
const DOOR_CELL: (i32, i32) = (12, 14);

/// Hill placement before the uniform scale
const HILL_TRANSLATION: [f32; 3] = [0.0, 0.08, -4.0];
pub const HILL_SCALE: f32 = 2.5;
const PYRAMID_Z: f32 = -14.0;

/// Where a placement's model matrix comes from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementTransform {
    Fixed(Matrix4<f32>),
    /// Turned about Y to face the camera every frame
    Billboard { position: Vector3<f32> },
}

/// One drawn instance of a drawable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub drawable: DrawableId,
    pub transform: PlacementTransform,
    pub color: [f32; 4],
}

impl Placement {
    fn fixed(drawable: DrawableId, model: Matrix4<f32>) -> Self {
        Self {
            drawable,
            transform: PlacementTransform::Fixed(model),
            color: WHITE,
        }
    }

    fn at(drawable: DrawableId, position: Vector3<f32>) -> Self {
        Self::fixed(drawable, Matrix4::from_translation(position))
    }

    /// Model matrix for a camera at `eye`
    pub fn model_matrix(&self, eye: Vector3<f32>) -> Matrix4<f32> {
        match self.transform {
            PlacementTransform::Fixed(model) => model,
            PlacementTransform::Billboard { position } => {
                Matrix4::from_translation(position) * billboard_yaw(position, eye)
            }
        }
    }
}

/// Rotation about Y that turns a sprite's +z side toward `eye`
pub fn billboard_yaw(position: Vector3<f32>, eye: Vector3<f32>) -> Matrix4<f32> {
    let to_eye = eye - position;
    Matrix4::from_angle_y(Rad(to_eye.x.atan2(to_eye.z)))
}

/// World position of the centre of grid cell `(i, j)` at height `y`
pub fn grid_position(i: i32, j: i32, y: f32) -> Vector3<f32> {
    Vector3::new(i as f32 * SPACING - PLANE_OFFSET, y, j as f32 * SPACING - PLANE_OFFSET)
}

fn translated_y(position: Vector3<f32>, degrees: f32) -> Matrix4<f32> {
    Matrix4::from_translation(position) * Matrix4::from_angle_y(Deg(degrees))
}

/// Builds the whole world
pub fn build_layout(ids: &SceneDrawables) -> Vec<Placement> {
    let mut placements = Vec::new();
    grass_plane(ids, &mut placements);
    for (x, z, height) in TREES {
        tree(ids, grid_position(x, z, 0.0), height, &mut placements);
    }
    house(ids, &mut placements);
    flowers(ids, &mut placements);
    door(ids, &mut placements);
    placements.push(Placement::fixed(ids.hill, hill_model()));
    placements.push(Placement {
        drawable: ids.pyramid,
        transform: PlacementTransform::Fixed(Matrix4::from_translation(pyramid_position())),
        color: PYRAMID_COLOR,
    });
    placements
}

fn grass_plane(ids: &SceneDrawables, out: &mut Vec<Placement>) {
    let footprint_x = HOUSE_CELL.0 - 1..=HOUSE_CELL.0 + 1;
    let footprint_z = HOUSE_CELL.1 - 1..=HOUSE_CELL.1 + 1;
    for i in 0..GRID_SIZE {
        for j in 0..GRID_SIZE {
            let under_house = footprint_x.contains(&i) && footprint_z.contains(&j);
            if under_house || (i, j) == DOOR_CELL {
                continue;
            }
            out.push(Placement::at(ids.grass, grid_position(i, j, 0.0)));
        }
    }
}

fn tree(ids: &SceneDrawables, base: Vector3<f32>, height: i32, out: &mut Vec<Placement>) {
    for i in 0..height {
        out.push(Placement::at(ids.log, base + Vector3::new(0.0, i as f32 * SPACING, 0.0)));
    }
    let mut leaf_layer = |radius: i32, level: i32| {
        for x in -radius..=radius {
            for z in -radius..=radius {
                let offset = Vector3::new(x as f32 * SPACING, level as f32 * SPACING, z as f32 * SPACING);
                out.push(Placement::at(ids.leaves, base + offset));
            }
        }
    };
    leaf_layer(2, height - 3);
    leaf_layer(2, height - 2);
    leaf_layer(1, height - 1);
    leaf_layer(0, height);
}

fn house(ids: &SceneDrawables, out: &mut Vec<Placement>) {
    let base = grid_position(HOUSE_CELL.0, HOUSE_CELL.1, -0.2);
    let cell = |x: i32, y: f32, z: i32| base + Vector3::new(x as f32 * SPACING, y, z as f32 * SPACING);

    for x in -1..=1 {
        for z in -1..=1 {
            out.push(Placement::at(ids.log, cell(x, 0.2, z)));
        }
    }

    for h in 0..4 {
        let y = h as f32 * SPACING + 0.2;
        for x in -2..=2_i32 {
            for z in -2..=2_i32 {
                let interior = x.abs() < 2 && z.abs() < 2;
                let doorway = x == 0 && z == 2;
                if interior || (doorway && h < 2) {
                    continue;
                }
                let corner = x.abs() == 2 && z.abs() == 2;
                if corner || h != 2 {
                    out.push(Placement::at(ids.log, cell(x, y, z)));
                } else if doorway {
                    continue;
                } else if z.abs() == 2 {
                    out.push(Placement::fixed(ids.glass, translated_y(cell(x, y, z), 180.0)));
                } else {
                    out.push(Placement::fixed(ids.glass, translated_y(cell(x, y, z), 90.0)));
                }
            }
        }
    }

    // Door step
    out.push(Placement::at(ids.log, cell(0, 0.2, 2)));

    let mut roof_height = 3.0 * SPACING + 0.6;
    for ring in [2, 1] {
        for x in -ring..=ring {
            for z in -ring..=ring {
                let degrees = stair_facing(x, z, ring);
                out.push(Placement::fixed(ids.planks, translated_y(cell(x, roof_height, z), degrees)));
            }
        }
        roof_height += SPACING;
    }

    out.push(Placement::at(ids.log, cell(0, roof_height, 0)));
}

/// Yaw that turns a roof stair on the ring of radius `ring` to face outward
fn stair_facing(x: i32, z: i32, ring: i32) -> f32 {
    if z == -ring {
        270.0
    } else if z == ring {
        90.0
    } else if x == ring {
        180.0
    } else {
        0.0
    }
}

/// Deterministic per-flower offset so the rows don't look planted
pub fn flower_jitter(x: i32, z: i32) -> Vector3<f32> {
    let x_off = (((x * 13 + z * 17) % 7) as f32 / 10.0 - 0.35) * SPACING;
    let z_off = (((x * 19 + z * 23) % 7) as f32 / 10.0 - 0.35) * SPACING;
    let y_off = (((x * 29 + z * 31) % 5) as f32 / 10.0) * 0.15;
    Vector3::new(x_off, y_off, z_off)
}

fn flowers(ids: &SceneDrawables, out: &mut Vec<Placement>) {
    for (x, z, texture) in FLOWERS {
        let position = grid_position(x, z, 0.5) + flower_jitter(x, z);
        out.push(Placement {
            drawable: ids.flowers[texture],
            transform: PlacementTransform::Billboard { position },
            color: WHITE,
        });
    }
}

fn door(ids: &SceneDrawables, out: &mut Vec<Placement>) {
    let position = grid_position(DOOR_CELL.0, DOOR_CELL.1, 0.2);
    out.push(Placement::at(ids.door_lower, position));
    out.push(Placement::at(ids.door_upper, position));
}

/// `S(2.5)·T(0, 0.08, -4)·Ry(-90°)`; the summit edge faces -z
pub fn hill_model() -> Matrix4<f32> {
    Matrix4::from_scale(HILL_SCALE)
        * Matrix4::from_translation(Vector3::from(HILL_TRANSLATION))
        * Matrix4::from_angle_y(Deg(-90.0))
}

/// World height of the hill's top surface at world `z`
pub fn hill_surface_height(z: f32) -> f32 {
    let local_x = z / HILL_SCALE - HILL_TRANSLATION[2];
    let t = (local_x + HILL_PARAMS.base_size / 2.0) / HILL_PARAMS.base_size;
    HILL_SCALE * (HILL_PARAMS.profile(t.clamp(0.0, 1.0)) + HILL_TRANSLATION[1])
}

/// Sits on the hill just below the summit
pub fn pyramid_position() -> Vector3<f32> {
    Vector3::new(0.0, hill_surface_height(PYRAMID_Z) - 0.01, PYRAMID_Z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::drawable::build_catalog;
    use cgmath::{InnerSpace, Transform, Vector4};

    fn count(placements: &[Placement], id: DrawableId) -> usize {
        placements.iter().filter(|p| p.drawable == id).count()
    }

    fn origin(p: &Placement) -> Vector3<f32> {
        p.model_matrix(Vector3::new(0.0, 0.0, 0.0)).w.truncate()
    }

    #[test]
    fn test_block_counts() {
        let (_, ids) = build_catalog();
        let layout = build_layout(&ids);
        assert_eq!(count(&layout, ids.grass), 615);
        assert_eq!(count(&layout, ids.log), 61 + 81);
        assert_eq!(count(&layout, ids.leaves), 540);
        assert_eq!(count(&layout, ids.glass), 11);
        assert_eq!(count(&layout, ids.planks), 34);
        assert_eq!(count(&layout, ids.door_lower), 1);
        assert_eq!(count(&layout, ids.door_upper), 1);
        assert_eq!(count(&layout, ids.hill), 1);
        assert_eq!(count(&layout, ids.pyramid), 1);
        let flowers: usize = ids.flowers.iter().map(|id| count(&layout, *id)).sum();
        assert_eq!(flowers, 60);
    }

    #[test]
    fn test_grass_leaves_house_and_door_cells_open() {
        let (_, ids) = build_catalog();
        let layout = build_layout(&ids);
        let door = grid_position(DOOR_CELL.0, DOOR_CELL.1, 0.0);
        let house = grid_position(HOUSE_CELL.0, HOUSE_CELL.1, 0.0);
        for grass in layout.iter().filter(|p| p.drawable == ids.grass) {
            let at = origin(grass);
            assert!((at - door).magnitude() > 0.1);
            assert!((at.x - house.x).abs() > 0.5 || (at.z - house.z).abs() > 0.5);
        }
    }

    #[test]
    fn test_door_sits_on_step() {
        let (_, ids) = build_catalog();
        let layout = build_layout(&ids);
        let door = layout.iter().find(|p| p.drawable == ids.door_lower).unwrap();
        let at = origin(door);
        assert!((at - Vector3::new(0.0, 0.2, 0.8)).magnitude() < 1e-5);
        let step = layout
            .iter()
            .filter(|p| p.drawable == ids.log)
            .any(|p| (origin(p) - Vector3::new(0.0, 0.0, 0.8)).magnitude() < 1e-5);
        assert!(step);
    }

    #[test]
    fn test_flower_jitter_is_bounded() {
        for (x, z, _) in FLOWERS {
            let j = flower_jitter(x, z);
            assert!(j.x.abs() <= 0.35 * SPACING + 1e-6);
            assert!(j.z.abs() <= 0.35 * SPACING + 1e-6);
            assert!((0.0..=0.06 + 1e-6).contains(&j.y));
        }
        let j = flower_jitter(22, 4);
        assert!((j.x - (4.0 / 10.0 - 0.35) * SPACING).abs() < 1e-6);
    }

    #[test]
    fn test_billboard_faces_camera() {
        let position = Vector3::new(1.0, 0.5, 1.0);
        let eye = Vector3::new(4.0, 2.0, -3.0);
        let rot = billboard_yaw(position, eye);
        let facing = rot.transform_vector(Vector3::new(0.0, 0.0, 1.0));
        let mut flat = eye - position;
        flat.y = 0.0;
        assert!(facing.normalize().dot(flat.normalize()) > 0.999);
        assert!(facing.y.abs() < 1e-6);
    }

    #[test]
    fn test_stairs_face_outward() {
        assert_eq!(stair_facing(0, -2, 2), 270.0);
        assert_eq!(stair_facing(-2, 2, 2), 90.0);
        assert_eq!(stair_facing(-2, 0, 2), 0.0);
        assert_eq!(stair_facing(2, 0, 2), 180.0);
        assert_eq!(stair_facing(0, 0, 1), 0.0);
    }

    #[test]
    fn test_hill_summit_faces_away_from_house() {
        let model = hill_model();
        let summit = model * Vector4::new(-2.0, 1.0, 0.0, 1.0);
        let foot = model * Vector4::new(2.0, 0.0, 0.0, 1.0);
        assert!(summit.z < foot.z);
        assert!((summit.y - 2.7).abs() < 1e-4);
        assert!((summit.z - -15.0).abs() < 1e-4);
        assert!((hill_surface_height(-15.0) - 2.7).abs() < 1e-4);
    }

    #[test]
    fn test_pyramid_rests_on_hill() {
        let p = pyramid_position();
        let ground = hill_surface_height(p.z);
        assert!(p.y < ground && ground - p.y < 0.02);
        assert!((p.y - 2.69).abs() < 0.01);
    }
}
