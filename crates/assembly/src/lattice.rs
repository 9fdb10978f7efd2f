use cubespace_common::Face;
use glam::{IVec3, Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Geometry of the cubelet lattice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    /// Edge length of one cubelet.
    pub cubelet_size: f32,
    /// Visual gap between neighbouring cubelets.
    pub gap: f32,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            cubelet_size: 0.95,
            gap: 0.05,
        }
    }
}

impl LatticeConfig {
    /// Distance between the centers of neighbouring cubelets.
    pub fn spacing(&self) -> f32 {
        self.cubelet_size + self.gap
    }

    /// Assembly-space center of the cubelet at `pos`.
    pub fn to_world(&self, pos: LatticePos) -> Vec3 {
        pos.as_ivec3().as_vec3() * self.spacing()
    }

    /// Nearest lattice slot to an assembly-space point, clamped to the cube.
    pub fn nearest(&self, point: Vec3) -> LatticePos {
        let scaled = (point / self.spacing()).round();
        LatticePos::from_ivec3(scaled.as_ivec3().clamp(IVec3::NEG_ONE, IVec3::ONE))
    }
}

/// Integer slot of a cubelet, each coordinate in `-1..=1`.
///
/// +x is right, +y up, +z front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LatticePos {
    pub x: i8,
    pub y: i8,
    pub z: i8,
}

impl LatticePos {
    pub const fn new(x: i8, y: i8, z: i8) -> Self {
        Self { x, y, z }
    }

    /// All 27 slots, x outermost and z innermost.
    pub fn all() -> impl Iterator<Item = LatticePos> {
        (-1..=1).flat_map(|x| (-1..=1).flat_map(move |y| (-1..=1).map(move |z| Self::new(x, y, z))))
    }

    pub fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.x as i32, self.y as i32, self.z as i32)
    }

    pub fn from_ivec3(v: IVec3) -> Self {
        Self::new(v.x as i8, v.y as i8, v.z as i8)
    }

    /// True if this slot lies on the boundary layer of `face`.
    pub fn on_face(self, face: Face) -> bool {
        self.as_ivec3().dot(face.normal()) == 1
    }

    /// Faces whose outer layer contains this slot (0 for the core, 3 for a
    /// corner).
    pub fn boundary_faces(self) -> impl Iterator<Item = Face> {
        Face::ALL.into_iter().filter(move |&f| self.on_face(f))
    }
}

/// Convert a lattice coordinate in `-1..=1` to a grid index in `0..=2`.
fn idx(v: i8) -> usize {
    (v + 1) as usize
}

/// Reverse of [`idx`] for the flipped axes.
fn ridx(v: i8) -> usize {
    (1 - v) as usize
}

/// The (row, col) on `face` of the sticker carried by the slot at `pos`,
/// viewing the face from outside. `None` if `pos` is not on that face.
///
/// | Face | row   | col   |
/// |------|-------|-------|
/// | U    | z + 1 | x + 1 |
/// | D    | 1 − z | x + 1 |
/// | F    | 1 − y | x + 1 |
/// | B    | 1 − y | 1 − x |
/// | R    | 1 − y | 1 − z |
/// | L    | 1 − y | z + 1 |
pub fn facelet_index(face: Face, pos: LatticePos) -> Option<(usize, usize)> {
    if !pos.on_face(face) {
        return None;
    }
    let (x, y, z) = (pos.x, pos.y, pos.z);
    Some(match face {
        Face::Up => (idx(z), idx(x)),
        Face::Down => (ridx(z), idx(x)),
        Face::Front => (ridx(y), idx(x)),
        Face::Back => (ridx(y), ridx(x)),
        Face::Right => (ridx(y), ridx(z)),
        Face::Left => (ridx(y), idx(z)),
    })
}

/// Inverse of [`facelet_index`]: the slot carrying sticker (row, col) of
/// `face`. `row` and `col` must be in `0..3`.
pub fn facelet_position(face: Face, row: usize, col: usize) -> LatticePos {
    let fwd = |i: usize| i as i8 - 1;
    let rev = |i: usize| 1 - i as i8;
    match face {
        Face::Up => LatticePos::new(fwd(col), 1, fwd(row)),
        Face::Down => LatticePos::new(fwd(col), -1, rev(row)),
        Face::Front => LatticePos::new(fwd(col), rev(row), 1),
        Face::Back => LatticePos::new(rev(col), rev(row), -1),
        Face::Right => LatticePos::new(1, rev(row), rev(col)),
        Face::Left => LatticePos::new(-1, rev(row), fwd(col)),
    }
}

/// Round a rotation to the nearest of the 24 axis-aligned rotations.
///
/// Rotated transforms accumulate float error; snapping keeps later layer
/// membership tests and surface lookups exact.
pub fn snap_rotation(rotation: Quat) -> Quat {
    let m = Mat3::from_quat(rotation);
    let snapped = Mat3::from_cols(m.x_axis.round(), m.y_axis.round(), m.z_axis.round());
    Quat::from_mat3(&snapped).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn lattice_has_27_slots() {
        let all: HashSet<LatticePos> = LatticePos::all().collect();
        assert_eq!(all.len(), 27);
        assert_eq!(LatticePos::all().next(), Some(LatticePos::new(-1, -1, -1)));
    }

    #[test]
    fn boundary_face_counts() {
        let corners = LatticePos::all()
            .filter(|p| p.boundary_faces().count() == 3)
            .count();
        let edges = LatticePos::all()
            .filter(|p| p.boundary_faces().count() == 2)
            .count();
        let centers = LatticePos::all()
            .filter(|p| p.boundary_faces().count() == 1)
            .count();
        assert_eq!((corners, edges, centers), (8, 12, 6));
        assert_eq!(LatticePos::new(0, 0, 0).boundary_faces().count(), 0);
    }

    #[test]
    fn facelet_mapping_is_a_bijection() {
        let mut seen = HashSet::new();
        for pos in LatticePos::all() {
            for face in pos.boundary_faces() {
                let (row, col) = facelet_index(face, pos).unwrap();
                assert!(row < 3 && col < 3);
                assert!(seen.insert((face, row, col)), "duplicate {face} {row} {col}");
                assert_eq!(facelet_position(face, row, col), pos);
            }
        }
        assert_eq!(seen.len(), 54);
    }

    #[test]
    fn off_face_slots_have_no_facelet() {
        assert_eq!(facelet_index(Face::Up, LatticePos::new(0, 0, 1)), None);
        assert_eq!(facelet_index(Face::Front, LatticePos::new(1, 1, 1)), Some((0, 2)));
    }

    #[test]
    fn centers_map_to_grid_center() {
        for face in Face::ALL {
            let pos = LatticePos::from_ivec3(face.normal());
            assert_eq!(facelet_index(face, pos), Some((1, 1)));
        }
    }

    #[test]
    fn world_positions_round_trip() {
        let config = LatticeConfig::default();
        assert!((config.spacing() - 1.0).abs() < 1e-6);
        for pos in LatticePos::all() {
            let jitter = Vec3::new(0.01, -0.02, 0.015);
            assert_eq!(config.nearest(config.to_world(pos) + jitter), pos);
        }
    }

    #[test]
    fn snap_rotation_removes_drift() {
        let drifted = Quat::from_rotation_y(FRAC_PI_2 + 0.003);
        let snapped = snap_rotation(drifted);
        let v = snapped * Vec3::X;
        assert_eq!(v.round(), Vec3::NEG_Z);
        assert!(v.abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }
}
