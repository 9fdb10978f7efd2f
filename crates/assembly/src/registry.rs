use crate::lattice::{LatticeConfig, LatticePos, snap_rotation};
use crate::palette::{MaterialHandle, Palette};
use cubespace_common::{Face, Transform};
use glam::{IVec3, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable identifier of a cubelet, assigned once at assembly construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CubeletId(pub u8);

/// One of the six box surfaces of a cubelet, in right, left, top, bottom,
/// front, back order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SurfaceDir {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl SurfaceDir {
    pub const ALL: [SurfaceDir; 6] = [
        SurfaceDir::PosX,
        SurfaceDir::NegX,
        SurfaceDir::PosY,
        SurfaceDir::NegY,
        SurfaceDir::PosZ,
        SurfaceDir::NegZ,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn vector(self) -> IVec3 {
        self.face().normal()
    }

    /// The cube face an outward surface in this direction would belong to.
    pub fn face(self) -> Face {
        match self {
            SurfaceDir::PosX => Face::Right,
            SurfaceDir::NegX => Face::Left,
            SurfaceDir::PosY => Face::Up,
            SurfaceDir::NegY => Face::Down,
            SurfaceDir::PosZ => Face::Front,
            SurfaceDir::NegZ => Face::Back,
        }
    }

    pub fn from_face(face: Face) -> Self {
        match face {
            Face::Right => SurfaceDir::PosX,
            Face::Left => SurfaceDir::NegX,
            Face::Up => SurfaceDir::PosY,
            Face::Down => SurfaceDir::NegY,
            Face::Front => SurfaceDir::PosZ,
            Face::Back => SurfaceDir::NegZ,
        }
    }

    pub fn from_vector(v: IVec3) -> Option<Self> {
        Face::from_normal(v).map(Self::from_face)
    }
}

/// A positioned sub-cube.
///
/// `surfaces` are indexed by the cubelet's *local* box direction; use
/// [`Cubelet::facing`] and [`Cubelet::paint`] to address them by
/// assembly-space direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cubelet {
    pub id: CubeletId,
    /// Slot the cubelet occupied when the assembly was built.
    pub home: LatticePos,
    /// Current slot. Exact while the cubelet is owned by the registry.
    pub lattice: LatticePos,
    pub transform: Transform,
    pub surfaces: [MaterialHandle; 6],
}

impl Cubelet {
    /// The local surface currently pointing along assembly direction `dir`.
    pub fn local_dir(&self, dir: SurfaceDir) -> SurfaceDir {
        let local = self.transform.rotation.inverse() * dir.vector().as_vec3();
        SurfaceDir::from_vector(local.round().as_ivec3()).unwrap_or(dir)
    }

    /// Material shown towards assembly direction `dir`.
    pub fn facing(&self, dir: SurfaceDir) -> MaterialHandle {
        self.surfaces[self.local_dir(dir).index()]
    }

    /// Paint the surface pointing along assembly direction `dir`.
    pub fn paint(&mut self, dir: SurfaceDir, material: MaterialHandle) {
        let local = self.local_dir(dir);
        self.surfaces[local.index()] = material;
    }
}

/// A transient group of cubelets rotated together about the assembly origin.
///
/// Member transforms are stored in group space; the group's own transform
/// maps group space into assembly space.
#[derive(Debug, Clone)]
pub struct RotationGroup {
    rotation: Quat,
    members: Vec<Cubelet>,
}

impl RotationGroup {
    fn frame(&self) -> Transform {
        Transform {
            position: Vec3::ZERO,
            rotation: self.rotation,
        }
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Rotate the whole group by `angle` radians about an assembly-space axis.
    pub fn rotate(&mut self, axis: Vec3, angle: f32) {
        self.rotation = (Quat::from_axis_angle(axis, angle) * self.rotation).normalize();
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    pub fn members(&self) -> &[Cubelet] {
        &self.members
    }

    pub fn ids(&self) -> Vec<CubeletId> {
        self.members.iter().map(|c| c.id).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Assembly-space transform of a member, group rotation included.
    pub fn member_transform(&self, cubelet: &Cubelet) -> Transform {
        cubelet.transform.in_parent(&self.frame())
    }
}

/// Exclusive owner of the 27 cubelets that are not currently in a rotation
/// group.
///
/// Uses BTreeMap for deterministic iteration order.
#[derive(Debug, Clone)]
pub struct CubeletRegistry {
    cubelets: BTreeMap<CubeletId, Cubelet>,
    config: LatticeConfig,
}

impl CubeletRegistry {
    /// Build the solved lattice: boundary surfaces get their face's home
    /// material, every other surface the inert material.
    pub fn build(config: LatticeConfig, palette: &Palette) -> Self {
        let mut cubelets = BTreeMap::new();
        for (i, pos) in LatticePos::all().enumerate() {
            let id = CubeletId(i as u8);
            let mut surfaces = [palette.inert(); 6];
            for dir in SurfaceDir::ALL {
                if pos.on_face(dir.face()) {
                    surfaces[dir.index()] = palette.home_material(dir.face());
                }
            }
            cubelets.insert(
                id,
                Cubelet {
                    id,
                    home: pos,
                    lattice: pos,
                    transform: Transform::from_position(config.to_world(pos)),
                    surfaces,
                },
            );
        }
        tracing::debug!(count = cubelets.len(), "built cubelet registry");
        Self { cubelets, config }
    }

    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.cubelets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubelets.is_empty()
    }

    pub fn get(&self, id: CubeletId) -> Option<&Cubelet> {
        self.cubelets.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cubelet> {
        self.cubelets.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Cubelet> {
        self.cubelets.values_mut()
    }

    /// The cubelet currently occupying `pos`, if the registry owns it.
    pub fn at(&self, pos: LatticePos) -> Option<&Cubelet> {
        self.cubelets.values().find(|c| c.lattice == pos)
    }

    /// Ids of all owned cubelets matching `pred`.
    pub fn select(&self, pred: impl Fn(&Cubelet) -> bool) -> Vec<CubeletId> {
        self.cubelets
            .values()
            .filter(|c| pred(c))
            .map(|c| c.id)
            .collect()
    }

    /// Move the given cubelets out of the registry into a fresh rotation
    /// group. Unknown ids are skipped.
    pub fn detach(&mut self, ids: &[CubeletId]) -> RotationGroup {
        let mut group = RotationGroup {
            rotation: Quat::IDENTITY,
            members: Vec::with_capacity(ids.len()),
        };
        let frame = group.frame();
        for id in ids {
            if let Some(mut cubelet) = self.cubelets.remove(id) {
                cubelet.transform = cubelet.transform.relative_to(&frame);
                group.members.push(cubelet);
            }
        }
        tracing::trace!(count = group.members.len(), "detached cubelets");
        group
    }

    /// Return every member of `group` to the registry, resolving its
    /// transform into assembly space and snapping it onto the lattice.
    pub fn attach(&mut self, group: RotationGroup) {
        let frame = group.frame();
        for mut cubelet in group.members {
            let resolved = cubelet.transform.in_parent(&frame);
            cubelet.lattice = self.config.nearest(resolved.position);
            cubelet.transform = Transform {
                position: self.config.to_world(cubelet.lattice),
                rotation: snap_rotation(resolved.rotation),
            };
            self.cubelets.insert(cubelet.id, cubelet);
        }
    }
}
