use cubespace_animate::{CubeRig, TurnPhase};
use cubespace_assembly::{CubeletId, LatticePos, SurfaceDir};
use cubespace_common::Face;
use cubespace_kernel::{FaceletError, Move};
use std::fmt;

/// Read-only queries against a rig for debugging and development UI.
pub struct CubeInspector;

impl CubeInspector {
    pub fn summary(rig: &CubeRig) -> RigSummary {
        let validation = rig.state().validate();
        RigSummary {
            frame: rig.frame(),
            moves_applied: rig.moves_applied(),
            solved: rig.is_solved(),
            fully_solved: rig.state().is_fully_solved(),
            validation,
            phase: rig.phase(),
            active_move: rig.animator().active_move(),
            queued: rig.queue_len(),
            spin_angle: rig.spin().angle(),
            spin_enabled: rig.spin().is_enabled(),
            pending_events: rig.events().len(),
        }
    }

    /// Details of one cubelet, whether it sits in the registry or in the
    /// rotating layer.
    pub fn inspect_cubelet(rig: &CubeRig, id: CubeletId) -> Option<CubeletInfo> {
        if let Some(c) = rig.registry().get(id) {
            return Some(CubeletInfo::new(c, c.transform.position, false));
        }
        let group = rig.active_group()?;
        let c = group.members().iter().find(|c| c.id == id)?;
        Some(CubeletInfo::new(c, group.member_transform(c).position, true))
    }

    /// The cubelet currently at `pos` in the registry.
    pub fn cubelet_at(rig: &CubeRig, pos: LatticePos) -> Option<CubeletInfo> {
        rig.registry().at(pos).map(|c| CubeletInfo::new(c, c.transform.position, false))
    }

    /// Ids of every cubelet, registry and rotating layer together, sorted.
    pub fn list_cubelets(rig: &CubeRig) -> Vec<CubeletId> {
        let mut ids: Vec<CubeletId> = rig.registry().iter().map(|c| c.id).collect();
        if let Some(group) = rig.active_group() {
            ids.extend(group.ids());
        }
        ids.sort();
        ids
    }
}

/// Snapshot of rig status.
#[derive(Debug, Clone)]
pub struct RigSummary {
    pub frame: u64,
    pub moves_applied: u64,
    pub solved: bool,
    pub fully_solved: bool,
    pub validation: Result<(), FaceletError>,
    pub phase: TurnPhase,
    pub active_move: Option<Move>,
    pub queued: usize,
    pub spin_angle: f32,
    pub spin_enabled: bool,
    pub pending_events: usize,
}

impl fmt::Display for RigSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rig: frame={} moves={} solved={} valid={} phase={}",
            self.frame,
            self.moves_applied,
            self.solved,
            self.validation.is_ok(),
            self.phase
        )?;
        if let Some(mv) = self.active_move {
            write!(f, " turning={mv}")?;
        }
        write!(
            f,
            " queued={} spin={:.2}{} pending_events={}",
            self.queued,
            self.spin_angle,
            if self.spin_enabled { "" } else { " (off)" },
            self.pending_events
        )
    }
}

/// Detailed info about a single cubelet.
#[derive(Debug, Clone)]
pub struct CubeletInfo {
    pub id: CubeletId,
    pub home: LatticePos,
    pub lattice: LatticePos,
    /// Assembly-space position, rotation group included.
    pub position: [f32; 3],
    pub rotating: bool,
    /// Material index shown towards each outward face, in [`Face::ALL`] order.
    pub facing: [(Face, u8); 6],
}

impl CubeletInfo {
    fn new(c: &cubespace_assembly::Cubelet, position: glam::Vec3, rotating: bool) -> Self {
        let facing = Face::ALL.map(|face| (face, c.facing(SurfaceDir::from_face(face)).0));
        Self {
            id: c.id,
            home: c.home,
            lattice: c.lattice,
            position: position.to_array(),
            rotating,
            facing,
        }
    }

    /// Number of faces this cubelet's slot shows on the outside.
    pub fn visible_faces(&self) -> usize {
        self.lattice.boundary_faces().count()
    }
}

impl fmt::Display for CubeletInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cubelet [{}] home=({}, {}, {}) slot=({}, {}, {}) pos=({:.2}, {:.2}, {:.2})",
            self.id.0,
            self.home.x,
            self.home.y,
            self.home.z,
            self.lattice.x,
            self.lattice.y,
            self.lattice.z,
            self.position[0],
            self.position[1],
            self.position[2],
        )?;
        if self.rotating {
            f.write_str(" rotating")?;
        }
        Ok(())
    }
}
