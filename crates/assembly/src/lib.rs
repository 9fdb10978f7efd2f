//! Cube assembly: the 27 positioned cubelets and their painted surfaces.
//!
//! # Invariants
//! - Every cubelet is owned by exactly one container at a time: the
//!   registry, or a rotation group while a layer turns.
//! - Cubelets returned to the registry sit exactly on a lattice slot with an
//!   axis-aligned rotation.
//! - Surface colors are derived from the facelet state; geometry never feeds
//!   back into it.

pub mod lattice;
pub mod palette;
pub mod registry;
pub mod sync;

pub use lattice::{LatticeConfig, LatticePos, facelet_index, facelet_position, snap_rotation};
pub use palette::{Material, MaterialHandle, Palette};
pub use registry::{Cubelet, CubeletId, CubeletRegistry, RotationGroup, SurfaceDir};
pub use sync::synchronize;
