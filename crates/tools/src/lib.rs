//! Developer tooling: read-only inspection of a running rig.
//!
//! # Invariants
//! - Inspection never mutates the rig.

mod inspector;

pub use inspector::{CubeInspector, CubeletInfo, RigSummary};
