//! Turn animation: layer selection, the frame-driven turn state machine, the
//! idle spin, and the [`CubeRig`] that ties them to the facelet state.
//!
//! # Invariants
//! - At most one layer rotates at a time; further requests queue or are
//!   rejected, never interleaved.
//! - The logical move is applied in the same frame the visual turn is
//!   reintegrated, and surfaces are repainted immediately after.
//! - The idle spin is paused for the whole of a turn and resumed exactly once
//!   when it ends.
//! - Everything advances only on [`CubeRig::tick`]; there is no clock or
//!   background thread.

mod config;
mod rig;
mod spin;
mod turn;

pub use config::AnimationConfig;
pub use rig::{CubeRig, RigError, RigEvent};
pub use spin::IdleSpin;
pub use turn::{
    CancelToken, LayerSelection, TurnAnimator, TurnPhase, TurnProgress, select_layer, turn_angle,
};
