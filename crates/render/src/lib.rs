//! Rendering adapter: renderer-agnostic views of a [`CubeRig`].
//!
//! # Invariants
//! - Renderers read the rig; they never mutate cube state or geometry.
//! - Everything drawn derives from the rig and the view, so two renders of
//!   the same frame are identical.
//!
//! Two renderers ship here: a text net for terminals and logs, and an
//! instance renderer producing the per-cubelet records a GPU backend would
//! upload.
//!
//! [`CubeRig`]: cubespace_animate::CubeRig

mod instance;
mod net;
mod renderer;

pub use instance::{CubeletInstance, InstanceFrame, InstanceRenderer};
pub use net::NetTextRenderer;
pub use renderer::{RenderView, Renderer};
