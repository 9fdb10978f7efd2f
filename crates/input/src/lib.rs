//! Input: keys and buttons mapped to a shared set of cube actions.
//!
//! # Invariants
//! - The rig consumes [`Action`]s, never raw input events.
//! - Unbound keys and unknown button tokens map to [`Action::Noop`].

pub mod action;
pub mod bindings;

pub use action::Action;
pub use bindings::KeyBindings;
