//! Shared types for the cubespace engine.
//!
//! Faces and colors are plain copyable symbols; the mapping between them is
//! fixed by the solved orientation (white up, green front).

mod types;

pub use types::{Color, Face, SymbolError, Transform};
