//! Cube kernel: the authoritative facelet state and the move engine.
//!
//! # Invariants
//! - Every reachable state holds each of the six colors exactly nine times.
//! - All state mutations flow through the move engine; a move is applied as a
//!   whole, never partially.
//! - Unrecognized notation is a silent no-op on the lenient path.

pub mod facelets;
pub mod moves;
pub mod notation;

pub use facelets::{ENTRY_ORDER, FaceMap, FaceletError, FaceletState, Grid, SOLVER_ORDER};
pub use moves::{
    apply_move, apply_notation, apply_sequence, quarter_turn, rotate_face_clockwise,
    rotate_face_counter_clockwise,
};
pub use notation::{
    Modifier, Move, NotationError, format_sequence, parse_sequence, parse_sequence_lenient,
};
