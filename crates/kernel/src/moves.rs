//! Move engine: pure sticker permutations over a [`FaceletState`].
//!
//! Every function here mutates the state in place. Each base quarter turn
//! rotates the turning face's own grid clockwise, then cycles the four
//! adjacent edge strips. Prime and double moves are the base move applied
//! three and two times, so there is exactly one dispatch path for every move.

use crate::facelets::{FaceletState, Grid};
use crate::notation::Move;
use cubespace_common::Face;

/// Rotate a face's own stickers 90° clockwise (transpose, reverse rows).
/// Adjacent faces are untouched.
pub fn rotate_face_clockwise(state: &mut FaceletState, face: Face) {
    let old = *state.face(face);
    let grid = state.face_mut(face);
    for (r, row) in grid.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = old[2 - c][r];
        }
    }
}

/// Rotate a face's own stickers 90° counter-clockwise (transpose, reverse
/// columns).
pub fn rotate_face_counter_clockwise(state: &mut FaceletState, face: Face) {
    let old = *state.face(face);
    let grid = state.face_mut(face);
    for (r, row) in grid.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = old[c][2 - r];
        }
    }
}

fn grids(state: &FaceletState) -> [Grid; 6] {
    Face::ALL.map(|f| *state.face(f))
}

/// Clockwise quarter turn of the given face layer.
pub fn quarter_turn(state: &mut FaceletState, face: Face) {
    rotate_face_clockwise(state, face);
    // Snapshot after the face rotation; every strip below reads from it.
    let old = grids(state);
    let src = |f: Face| &old[f.index()];
    match face {
        Face::Up => {
            state.face_mut(Face::Front)[0] = src(Face::Right)[0];
            state.face_mut(Face::Right)[0] = src(Face::Back)[0];
            state.face_mut(Face::Back)[0] = src(Face::Left)[0];
            state.face_mut(Face::Left)[0] = src(Face::Front)[0];
        }
        Face::Down => {
            state.face_mut(Face::Front)[2] = src(Face::Left)[2];
            state.face_mut(Face::Left)[2] = src(Face::Back)[2];
            state.face_mut(Face::Back)[2] = src(Face::Right)[2];
            state.face_mut(Face::Right)[2] = src(Face::Front)[2];
        }
        Face::Right => {
            for i in 0..3 {
                state.face_mut(Face::Up)[i][2] = src(Face::Front)[i][2];
                state.face_mut(Face::Front)[i][2] = src(Face::Down)[i][2];
                state.face_mut(Face::Down)[i][2] = src(Face::Back)[2 - i][0];
                state.face_mut(Face::Back)[2 - i][0] = src(Face::Up)[i][2];
            }
        }
        Face::Left => {
            for i in 0..3 {
                state.face_mut(Face::Up)[i][0] = src(Face::Back)[2 - i][2];
                state.face_mut(Face::Back)[2 - i][2] = src(Face::Down)[i][0];
                state.face_mut(Face::Down)[i][0] = src(Face::Front)[i][0];
                state.face_mut(Face::Front)[i][0] = src(Face::Up)[i][0];
            }
        }
        Face::Front => {
            for i in 0..3 {
                state.face_mut(Face::Up)[2][i] = src(Face::Left)[2 - i][2];
                state.face_mut(Face::Left)[i][2] = src(Face::Down)[0][i];
                state.face_mut(Face::Down)[0][i] = src(Face::Right)[2 - i][0];
                state.face_mut(Face::Right)[i][0] = src(Face::Up)[2][i];
            }
        }
        Face::Back => {
            for i in 0..3 {
                state.face_mut(Face::Up)[0][i] = src(Face::Right)[i][2];
                state.face_mut(Face::Right)[i][2] = src(Face::Down)[2][2 - i];
                state.face_mut(Face::Down)[2][i] = src(Face::Left)[i][0];
                state.face_mut(Face::Left)[i][0] = src(Face::Up)[0][2 - i];
            }
        }
    }
}

/// Apply one move in place. Double and prime moves repeat the base turn.
pub fn apply_move(state: &mut FaceletState, mv: Move) {
    for _ in 0..mv.modifier.quarter_turns() {
        quarter_turn(state, mv.face);
    }
}

/// Apply a move given as notation. Unrecognized tokens are silently ignored;
/// the return value reports whether the move was applied.
pub fn apply_notation(state: &mut FaceletState, notation: &str) -> bool {
    match notation.parse::<Move>() {
        Ok(mv) => {
            apply_move(state, mv);
            true
        }
        Err(_) => false,
    }
}

pub fn apply_sequence(state: &mut FaceletState, moves: &[Move]) {
    for &mv in moves {
        apply_move(state, mv);
    }
}
