use cubespace_common::{Color, Face};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A 3×3 grid of stickers, row-major, viewed from outside the face.
pub type Grid = [[Color; 3]; 3];

/// Wire/map form of a facelet state: face letter → grid.
pub type FaceMap = BTreeMap<Face, Grid>;

/// Order in which faces are entered by hand (and printed by the generator of
/// hand-entry input): Up, Left, Front, Right, Back, Down.
pub const ENTRY_ORDER: [Face; 6] = [
    Face::Up,
    Face::Left,
    Face::Front,
    Face::Right,
    Face::Back,
    Face::Down,
];

/// Face order of the 54-character solver string.
pub const SOLVER_ORDER: [Face; 6] = [
    Face::Up,
    Face::Right,
    Face::Front,
    Face::Down,
    Face::Left,
    Face::Back,
];

/// Errors from building, checking or converting a facelet state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FaceletError {
    #[error("face {face}: {reason}")]
    Parse { face: Face, reason: String },
    #[error("missing face {0} in cube state")]
    MissingFace(Face),
    #[error("invalid sticker counts {counts:?}: each of 6 colors must appear 9 times")]
    InvalidCounts { counts: BTreeMap<Color, usize> },
    #[error("center color {0} appears on more than one face")]
    DuplicateCenter(Color),
}

/// The authoritative logical cube: six faces of 3×3 color symbols.
///
/// Construction never validates; [`FaceletState::validate`] is a separate
/// diagnostic. Arrays are `Copy`, so `clone()` shares nothing with the
/// original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "FaceMap", try_from = "FaceMap")]
pub struct FaceletState {
    faces: [Grid; 6],
}

impl Default for FaceletState {
    fn default() -> Self {
        Self::solved()
    }
}

impl FaceletState {
    /// The canonical solved layout: every face uniformly its home color.
    pub fn solved() -> Self {
        let mut faces = [[[Color::White; 3]; 3]; 6];
        for face in Face::ALL {
            faces[face.index()] = [[face.home_color(); 3]; 3];
        }
        Self { faces }
    }

    /// Adopt the given grids verbatim, indexed in [`Face::ALL`] order.
    pub fn from_grids(faces: [Grid; 6]) -> Self {
        Self { faces }
    }

    /// Build a state from six 9-letter strings in [`ENTRY_ORDER`].
    ///
    /// Whitespace is ignored and letters are case-insensitive. Sticker counts
    /// are not checked here.
    pub fn from_face_strings(strings: [&str; 6]) -> Result<Self, FaceletError> {
        let mut faces = [[[Color::White; 3]; 3]; 6];
        for (face, raw) in ENTRY_ORDER.into_iter().zip(strings) {
            let letters: Vec<char> = raw.chars().filter(|c| !c.is_whitespace()).collect();
            if letters.len() != 9 {
                return Err(FaceletError::Parse {
                    face,
                    reason: format!("expected 9 colors, got {}", letters.len()),
                });
            }
            let grid = &mut faces[face.index()];
            for (i, letter) in letters.into_iter().enumerate() {
                grid[i / 3][i % 3] =
                    Color::from_letter(letter).map_err(|e| FaceletError::Parse {
                        face,
                        reason: e.to_string(),
                    })?;
            }
        }
        Ok(Self { faces })
    }

    pub fn face(&self, face: Face) -> &Grid {
        &self.faces[face.index()]
    }

    pub fn face_mut(&mut self, face: Face) -> &mut Grid {
        &mut self.faces[face.index()]
    }

    pub fn sticker(&self, face: Face, row: usize, col: usize) -> Color {
        self.faces[face.index()][row][col]
    }

    /// Occurrences of every symbol across all 54 cells.
    pub fn sticker_counts(&self) -> BTreeMap<Color, usize> {
        let mut counts = BTreeMap::new();
        for grid in &self.faces {
            for &color in grid.iter().flatten() {
                *counts.entry(color).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Succeeds iff exactly six distinct symbols each occur nine times.
    ///
    /// Diagnostic only: a failure is logged and returned, never enforced.
    pub fn validate(&self) -> Result<(), FaceletError> {
        let counts = self.sticker_counts();
        if counts.len() != 6 || counts.values().any(|&c| c != 9) {
            tracing::warn!(?counts, "cube state has invalid sticker counts");
            return Err(FaceletError::InvalidCounts { counts });
        }
        tracing::debug!("cube state has the correct number of stickers");
        Ok(())
    }

    /// True iff every face is uniform (all nine cells equal its center).
    ///
    /// Does not check that the six uniform colors are distinct; see
    /// [`FaceletState::is_fully_solved`].
    pub fn is_solved(&self) -> bool {
        self.faces.iter().all(|grid| {
            let center = grid[1][1];
            grid.iter().flatten().all(|&c| c == center)
        })
    }

    /// [`FaceletState::is_solved`] plus six distinct center colors.
    pub fn is_fully_solved(&self) -> bool {
        if !self.is_solved() {
            return false;
        }
        let mut centers: Vec<Color> = self.faces.iter().map(|g| g[1][1]).collect();
        centers.sort();
        centers.dedup();
        centers.len() == 6
    }

    /// The 54-character facelet string used by two-phase solvers: faces in
    /// [`SOLVER_ORDER`], each sticker named after the face whose center
    /// carries its color.
    pub fn to_solver_string(&self) -> Result<String, FaceletError> {
        // Six distinct centers over a six-color alphabet name every sticker.
        let mut owner: [Option<Face>; 6] = [None; 6];
        for face in SOLVER_ORDER {
            let center = self.sticker(face, 1, 1);
            if owner[center as usize].replace(face).is_some() {
                return Err(FaceletError::DuplicateCenter(center));
            }
        }
        let mut out = String::with_capacity(54);
        for face in SOLVER_ORDER {
            for &color in self.face(face).iter().flatten() {
                out.extend(owner[color as usize].map(Face::letter));
            }
        }
        Ok(out)
    }
}

impl From<FaceletState> for FaceMap {
    fn from(state: FaceletState) -> Self {
        Face::ALL
            .into_iter()
            .map(|f| (f, *state.face(f)))
            .collect()
    }
}

impl TryFrom<FaceMap> for FaceletState {
    type Error = FaceletError;

    fn try_from(map: FaceMap) -> Result<Self, Self::Error> {
        let mut faces = [[[Color::White; 3]; 3]; 6];
        for face in Face::ALL {
            faces[face.index()] = *map.get(&face).ok_or(FaceletError::MissingFace(face))?;
        }
        Ok(Self { faces })
    }
}

fn row_string(row: &[Color; 3]) -> String {
    row.iter()
        .map(|c| c.letter().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl std::fmt::Display for FaceletState {
    /// Unfolded net: Up, then Left/Front/Right/Back side by side, then Down.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.face(Face::Up) {
            writeln!(f, "      {}", row_string(row))?;
        }
        writeln!(f)?;
        for i in 0..3 {
            writeln!(
                f,
                "{}  {}  {}  {}",
                row_string(&self.face(Face::Left)[i]),
                row_string(&self.face(Face::Front)[i]),
                row_string(&self.face(Face::Right)[i]),
                row_string(&self.face(Face::Back)[i]),
            )?;
        }
        writeln!(f)?;
        for row in self.face(Face::Down) {
            writeln!(f, "      {}", row_string(row))?;
        }
        Ok(())
    }
}
