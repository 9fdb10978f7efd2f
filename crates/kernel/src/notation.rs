use cubespace_common::Face;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Errors from the strict notation parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("empty move token")]
    Empty,
    #[error("invalid move token {0:?}: expected [UDLRFB] optionally followed by ' or 2")]
    Invalid(String),
}

/// Turn amount and direction, as written after the face letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Modifier {
    /// No suffix: clockwise quarter turn viewed from outside the face.
    #[default]
    Clockwise,
    /// `'`: counter-clockwise quarter turn.
    Prime,
    /// `2`: half turn.
    Double,
}

impl Modifier {
    /// Number of clockwise quarter turns this modifier is equivalent to.
    pub fn quarter_turns(self) -> u32 {
        match self {
            Modifier::Clockwise => 1,
            Modifier::Double => 2,
            Modifier::Prime => 3,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Modifier::Clockwise => "",
            Modifier::Prime => "'",
            Modifier::Double => "2",
        }
    }
}

/// A single turn of one outer layer: an immutable notation token such as
/// `R`, `U'` or `F2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Move {
    pub face: Face,
    pub modifier: Modifier,
}

impl Move {
    pub const fn new(face: Face, modifier: Modifier) -> Self {
        Self { face, modifier }
    }

    pub const fn clockwise(face: Face) -> Self {
        Self::new(face, Modifier::Clockwise)
    }

    pub const fn prime(face: Face) -> Self {
        Self::new(face, Modifier::Prime)
    }

    pub const fn double(face: Face) -> Self {
        Self::new(face, Modifier::Double)
    }

    /// The move that undoes this one. Half turns are their own inverse.
    pub fn inverse(self) -> Self {
        let modifier = match self.modifier {
            Modifier::Clockwise => Modifier::Prime,
            Modifier::Prime => Modifier::Clockwise,
            Modifier::Double => Modifier::Double,
        };
        Self::new(self.face, modifier)
    }

    /// All 18 single-layer moves, grouped by face.
    pub fn all() -> impl Iterator<Item = Move> {
        Face::ALL.into_iter().flat_map(|face| {
            [Modifier::Clockwise, Modifier::Prime, Modifier::Double]
                .into_iter()
                .map(move |m| Move::new(face, m))
        })
    }
}

impl FromStr for Move {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let first = chars.next().ok_or(NotationError::Empty)?;
        let face = Face::from_letter(first).map_err(|_| NotationError::Invalid(s.to_string()))?;
        let modifier = match chars.as_str() {
            "" => Modifier::Clockwise,
            "'" => Modifier::Prime,
            "2" => Modifier::Double,
            _ => return Err(NotationError::Invalid(s.to_string())),
        };
        Ok(Move::new(face, modifier))
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.face.letter(), self.modifier.suffix())
    }
}

impl From<Move> for String {
    fn from(m: Move) -> Self {
        m.to_string()
    }
}

impl TryFrom<String> for Move {
    type Error = NotationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Parse a whitespace-separated move sequence, failing on the first bad token.
pub fn parse_sequence(text: &str) -> Result<Vec<Move>, NotationError> {
    text.split_whitespace().map(str::parse).collect()
}

/// Parse a whitespace-separated move sequence, dropping unrecognized tokens.
pub fn parse_sequence_lenient(text: &str) -> Vec<Move> {
    text.split_whitespace()
        .filter_map(|token| match token.parse() {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(token, error = %e, "ignoring unrecognized move token");
                None
            }
        })
        .collect()
}

/// Render a move sequence back to notation, space separated.
pub fn format_sequence(moves: &[Move]) -> String {
    moves
        .iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
