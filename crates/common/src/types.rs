use glam::{IVec3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Errors from parsing single-letter face or color symbols.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    #[error("unknown face letter {0:?}")]
    UnknownFace(char),
    #[error("unknown color letter {0:?}")]
    UnknownColor(char),
}

/// One of the six faces of the cube, named by its position in the standard
/// orientation (white up, green front).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    #[serde(rename = "U")]
    Up,
    #[serde(rename = "D")]
    Down,
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "F")]
    Front,
    #[serde(rename = "B")]
    Back,
}

impl Face {
    /// All faces, in storage order.
    pub const ALL: [Face; 6] = [
        Face::Up,
        Face::Down,
        Face::Left,
        Face::Right,
        Face::Front,
        Face::Back,
    ];

    /// Storage index in `0..6`, matching the order of [`Face::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn letter(self) -> char {
        match self {
            Face::Up => 'U',
            Face::Down => 'D',
            Face::Left => 'L',
            Face::Right => 'R',
            Face::Front => 'F',
            Face::Back => 'B',
        }
    }

    pub fn from_letter(c: char) -> Result<Self, SymbolError> {
        match c {
            'U' => Ok(Face::Up),
            'D' => Ok(Face::Down),
            'L' => Ok(Face::Left),
            'R' => Ok(Face::Right),
            'F' => Ok(Face::Front),
            'B' => Ok(Face::Back),
            other => Err(SymbolError::UnknownFace(other)),
        }
    }

    /// Color of this face on a solved cube.
    pub fn home_color(self) -> Color {
        match self {
            Face::Up => Color::White,
            Face::Down => Color::Yellow,
            Face::Left => Color::Orange,
            Face::Right => Color::Red,
            Face::Front => Color::Green,
            Face::Back => Color::Blue,
        }
    }

    /// Outward unit normal in lattice space (+x right, +y up, +z front).
    pub fn normal(self) -> IVec3 {
        match self {
            Face::Up => IVec3::Y,
            Face::Down => IVec3::NEG_Y,
            Face::Left => IVec3::NEG_X,
            Face::Right => IVec3::X,
            Face::Front => IVec3::Z,
            Face::Back => IVec3::NEG_Z,
        }
    }

    /// Inverse of [`Face::normal`]. Returns `None` for anything that is not
    /// an axis-aligned unit vector.
    pub fn from_normal(normal: IVec3) -> Option<Self> {
        Face::ALL.into_iter().find(|f| f.normal() == normal)
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Sticker color symbol. The alphabet has exactly six symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "Y")]
    Yellow,
    #[serde(rename = "O")]
    Orange,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "G")]
    Green,
    #[serde(rename = "B")]
    Blue,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Yellow,
        Color::Orange,
        Color::Red,
        Color::Green,
        Color::Blue,
    ];

    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Yellow => 'Y',
            Color::Orange => 'O',
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Blue => 'B',
        }
    }

    pub fn from_letter(c: char) -> Result<Self, SymbolError> {
        match c.to_ascii_uppercase() {
            'W' => Ok(Color::White),
            'Y' => Ok(Color::Yellow),
            'O' => Ok(Color::Orange),
            'R' => Ok(Color::Red),
            'G' => Ok(Color::Green),
            'B' => Ok(Color::Blue),
            _ => Err(SymbolError::UnknownColor(c)),
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Rigid transform: position and rotation. Cubelets never scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Express this transform in the frame of `parent`, i.e. `parent ∘ self`.
    pub fn in_parent(&self, parent: &Transform) -> Transform {
        Transform {
            position: parent.position + parent.rotation * self.position,
            rotation: parent.rotation * self.rotation,
        }
    }

    /// Inverse of [`Transform::in_parent`]: re-express a transform given in
    /// the parent's space relative to `parent`.
    pub fn relative_to(&self, parent: &Transform) -> Transform {
        let inv = parent.rotation.inverse();
        Transform {
            position: inv * (self.position - parent.position),
            rotation: inv * self.rotation,
        }
    }
}
