use cubespace_common::{Color, Face};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A handle referencing a material in a [`Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialHandle(pub u8);

/// A flat surface material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
}

impl Material {
    pub fn from_rgb(name: &str, rgb: u32) -> Self {
        let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
        Self {
            name: name.to_string(),
            base_color: [channel(16), channel(8), channel(0), 1.0],
        }
    }
}

/// Sticker materials plus one inert material for hidden surfaces.
///
/// Lookups of a color the palette does not know resolve to the inert
/// material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    materials: Vec<Material>,
    by_color: BTreeMap<Color, MaterialHandle>,
    inert: MaterialHandle,
}

impl Default for Palette {
    fn default() -> Self {
        let mut palette = Self {
            materials: Vec::new(),
            by_color: BTreeMap::new(),
            inert: MaterialHandle(0),
        };
        palette.inert = palette.push(Material::from_rgb("black", 0x000000));
        for (color, name, rgb) in [
            (Color::White, "white", 0xffffff),
            (Color::Yellow, "yellow", 0xffff00),
            (Color::Orange, "orange", 0xffa500),
            (Color::Red, "red", 0xff0000),
            (Color::Green, "green", 0x00ff00),
            (Color::Blue, "blue", 0x0000ff),
        ] {
            let handle = palette.push(Material::from_rgb(name, rgb));
            palette.by_color.insert(color, handle);
        }
        palette
    }
}

impl Palette {
    fn push(&mut self, material: Material) -> MaterialHandle {
        let handle = MaterialHandle(self.materials.len() as u8);
        self.materials.push(material);
        handle
    }

    /// Material for a sticker color, falling back to the inert material.
    pub fn material_for(&self, color: Color) -> MaterialHandle {
        self.by_color.get(&color).copied().unwrap_or(self.inert)
    }

    /// Material shown by `face` on a solved cube.
    pub fn home_material(&self, face: Face) -> MaterialHandle {
        self.material_for(face.home_color())
    }

    pub fn inert(&self) -> MaterialHandle {
        self.inert
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle.0 as usize)
    }

    /// Drop the mapping for one color; it will paint as inert afterwards.
    pub fn forget(&mut self, color: Color) {
        self.by_color.remove(&color);
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_has_seven_materials() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 7);
        let mut handles: Vec<MaterialHandle> =
            Color::ALL.iter().map(|&c| palette.material_for(c)).collect();
        handles.push(palette.inert());
        handles.sort();
        handles.dedup();
        assert_eq!(handles.len(), 7);
    }

    #[test]
    fn rgb_conversion() {
        let m = Material::from_rgb("orange", 0xffa500);
        assert_eq!(m.base_color[0], 1.0);
        assert!((m.base_color[1] - 165.0 / 255.0).abs() < 1e-6);
        assert_eq!(m.base_color[2], 0.0);
        assert_eq!(m.base_color[3], 1.0);
    }

    #[test]
    fn unknown_color_falls_back_to_inert() {
        let mut palette = Palette::default();
        palette.forget(Color::Blue);
        assert_eq!(palette.material_for(Color::Blue), palette.inert());
        assert_ne!(palette.material_for(Color::Red), palette.inert());
    }

    #[test]
    fn home_material_matches_face_color() {
        let palette = Palette::default();
        let m = palette.material(palette.home_material(Face::Front)).unwrap();
        assert_eq!(m.name, "green");
    }
}
