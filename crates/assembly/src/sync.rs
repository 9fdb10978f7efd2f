use crate::lattice::facelet_index;
use crate::palette::Palette;
use crate::registry::{CubeletRegistry, SurfaceDir};
use cubespace_kernel::FaceletState;

/// Repaint every surface of every cubelet the registry owns from the logical
/// state.
///
/// A surface pointing out of the cube takes the material of the facelet at
/// its (face, row, col); every other surface is painted inert. Returns the
/// number of colored surfaces painted (54 when the registry owns all 27
/// cubelets).
pub fn synchronize(registry: &mut CubeletRegistry, state: &FaceletState, palette: &Palette) -> usize {
    let _span = tracing::debug_span!("synchronize").entered();
    let mut colored = 0;
    for cubelet in registry.iter_mut() {
        for dir in SurfaceDir::ALL {
            let face = dir.face();
            let material = match facelet_index(face, cubelet.lattice) {
                Some((row, col)) => {
                    colored += 1;
                    palette.material_for(state.sticker(face, row, col))
                }
                None => palette.inert(),
            };
            cubelet.paint(dir, material);
        }
    }
    tracing::trace!(colored, "synchronized cubelet surfaces");
    colored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::{LatticeConfig, LatticePos, facelet_position};
    use crate::palette::MaterialHandle;
    use crate::registry::CubeletId;
    use cubespace_common::{Color, Face};
    use cubespace_kernel::{Move, apply_move, parse_sequence};
    use glam::Vec3;
    use std::collections::BTreeMap;
    use std::f32::consts::FRAC_PI_2;

    fn setup() -> (CubeletRegistry, Palette) {
        let palette = Palette::default();
        let registry = CubeletRegistry::build(LatticeConfig::default(), &palette);
        (registry, palette)
    }

    /// Material visible at every (slot, assembly direction) on the surface.
    fn visible(registry: &CubeletRegistry) -> BTreeMap<(LatticePos, SurfaceDir), MaterialHandle> {
        let mut out = BTreeMap::new();
        for c in registry.iter() {
            for dir in SurfaceDir::ALL {
                if c.lattice.on_face(dir.face()) {
                    out.insert((c.lattice, dir), c.facing(dir));
                }
            }
        }
        out
    }

    /// Rotate a layer rigidly without repainting, as the animator does.
    fn turn_layer(registry: &mut CubeletRegistry, mv: Move) {
        let normal = mv.face.normal();
        let ids: Vec<CubeletId> =
            registry.select(|c| c.lattice.as_ivec3().dot(normal) == 1);
        let mut group = registry.detach(&ids);
        let angle = -FRAC_PI_2 * mv.modifier.quarter_turns() as f32;
        group.rotate(normal.as_vec3(), angle);
        registry.attach(group);
    }

    #[test]
    fn solved_state_matches_built_registry() {
        let (mut reg, palette) = setup();
        let before = visible(&reg);
        let colored = synchronize(&mut reg, &FaceletState::solved(), &palette);
        assert_eq!(colored, 54);
        assert_eq!(visible(&reg), before);
    }

    #[test]
    fn paints_each_facelet_at_its_slot() {
        let (mut reg, palette) = setup();
        let mut state = FaceletState::solved();
        state.face_mut(Face::Back)[0][2] = Color::Yellow;
        synchronize(&mut reg, &state, &palette);

        let pos = facelet_position(Face::Back, 0, 2);
        assert_eq!(pos, LatticePos::new(-1, 1, -1));
        let c = reg.at(pos).unwrap();
        assert_eq!(c.facing(SurfaceDir::NegZ), palette.material_for(Color::Yellow));
        assert_eq!(c.facing(SurfaceDir::NegX), palette.material_for(Color::Orange));
    }

    #[test]
    fn interior_surfaces_stay_inert() {
        let (mut reg, palette) = setup();
        let mut state = FaceletState::solved();
        apply_move(&mut state, "R".parse().unwrap());
        synchronize(&mut reg, &state, &palette);
        let edge = reg.at(LatticePos::new(1, 1, 0)).unwrap();
        assert_eq!(edge.facing(SurfaceDir::NegY), palette.inert());
        assert_eq!(edge.facing(SurfaceDir::PosZ), palette.inert());
        let core = reg.at(LatticePos::new(0, 0, 0)).unwrap();
        assert!(SurfaceDir::ALL.iter().all(|&d| core.facing(d) == palette.inert()));
    }

    #[test]
    fn unknown_color_paints_inert() {
        let (mut reg, mut palette) = setup();
        palette.forget(Color::Green);
        let colored = synchronize(&mut reg, &FaceletState::solved(), &palette);
        assert_eq!(colored, 54);
        let front = reg.at(LatticePos::new(0, 0, 1)).unwrap();
        assert_eq!(front.facing(SurfaceDir::PosZ), palette.inert());
    }

    #[test]
    fn repaint_reproduces_rigidly_rotated_layer() {
        // For every move: rotate the layer physically (surfaces carried
        // along), apply the logical move, repaint, and compare.
        for mv in Move::all() {
            let (mut reg, palette) = setup();
            let mut state = FaceletState::solved();
            let setup_moves = parse_sequence("F R' U2 B L' D").unwrap();
            for &m in &setup_moves {
                turn_layer(&mut reg, m);
                apply_move(&mut state, m);
            }
            synchronize(&mut reg, &state, &palette);

            turn_layer(&mut reg, mv);
            let carried = visible(&reg);
            apply_move(&mut state, mv);
            synchronize(&mut reg, &state, &palette);
            assert_eq!(visible(&reg), carried, "repaint after {mv} diverged");
        }
    }

    #[test]
    fn rigid_turns_alone_track_the_logical_state() {
        // Never repaint after construction: the carried stickers must still
        // equal what the move engine computes.
        let (mut reg, palette) = setup();
        let mut state = FaceletState::solved();
        for m in parse_sequence("R U R' U' F2 B D' L2 B' U").unwrap() {
            turn_layer(&mut reg, m);
            apply_move(&mut state, m);
        }
        for face in Face::ALL {
            for row in 0..3 {
                for col in 0..3 {
                    let c = reg.at(facelet_position(face, row, col)).unwrap();
                    assert_eq!(
                        c.facing(SurfaceDir::from_face(face)),
                        palette.material_for(state.sticker(face, row, col)),
                        "{face} {row} {col}"
                    );
                }
            }
        }
        // Layer turns keep the centers in place.
        let up_center = reg.at(LatticePos::new(0, 1, 0)).unwrap();
        assert_eq!(up_center.transform.position.round(), Vec3::Y);
    }
}
