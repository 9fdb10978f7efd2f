use crate::renderer::{RenderView, Renderer};
use cubespace_animate::CubeRig;
use cubespace_assembly::{Cubelet, Palette, SurfaceDir};
use cubespace_common::Transform;
use glam::{Mat4, Vec3};

const MISSING_MATERIAL: [f32; 4] = [1.0, 0.0, 1.0, 1.0];

/// One cubelet as a GPU instance record.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CubeletInstance {
    /// Column-major model matrix: assembly, rotation group and local
    /// transform, scaled to the cubelet size.
    pub model: [[f32; 4]; 4],
    /// RGBA per local box surface, in `+x -x +y -y +z -z` order.
    pub colors: [[f32; 4]; 6],
    pub id: u32,
    pub _pad: [u32; 3],
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone)]
pub struct InstanceFrame {
    pub view_proj: [[f32; 4]; 4],
    /// Sorted by cubelet id.
    pub instances: Vec<CubeletInstance>,
}

impl InstanceFrame {
    /// Instance records as raw bytes, ready for a vertex buffer upload.
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

/// Produces per-cubelet instance records, including the layer that is
/// mid-rotation.
#[derive(Debug, Default)]
pub struct InstanceRenderer;

impl InstanceRenderer {
    pub fn new() -> Self {
        Self
    }

    fn instance(cubelet: &Cubelet, world: Transform, size: f32, palette: &Palette) -> CubeletInstance {
        let model = Mat4::from_scale_rotation_translation(Vec3::splat(size), world.rotation, world.position);
        let mut colors = [[0.0; 4]; 6];
        for dir in SurfaceDir::ALL {
            colors[dir.index()] = palette
                .material(cubelet.surfaces[dir.index()])
                .map(|m| m.base_color)
                .unwrap_or(MISSING_MATERIAL);
        }
        CubeletInstance {
            model: model.to_cols_array_2d(),
            colors,
            id: cubelet.id.0 as u32,
            _pad: [0; 3],
        }
    }
}

impl Renderer for InstanceRenderer {
    type Output = InstanceFrame;

    fn render(&self, rig: &CubeRig, view: &RenderView) -> InstanceFrame {
        let assembly = rig.assembly();
        let size = rig.registry().config().cubelet_size;
        let palette = rig.palette();

        let mut instances: Vec<CubeletInstance> = rig
            .registry()
            .iter()
            .map(|c| Self::instance(c, c.transform.in_parent(assembly), size, palette))
            .collect();
        if let Some(group) = rig.active_group() {
            for c in group.members() {
                let world = group.member_transform(c).in_parent(assembly);
                instances.push(Self::instance(c, world, size, palette));
            }
        }
        instances.sort_by_key(|i| i.id);
        tracing::trace!(count = instances.len(), "built instance frame");

        InstanceFrame {
            view_proj: view.view_projection().to_cols_array_2d(),
            instances,
        }
    }
}
