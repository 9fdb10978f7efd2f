use cubespace_animate::CubeRig;
use glam::{Mat4, Vec3};

/// Camera configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Width over height of the output surface.
    pub aspect: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(5.0, 5.0, 5.0),
            target: Vec3::ZERO,
            fov_degrees: 45.0,
            aspect: 1.0,
        }
    }
}

impl RenderView {
    pub fn view_projection(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, 0.1, 1000.0);
        proj * view
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the rig and a view and produces output. It never mutates
/// the rig.
pub trait Renderer {
    type Output;

    fn render(&self, rig: &CubeRig, view: &RenderView) -> Self::Output;
}
