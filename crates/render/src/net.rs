use crate::renderer::{RenderView, Renderer};
use cubespace_animate::CubeRig;

/// Text renderer: a status header followed by the unfolded facelet net.
///
/// The net shows the logical state, so a turn in progress is not visible
/// until it completes.
#[derive(Debug, Default)]
pub struct NetTextRenderer {
    /// Include the camera line in the header.
    pub show_view: bool,
}

impl NetTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for NetTextRenderer {
    type Output = String;

    fn render(&self, rig: &CubeRig, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Cube (frame={}, phase={}, queued={}) ===\n",
            rig.frame(),
            rig.phase(),
            rig.queue_len()
        ));
        if let Some(mv) = rig.animator().active_move() {
            let (done, total) = rig.animator().progress().unwrap_or((0, 0));
            out.push_str(&format!("Turning: {mv} ({done}/{total})\n"));
        }
        out.push_str(&format!(
            "Solved: {}  Moves: {}  Spin: {:.2} rad\n",
            if rig.is_solved() { "yes" } else { "no" },
            rig.moves_applied(),
            rig.spin().angle()
        ));
        if self.show_view {
            out.push_str(&format!(
                "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
                view.eye.x,
                view.eye.y,
                view.eye.z,
                view.target.x,
                view.target.y,
                view.target.z,
                view.fov_degrees
            ));
        }
        out.push('\n');
        out.push_str(&rig.state().to_string());
        out
    }
}
