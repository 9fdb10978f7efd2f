use glam::Quat;
use std::f32::consts::TAU;

/// Continuous rotation of the whole assembly about +y while no turn runs.
///
/// Two independent switches stop it: the user's `enabled` toggle and the
/// animator's `paused` flag, held for the full duration of a turn.
#[derive(Debug, Clone)]
pub struct IdleSpin {
    step: f32,
    angle: f32,
    enabled: bool,
    paused: bool,
}

impl IdleSpin {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            angle: 0.0,
            enabled: true,
            paused: false,
        }
    }

    /// Advance one frame. Returns true if the angle changed.
    pub fn tick(&mut self) -> bool {
        if !self.is_spinning() {
            return false;
        }
        self.angle = (self.angle + self.step).rem_euclid(TAU);
        true
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_spinning(&self) -> bool {
        self.enabled && !self.paused
    }

    /// Accumulated angle in `[0, 2π)`.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.angle)
    }

    /// Back to angle zero, unpaused. The enabled toggle is kept.
    pub fn reset(&mut self) {
        self.angle = 0.0;
        self.paused = false;
    }
}
