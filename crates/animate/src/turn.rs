use cubespace_assembly::{CubeletId, CubeletRegistry, RotationGroup};
use cubespace_kernel::{Modifier, Move};
use glam::{Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Where the animator is in the lifecycle of one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnPhase {
    #[default]
    Idle,
    LayerSelected,
    Rotating,
    Reintegrating,
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnPhase::Idle => "idle",
            TurnPhase::LayerSelected => "layer-selected",
            TurnPhase::Rotating => "rotating",
            TurnPhase::Reintegrating => "reintegrating",
        };
        f.write_str(name)
    }
}

/// Shared flag asking the active turn to abort. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Re-arm the token after the cancellation has been handled.
    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The cubelets one move rotates, and how.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSelection {
    pub mv: Move,
    /// Unit rotation axis: the turning face's outward normal.
    pub axis: Vec3,
    /// Total signed rotation in radians about `axis`.
    pub angle: f32,
    pub members: Vec<CubeletId>,
}

/// Signed rotation of a move about its face normal: clockwise viewed from
/// outside is negative.
pub fn turn_angle(modifier: Modifier) -> f32 {
    match modifier {
        Modifier::Clockwise => -FRAC_PI_2,
        Modifier::Prime => FRAC_PI_2,
        Modifier::Double => -PI,
    }
}

/// Pick the layer `mv` turns: every owned cubelet whose center lies beyond
/// the midline between the middle slice and the outer layer.
pub fn select_layer(registry: &CubeletRegistry, mv: Move) -> LayerSelection {
    let axis = mv.face.normal().as_vec3();
    let threshold = registry.config().spacing() / 2.0;
    let members = registry.select(|c| c.transform.position.dot(axis) > threshold);
    LayerSelection {
        mv,
        axis,
        angle: turn_angle(mv.modifier),
        members,
    }
}

/// Result of advancing the animator by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnProgress {
    /// Nothing to animate.
    Idle,
    /// The layer rotated one increment; `step` of `steps` frames are done.
    Rotated { step: u32, steps: u32 },
    /// The token was set; cubelets are back where the turn found them.
    Cancelled(Move),
}

#[derive(Debug)]
struct ActiveTurn {
    selection: LayerSelection,
    steps: u32,
    step: u32,
    group: Option<RotationGroup>,
}

/// Frame-driven state machine rotating one layer at a time:
/// `Idle → LayerSelected → Rotating → Reintegrating → Idle`.
///
/// While rotating, the animator owns the layer's cubelets through a
/// [`RotationGroup`]; the registry holds the other 18.
#[derive(Debug)]
pub struct TurnAnimator {
    steps_per_quarter_turn: u32,
    phase: TurnPhase,
    active: Option<ActiveTurn>,
}

impl TurnAnimator {
    pub fn new(steps_per_quarter_turn: u32) -> Self {
        Self {
            steps_per_quarter_turn: steps_per_quarter_turn.max(1),
            phase: TurnPhase::Idle,
            active: None,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == TurnPhase::Idle
    }

    pub fn active_move(&self) -> Option<Move> {
        self.active.as_ref().map(|a| a.selection.mv)
    }

    pub fn selection(&self) -> Option<&LayerSelection> {
        self.active.as_ref().map(|a| &a.selection)
    }

    /// The rotating layer, once detached from the registry.
    pub fn group(&self) -> Option<&RotationGroup> {
        self.active.as_ref().and_then(|a| a.group.as_ref())
    }

    /// `(done, total)` frames of the active turn.
    pub fn progress(&self) -> Option<(u32, u32)> {
        self.active.as_ref().map(|a| (a.step, a.steps))
    }

    /// Frames a move takes to animate.
    pub fn steps_for(&self, mv: Move) -> u32 {
        match mv.modifier {
            Modifier::Double => self.steps_per_quarter_turn * 2,
            Modifier::Clockwise | Modifier::Prime => self.steps_per_quarter_turn,
        }
    }

    /// `Idle → LayerSelected`. Returns the number of cubelets selected, or
    /// `None` if a turn is already in progress.
    pub fn begin(&mut self, registry: &CubeletRegistry, mv: Move) -> Option<usize> {
        if !self.is_idle() {
            return None;
        }
        let selection = select_layer(registry, mv);
        let count = selection.members.len();
        tracing::debug!(%mv, count, "layer selected");
        self.active = Some(ActiveTurn {
            selection,
            steps: self.steps_for(mv),
            step: 0,
            group: None,
        });
        self.phase = TurnPhase::LayerSelected;
        Some(count)
    }

    /// Advance one frame. The first frame after selection detaches the layer;
    /// every frame rotates it by one increment. After the last increment the
    /// phase is `Reintegrating` and [`TurnAnimator::reintegrate`] must follow.
    pub fn step(&mut self, registry: &mut CubeletRegistry, cancel: &CancelToken) -> TurnProgress {
        if cancel.is_cancelled() {
            return match self.abort(registry) {
                Some(mv) => TurnProgress::Cancelled(mv),
                None => TurnProgress::Idle,
            };
        }
        let Some(active) = self.active.as_mut() else {
            return TurnProgress::Idle;
        };
        match self.phase {
            TurnPhase::LayerSelected => {
                active.group = Some(registry.detach(&active.selection.members));
                self.phase = TurnPhase::Rotating;
            }
            TurnPhase::Rotating => {}
            TurnPhase::Idle | TurnPhase::Reintegrating => {
                return TurnProgress::Rotated {
                    step: active.step,
                    steps: active.steps,
                };
            }
        }

        active.step += 1;
        // Set from the step count rather than accumulated, so no drift builds up.
        let fraction = active.step as f32 / active.steps as f32;
        let rotation = Quat::from_axis_angle(active.selection.axis, active.selection.angle * fraction);
        if let Some(group) = active.group.as_mut() {
            group.set_rotation(rotation);
        }
        tracing::trace!(step = active.step, steps = active.steps, "turn step");

        if active.step >= active.steps {
            self.phase = TurnPhase::Reintegrating;
        }
        TurnProgress::Rotated {
            step: active.step,
            steps: active.steps,
        }
    }

    /// `Reintegrating → Idle`: hand the layer back to the registry, snapped
    /// onto the lattice. Returns the finished move.
    pub fn reintegrate(&mut self, registry: &mut CubeletRegistry) -> Option<Move> {
        if self.phase != TurnPhase::Reintegrating {
            return None;
        }
        let active = self.active.take()?;
        if let Some(group) = active.group {
            registry.attach(group);
        }
        self.phase = TurnPhase::Idle;
        tracing::debug!(mv = %active.selection.mv, "layer reintegrated");
        Some(active.selection.mv)
    }

    /// Drop the active turn, returning its cubelets to their pre-turn
    /// transforms. Returns the abandoned move, if any.
    pub fn abort(&mut self, registry: &mut CubeletRegistry) -> Option<Move> {
        let active = self.active.take()?;
        if let Some(mut group) = active.group {
            group.set_rotation(Quat::IDENTITY);
            registry.attach(group);
        }
        self.phase = TurnPhase::Idle;
        tracing::debug!(mv = %active.selection.mv, step = active.step, "turn aborted");
        Some(active.selection.mv)
    }
}
