use crate::config::AnimationConfig;
use crate::spin::IdleSpin;
use crate::turn::{CancelToken, TurnAnimator, TurnPhase, TurnProgress};
use cubespace_assembly::{CubeletRegistry, LatticeConfig, Palette, RotationGroup, synchronize};
use cubespace_common::Transform;
use cubespace_kernel::{FaceletState, Move, apply_move};
use std::collections::VecDeque;

/// Errors from requests the rig refuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RigError {
    #[error("turn queue is full ({capacity} pending)")]
    QueueFull { capacity: usize },
    #[error("a turn is in progress")]
    Busy,
}

/// Something observable that happened to the rig.
#[derive(Debug, Clone, PartialEq)]
pub enum RigEvent {
    TurnStarted { mv: Move, cubelets: usize },
    /// The visual turn finished and the logical state now includes it.
    TurnCompleted { mv: Move, solved: bool },
    TurnCancelled { mv: Move },
    TurnQueued { mv: Move, pending: usize },
    TurnRejected { mv: Move },
    SpinPaused,
    SpinResumed,
    Reset,
    StateReplaced { valid: bool },
}

/// The cube as a whole: logical state, geometry and animation, advanced one
/// render frame at a time by [`CubeRig::tick`].
///
/// The rig is the single owner of the facelet state. Every mutation goes
/// through a requested turn, a reset, or [`CubeRig::replace_state`].
#[derive(Debug)]
pub struct CubeRig {
    config: AnimationConfig,
    state: FaceletState,
    registry: CubeletRegistry,
    palette: Palette,
    animator: TurnAnimator,
    spin: IdleSpin,
    assembly: Transform,
    queue: VecDeque<Move>,
    cancel: CancelToken,
    events: Vec<RigEvent>,
    frame: u64,
    moves_applied: u64,
}

impl CubeRig {
    /// A solved cube with the default palette.
    pub fn new(lattice: LatticeConfig, config: AnimationConfig) -> Self {
        Self::with_state(FaceletState::solved(), lattice, config)
    }

    /// Adopt `state` verbatim; it is validated for diagnostics only.
    pub fn with_state(state: FaceletState, lattice: LatticeConfig, config: AnimationConfig) -> Self {
        let _ = state.validate();
        let palette = Palette::default();
        let mut registry = CubeletRegistry::build(lattice, &palette);
        synchronize(&mut registry, &state, &palette);
        Self {
            config,
            state,
            registry,
            palette,
            animator: TurnAnimator::new(config.steps_per_quarter_turn),
            spin: IdleSpin::new(config.idle_spin_step),
            assembly: Transform::default(),
            queue: VecDeque::new(),
            cancel: CancelToken::new(),
            events: Vec::new(),
            frame: 0,
            moves_applied: 0,
        }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn state(&self) -> &FaceletState {
        &self.state
    }

    pub fn registry(&self) -> &CubeletRegistry {
        &self.registry
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn animator(&self) -> &TurnAnimator {
        &self.animator
    }

    pub fn spin(&self) -> &IdleSpin {
        &self.spin
    }

    /// Transform of the whole assembly (the idle spin).
    pub fn assembly(&self) -> &Transform {
        &self.assembly
    }

    /// The layer currently rotating, if any.
    pub fn active_group(&self) -> Option<&RotationGroup> {
        self.animator.group()
    }

    pub fn phase(&self) -> TurnPhase {
        self.animator.phase()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Move> {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Turns completed since construction or the last reset.
    pub fn moves_applied(&self) -> u64 {
        self.moves_applied
    }

    /// No active turn and nothing queued.
    pub fn is_idle(&self) -> bool {
        self.animator.is_idle() && self.queue.is_empty()
    }

    pub fn is_solved(&self) -> bool {
        self.state.is_solved()
    }

    /// A handle that aborts the active turn on the next frame when set.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn events(&self) -> &[RigEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<RigEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_spin_enabled(&mut self, enabled: bool) {
        self.spin.set_enabled(enabled);
    }

    /// Start `mv` now if nothing is animating, otherwise queue it behind the
    /// active turn.
    pub fn request(&mut self, mv: Move) -> Result<(), RigError> {
        if self.is_idle() {
            self.start(mv);
            return Ok(());
        }
        let capacity = self.config.max_queued_turns;
        if self.queue.len() >= capacity {
            tracing::warn!(%mv, capacity, "turn rejected, queue full");
            self.events.push(RigEvent::TurnRejected { mv });
            return Err(RigError::QueueFull { capacity });
        }
        self.queue.push_back(mv);
        tracing::debug!(%mv, pending = self.queue.len(), "turn queued");
        self.events.push(RigEvent::TurnQueued {
            mv,
            pending: self.queue.len(),
        });
        Ok(())
    }

    /// Request a turn from a notation token. Unrecognized notation is
    /// ignored and yields `Ok(false)`.
    pub fn request_notation(&mut self, notation: &str) -> Result<bool, RigError> {
        match notation.trim().parse::<Move>() {
            Ok(mv) => self.request(mv).map(|()| true),
            Err(err) => {
                tracing::debug!(notation, %err, "ignoring notation");
                Ok(false)
            }
        }
    }

    /// Request every move in order. Stops at the first refusal.
    pub fn request_sequence(&mut self, moves: &[Move]) -> Result<usize, RigError> {
        for mv in moves {
            self.request(*mv)?;
        }
        Ok(moves.len())
    }

    /// Ask the active turn to abort on the next frame. Does nothing while
    /// idle.
    pub fn cancel(&self) {
        if self.animator.is_idle() {
            return;
        }
        self.cancel.cancel();
    }

    fn start(&mut self, mv: Move) {
        self.cancel.clear();
        let Some(cubelets) = self.animator.begin(&self.registry, mv) else {
            return;
        };
        self.spin.pause();
        self.events.push(RigEvent::SpinPaused);
        self.events.push(RigEvent::TurnStarted { mv, cubelets });
    }

    fn resume_spin(&mut self) {
        self.spin.resume();
        self.events.push(RigEvent::SpinResumed);
    }

    /// One render frame.
    ///
    /// Advances the active turn by one increment, or the idle spin when no
    /// turn is active. A turn whose last increment lands here is
    /// reintegrated, the spin resumes, the logical move is applied and the
    /// surfaces are repainted, all within this frame. The next queued turn
    /// then starts.
    pub fn tick(&mut self) {
        self.frame += 1;

        if self.cancel.is_cancelled() {
            self.handle_cancel();
            return;
        }

        if self.animator.is_idle() {
            if self.spin.tick() {
                self.assembly.rotation = self.spin.rotation();
            }
            return;
        }

        self.animator.step(&mut self.registry, &self.cancel);
        if self.animator.phase() == TurnPhase::Reintegrating {
            self.finish_turn();
        }
    }

    fn finish_turn(&mut self) {
        let Some(mv) = self.animator.reintegrate(&mut self.registry) else {
            return;
        };
        self.resume_spin();
        apply_move(&mut self.state, mv);
        synchronize(&mut self.registry, &self.state, &self.palette);
        self.moves_applied += 1;
        let solved = self.state.is_solved();
        tracing::debug!(%mv, solved, frame = self.frame, "turn completed");
        self.events.push(RigEvent::TurnCompleted { mv, solved });

        if let Some(next) = self.queue.pop_front() {
            self.start(next);
        }
    }

    fn handle_cancel(&mut self) {
        if let TurnProgress::Cancelled(mv) = self.animator.step(&mut self.registry, &self.cancel) {
            tracing::debug!(%mv, dropped = self.queue.len(), "turn cancelled");
            self.events.push(RigEvent::TurnCancelled { mv });
            self.resume_spin();
        }
        self.queue.clear();
        self.cancel.clear();
    }

    /// Abort any turn, drop the queue and return to a freshly built solved
    /// cube with the spin at angle zero.
    pub fn reset(&mut self) {
        if let Some(mv) = self.animator.abort(&mut self.registry) {
            self.events.push(RigEvent::TurnCancelled { mv });
            self.events.push(RigEvent::SpinResumed);
        }
        self.queue.clear();
        self.cancel.clear();
        self.state = FaceletState::solved();
        self.registry = CubeletRegistry::build(*self.registry.config(), &self.palette);
        synchronize(&mut self.registry, &self.state, &self.palette);
        self.spin.reset();
        self.assembly = Transform::default();
        self.moves_applied = 0;
        tracing::debug!("rig reset");
        self.events.push(RigEvent::Reset);
    }

    /// Adopt an externally supplied state verbatim and repaint. Refused
    /// while a turn is active or queued.
    pub fn replace_state(&mut self, state: FaceletState) -> Result<(), RigError> {
        if !self.is_idle() {
            return Err(RigError::Busy);
        }
        let valid = state.validate().is_ok();
        self.state = state;
        synchronize(&mut self.registry, &self.state, &self.palette);
        self.events.push(RigEvent::StateReplaced { valid });
        Ok(())
    }

    /// Tick until idle or `max_ticks` frames have passed. Returns the number
    /// of frames run.
    pub fn run_until_idle(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while !self.is_idle() && ticks < max_ticks {
            self.tick();
            ticks += 1;
        }
        ticks
    }
}

impl Default for CubeRig {
    fn default() -> Self {
        Self::new(LatticeConfig::default(), AnimationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubespace_assembly::{LatticePos, SurfaceDir, facelet_position};
    use cubespace_common::Face;
    use cubespace_kernel::{apply_sequence, parse_sequence};
    use proptest::prelude::*;

    fn rig(steps: u32) -> CubeRig {
        CubeRig::new(
            LatticeConfig::default(),
            AnimationConfig {
                steps_per_quarter_turn: steps,
                ..AnimationConfig::default()
            },
        )
    }

    /// The geometry shows exactly the logical state.
    fn assert_geometry_matches(rig: &CubeRig) {
        let reg = rig.registry();
        assert_eq!(reg.len(), 27);
        for face in Face::ALL {
            for row in 0..3 {
                for col in 0..3 {
                    let c = reg.at(facelet_position(face, row, col)).unwrap();
                    assert_eq!(
                        c.facing(SurfaceDir::from_face(face)),
                        rig.palette().material_for(rig.state().sticker(face, row, col))
                    );
                }
            }
        }
    }

    #[test]
    fn new_rig_is_solved_and_spinning() {
        let mut rig = CubeRig::default();
        assert!(rig.is_solved());
        assert!(rig.is_idle());
        rig.tick();
        assert!(rig.spin().angle() > 0.0);
        assert!(!rig.assembly().rotation.abs_diff_eq(glam::Quat::IDENTITY, 1e-6));
        assert_geometry_matches(&rig);
    }

    #[test]
    fn logical_state_changes_only_on_the_last_frame() {
        let mut rig = rig(15);
        rig.request(Move::clockwise(Face::Right)).unwrap();
        for _ in 0..14 {
            rig.tick();
            assert_eq!(*rig.state(), FaceletState::solved());
        }
        assert_eq!(rig.phase(), TurnPhase::Rotating);
        rig.tick();
        assert_eq!(rig.phase(), TurnPhase::Idle);
        let mut expected = FaceletState::solved();
        apply_move(&mut expected, Move::clockwise(Face::Right));
        assert_eq!(*rig.state(), expected);
        assert_geometry_matches(&rig);
    }

    #[test]
    fn double_turn_takes_twice_as_long() {
        let mut rig = rig(15);
        rig.request(Move::double(Face::Up)).unwrap();
        assert_eq!(rig.run_until_idle(1000), 30);
        let mut expected = FaceletState::solved();
        apply_move(&mut expected, Move::clockwise(Face::Up));
        apply_move(&mut expected, Move::clockwise(Face::Up));
        assert_eq!(*rig.state(), expected);
        assert_geometry_matches(&rig);
    }

    #[test]
    fn requests_during_a_turn_are_queued_in_order() {
        let mut rig = rig(5);
        let moves = parse_sequence("R U R' U'").unwrap();
        rig.request_sequence(&moves).unwrap();
        assert_eq!(rig.queue_len(), 3);
        assert_eq!(rig.animator().active_move(), Some(moves[0]));

        rig.run_until_idle(1000);
        let completed: Vec<Move> = rig
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                RigEvent::TurnCompleted { mv, .. } => Some(mv),
                _ => None,
            })
            .collect();
        assert_eq!(completed, moves);
        assert_eq!(rig.moves_applied(), 4);
    }

    #[test]
    fn only_one_layer_rotates_at_a_time() {
        let mut rig = rig(3);
        rig.request_sequence(&parse_sequence("R U F").unwrap()).unwrap();
        while !rig.is_idle() {
            rig.tick();
            if let Some(group) = rig.active_group() {
                assert_eq!(group.len(), 9);
                assert_eq!(rig.registry().len(), 18);
            } else {
                assert_eq!(rig.registry().len(), 27);
            }
        }
    }

    #[test]
    fn full_queue_rejects() {
        let mut rig = CubeRig::new(
            LatticeConfig::default(),
            AnimationConfig {
                max_queued_turns: 2,
                ..AnimationConfig::default()
            },
        );
        rig.request(Move::clockwise(Face::Up)).unwrap();
        rig.request(Move::clockwise(Face::Down)).unwrap();
        rig.request(Move::clockwise(Face::Left)).unwrap();
        assert_eq!(
            rig.request(Move::clockwise(Face::Right)),
            Err(RigError::QueueFull { capacity: 2 })
        );
        assert!(rig.events().contains(&RigEvent::TurnRejected {
            mv: Move::clockwise(Face::Right)
        }));
        assert_eq!(rig.queue_len(), 2);
    }

    #[test]
    fn unknown_notation_is_ignored() {
        let mut rig = rig(5);
        assert_eq!(rig.request_notation("X"), Ok(false));
        assert_eq!(rig.request_notation("R3"), Ok(false));
        assert!(rig.is_idle());
        assert_eq!(rig.request_notation("F'"), Ok(true));
        assert_eq!(rig.animator().active_move(), Some(Move::prime(Face::Front)));
    }

    #[test]
    fn spin_pauses_for_the_turn_and_resumes_once() {
        let mut rig = rig(4);
        rig.tick();
        let angle = rig.spin().angle();
        rig.request(Move::clockwise(Face::Front)).unwrap();
        for _ in 0..4 {
            assert!(rig.spin().is_paused());
            rig.tick();
            assert_eq!(rig.spin().angle(), angle);
        }
        assert!(!rig.spin().is_paused());
        let events = rig.drain_events();
        let resumed = events.iter().filter(|e| **e == RigEvent::SpinResumed).count();
        let paused = events.iter().filter(|e| **e == RigEvent::SpinPaused).count();
        assert_eq!((paused, resumed), (1, 1));

        rig.tick();
        assert!(rig.spin().angle() > angle);
    }

    #[test]
    fn disabled_spin_stays_still() {
        let mut rig = rig(4);
        rig.set_spin_enabled(false);
        for _ in 0..10 {
            rig.tick();
        }
        assert_eq!(rig.spin().angle(), 0.0);
    }

    #[test]
    fn completion_reports_solved() {
        let mut rig = rig(2);
        rig.request_sequence(&parse_sequence("R R'").unwrap()).unwrap();
        rig.run_until_idle(100);
        let solved: Vec<bool> = rig
            .events()
            .iter()
            .filter_map(|e| match e {
                RigEvent::TurnCompleted { solved, .. } => Some(*solved),
                _ => None,
            })
            .collect();
        assert_eq!(solved, vec![false, true]);
    }

    #[test]
    fn cancel_abandons_turn_and_queue() {
        let mut rig = rig(10);
        rig.request_sequence(&parse_sequence("F R U").unwrap()).unwrap();
        for _ in 0..4 {
            rig.tick();
        }
        rig.cancel_token().cancel();
        rig.tick();

        assert!(rig.is_idle());
        assert_eq!(*rig.state(), FaceletState::solved());
        assert!(rig.events().contains(&RigEvent::TurnCancelled {
            mv: Move::clockwise(Face::Front)
        }));
        assert!(!rig.spin().is_paused());
        assert!(!rig.cancel_token().is_cancelled());
        for c in rig.registry().iter() {
            assert_eq!(c.lattice, c.home);
        }
        assert_geometry_matches(&rig);
    }

    #[test]
    fn idle_cancel_does_not_abort_the_next_turn() {
        let mut rig = rig(5);
        rig.cancel();
        assert!(!rig.cancel_token().is_cancelled());
        rig.request(Move::clockwise(Face::Right)).unwrap();
        rig.run_until_idle(1000);
        assert_eq!(rig.moves_applied(), 1);

        // A flag raised through a shared handle while idle is dropped when
        // the next turn starts.
        rig.cancel_token().cancel();
        rig.request(Move::clockwise(Face::Up)).unwrap();
        rig.run_until_idle(1000);
        assert_eq!(rig.moves_applied(), 2);
        assert!(
            !rig
                .events()
                .iter()
                .any(|e| matches!(e, RigEvent::TurnCancelled { .. }))
        );
    }

    #[test]
    fn reset_mid_turn_reports_spin_resumed() {
        let mut rig = rig(10);
        rig.request(Move::clockwise(Face::Right)).unwrap();
        rig.tick();
        rig.reset();

        let events = rig.drain_events();
        let paused = events.iter().filter(|e| **e == RigEvent::SpinPaused).count();
        let resumed = events.iter().filter(|e| **e == RigEvent::SpinResumed).count();
        assert_eq!(paused, 1);
        assert_eq!(resumed, 1);
        assert!(!rig.spin().is_paused());
        assert_eq!(events.last(), Some(&RigEvent::Reset));
    }

    #[test]
    fn reset_mid_turn_restores_solved() {
        let mut rig = rig(10);
        rig.request_sequence(&parse_sequence("R U").unwrap()).unwrap();
        rig.run_until_idle(12);
        rig.tick();
        rig.reset();

        assert!(rig.is_idle());
        assert!(rig.is_solved());
        assert_eq!(rig.moves_applied(), 0);
        assert_eq!(rig.spin().angle(), 0.0);
        assert_eq!(rig.registry().len(), 27);
        assert_eq!(rig.events().last(), Some(&RigEvent::Reset));
        let core = rig.registry().at(LatticePos::new(0, 0, 0));
        assert!(core.is_some());
        assert_geometry_matches(&rig);
    }

    #[test]
    fn replace_state_repaints_and_refuses_while_busy() {
        let mut rig = rig(5);
        let mut scrambled = FaceletState::solved();
        apply_sequence(&mut scrambled, &parse_sequence("F2 L D'").unwrap());

        rig.request(Move::clockwise(Face::Up)).unwrap();
        assert_eq!(rig.replace_state(scrambled), Err(RigError::Busy));
        rig.run_until_idle(100);

        rig.replace_state(scrambled).unwrap();
        assert_eq!(*rig.state(), scrambled);
        assert_eq!(rig.events().last(), Some(&RigEvent::StateReplaced { valid: true }));
        assert_geometry_matches(&rig);
    }

    #[test]
    fn invalid_state_is_adopted_anyway() {
        let mut rig = rig(5);
        let mut broken = FaceletState::solved();
        broken.face_mut(Face::Up)[0][0] = cubespace_common::Color::Red;
        rig.replace_state(broken).unwrap();
        assert_eq!(rig.events().last(), Some(&RigEvent::StateReplaced { valid: false }));
        assert_eq!(*rig.state(), broken);
    }

    proptest! {
        #[test]
        fn rig_agrees_with_move_engine(
            moves in prop::collection::vec(prop::sample::select(Move::all().collect::<Vec<_>>()), 0..12)
        ) {
            let mut rig = rig(2);
            rig.request_sequence(&moves).unwrap();
            rig.run_until_idle(10_000);
            let mut expected = FaceletState::solved();
            apply_sequence(&mut expected, &moves);
            prop_assert_eq!(*rig.state(), expected);
            prop_assert!(rig.is_idle());
            assert_geometry_matches(&rig);
        }
    }
}
