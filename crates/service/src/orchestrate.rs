use crate::client::SolverService;
use crate::error::ServiceError;
use crate::protocol::{SCRAMBLE_PREFIX, extract_scramble_line};
use cubespace_animate::{CubeRig, RigError};
use cubespace_kernel::{Move, parse_sequence_lenient};

#[derive(Debug, thiserror::Error)]
pub enum OrchestrateError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Rig(#[from] RigError),
}

/// A scramble accepted from the service and queued on the rig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scramble {
    /// The move text as the service sent it.
    pub text: String,
    pub moves: Vec<Move>,
}

/// Fetch a scramble, then reset the rig and queue its moves.
///
/// The rig is only touched once the scramble has been fetched, parsed and
/// found to fit the turn queue; every earlier failure leaves it as it was.
pub fn run_scramble(service: &dyn SolverService, rig: &mut CubeRig) -> Result<Scramble, OrchestrateError> {
    let _span = tracing::info_span!("scramble").entered();
    let output = service.fetch_scramble()?;
    let text = extract_scramble_line(&output)
        .ok_or(ServiceError::MissingScramble {
            prefix: SCRAMBLE_PREFIX,
        })?
        .to_string();
    let moves = parse_sequence_lenient(&text);

    // One move starts immediately; the rest wait in the queue.
    let capacity = rig.config().max_queued_turns;
    if moves.len() > capacity + 1 {
        return Err(RigError::QueueFull { capacity }.into());
    }

    rig.reset();
    rig.request_sequence(&moves)?;
    tracing::info!(moves = moves.len(), %text, "scramble queued");
    Ok(Scramble { text, moves })
}

/// Ask the service to solve the rig's current state. The answer is returned
/// for display and never applied.
pub fn request_solution(service: &dyn SolverService, rig: &CubeRig) -> Result<String, ServiceError> {
    let _span = tracing::info_span!("solve").entered();
    let solution = service.request_solution(rig.state())?;
    tracing::info!(%solution, "solution received");
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubespace_animate::AnimationConfig;
    use cubespace_common::Face;
    use cubespace_kernel::{FaceletState, apply_sequence};
    use std::cell::RefCell;

    /// In-process stand-in for the service.
    #[derive(Default)]
    struct FakeService {
        scramble: Option<String>,
        solution: Option<String>,
        seen_states: RefCell<Vec<FaceletState>>,
    }

    impl SolverService for FakeService {
        fn fetch_scramble(&self) -> Result<String, ServiceError> {
            self.scramble
                .clone()
                .ok_or_else(|| ServiceError::Malformed("offline".to_string()))
        }

        fn request_solution(&self, state: &FaceletState) -> Result<String, ServiceError> {
            self.seen_states.borrow_mut().push(*state);
            self.solution
                .clone()
                .ok_or_else(|| ServiceError::Rejected("Invalid cube state".to_string()))
        }
    }

    fn rig() -> CubeRig {
        CubeRig::new(
            Default::default(),
            AnimationConfig {
                steps_per_quarter_turn: 3,
                ..AnimationConfig::default()
            },
        )
    }

    #[test]
    fn scramble_resets_and_plays_moves() {
        let service = FakeService {
            scramble: Some("seed 42\nScramble sequence used: R U' F2 X\nvalid: True\n".to_string()),
            ..FakeService::default()
        };
        let mut rig = rig();
        rig.request(Move::clockwise(Face::Back)).unwrap();
        rig.run_until_idle(100);

        let scramble = run_scramble(&service, &mut rig).unwrap();
        assert_eq!(scramble.text, "R U' F2 X");
        assert_eq!(scramble.moves.len(), 3);
        rig.run_until_idle(1000);

        let mut expected = FaceletState::solved();
        apply_sequence(&mut expected, &scramble.moves);
        assert_eq!(*rig.state(), expected);
    }

    #[test]
    fn failed_fetch_leaves_cube_alone() {
        let service = FakeService::default();
        let mut rig = rig();
        rig.request(Move::clockwise(Face::Left)).unwrap();
        rig.run_until_idle(100);
        let before = *rig.state();

        let err = run_scramble(&service, &mut rig).unwrap_err();
        assert!(matches!(err, OrchestrateError::Service(ServiceError::Malformed(_))));
        assert_eq!(*rig.state(), before);
        assert_eq!(rig.moves_applied(), 1);
    }

    #[test]
    fn missing_marker_leaves_cube_alone() {
        let service = FakeService {
            scramble: Some("R U F".to_string()),
            ..FakeService::default()
        };
        let mut rig = rig();
        rig.request(Move::clockwise(Face::Up)).unwrap();
        let err = run_scramble(&service, &mut rig).unwrap_err();
        assert!(matches!(
            err,
            OrchestrateError::Service(ServiceError::MissingScramble { .. })
        ));
        assert_eq!(rig.animator().active_move(), Some(Move::clockwise(Face::Up)));
    }

    #[test]
    fn oversized_scramble_is_refused_before_reset() {
        let service = FakeService {
            scramble: Some(format!("Scramble sequence used: {}", "R ".repeat(70))),
            ..FakeService::default()
        };
        let mut rig = rig();
        rig.request(Move::clockwise(Face::Up)).unwrap();
        rig.run_until_idle(100);
        let err = run_scramble(&service, &mut rig).unwrap_err();
        assert!(matches!(err, OrchestrateError::Rig(RigError::QueueFull { capacity: 64 })));
        assert_eq!(rig.moves_applied(), 1);
    }

    #[test]
    fn solve_sends_current_state_and_applies_nothing() {
        let service = FakeService {
            solution: Some("R'".to_string()),
            ..FakeService::default()
        };
        let mut rig = rig();
        rig.request(Move::clockwise(Face::Right)).unwrap();
        rig.run_until_idle(100);
        let state = *rig.state();

        assert_eq!(request_solution(&service, &rig).unwrap(), "R'");
        assert_eq!(service.seen_states.borrow().as_slice(), &[state]);
        assert_eq!(*rig.state(), state);
        assert!(rig.is_idle());
    }

    #[test]
    fn solve_error_is_surfaced() {
        let service = FakeService::default();
        let rig = rig();
        let err = request_solution(&service, &rig).unwrap_err();
        assert_eq!(err.to_string(), "service reported an error: Invalid cube state");
    }
}
