use cubespace_kernel::Move;

/// A high-level action any input surface can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Request one layer turn.
    Turn(Move),
    /// Abort the turn in progress and drop the queue.
    Cancel,
    /// Return to the solved cube.
    Reset,
    /// Fetch a scramble from the solver service and play it.
    Scramble,
    /// Ask the solver service for a solution to the current state.
    Solve,
    /// Start or stop the idle spin.
    ToggleSpin,
    /// Unbound input.
    Noop,
}

impl Action {
    pub fn is_turn(&self) -> bool {
        matches!(self, Action::Turn(_))
    }
}
