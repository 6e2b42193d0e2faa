/// Indicates how the Newton solver terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Converged according to the configured tolerances.
    Converged,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of a Newton solve.
///
/// The solution itself is written back to the fields passed to the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Final solver status.
    pub status: Status,

    /// Final residual norm.
    pub residual: f64,

    /// Residual norm at the initial iterate.
    pub initial_residual: f64,

    /// Number of iterations performed.
    pub iters: usize,
}
