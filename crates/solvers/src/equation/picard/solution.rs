/// Indicates how the Picard solver terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Converged according to the configured tolerances.
    Converged,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of a Picard solve.
///
/// The iterates themselves are written back to the fields passed to the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Final solver status.
    pub status: Status,

    /// Final combined residual norm.
    pub residual: f64,

    /// Final combined residual relative to the first outer iteration.
    pub relative: f64,

    /// Number of completed outer updates.
    pub iters: usize,
}
