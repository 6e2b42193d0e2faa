use super::Report;

/// Indicates how gradient descent terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The relative gradient norm reached the tolerance.
    Converged,

    /// The line search broke down and `soft_exit` was set.
    LineSearchFailed,

    /// The iteration limit was reached and `soft_exit` was set.
    MaxIters,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of a gradient descent run.
///
/// The final controls remain in the optimization problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub status: Status,
    pub report: Report,
}
