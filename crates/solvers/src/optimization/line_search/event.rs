/// Event emitted by the line search after each trial step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// The trial number, starting at 1.
    pub trial: usize,

    /// Step size of this trial.
    pub stepsize: f64,

    /// Objective at the trial controls.
    pub objective: f64,

    /// Sufficient decrease threshold the objective must fall below.
    pub threshold: f64,
}
