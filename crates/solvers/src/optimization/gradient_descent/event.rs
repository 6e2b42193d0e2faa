/// Event emitted by gradient descent at the start of each iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// The iteration number, starting at 0.
    pub iteration: usize,

    /// Objective at the current controls.
    pub objective: f64,

    /// Norm of the gradient in the control scalar products.
    pub gradient_norm: f64,

    /// Gradient norm relative to iteration 0.
    pub relative_norm: f64,

    /// Step size the next line search will try first.
    pub stepsize: f64,
}
