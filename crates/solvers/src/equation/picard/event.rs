use pdeopt_core::System;

/// Event emitted by the Picard solver for each outer iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// The system being solved.
    pub system: System,

    /// The outer iteration number, starting at 0.
    pub iter: usize,

    /// Combined residual norm over all subsystems.
    pub residual: f64,

    /// Combined residual relative to the first outer iteration.
    pub relative: f64,
}
