use pdeopt_core::System;

/// Event emitted by the Newton solver after each accepted update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// The system being solved.
    pub system: System,

    /// The subsystem being solved.
    pub index: usize,

    /// The iteration number, starting at 1.
    pub iter: usize,

    /// Residual norm after the update.
    pub residual: f64,

    /// Residual norm relative to the initial residual.
    pub relative: f64,

    /// Damping factor of the accepted step (1 for a full step).
    pub damping: f64,
}
