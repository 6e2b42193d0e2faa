use crate::equation::{newton, picard};

/// How the subsystems of a system are solved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// One direct linear solve per subsystem, in order.
    Linear,

    /// One Newton solve per subsystem, in order.
    Newton(newton::Config),

    /// Picard iteration over all subsystems.
    Picard(picard::Config),
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Newton(newton::Config::default())
    }
}
