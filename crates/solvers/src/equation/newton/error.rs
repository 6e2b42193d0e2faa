use std::error::Error as StdError;

use pdeopt_core::System;
use thiserror::Error;

/// Errors that can occur during a Newton solve.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{system} subsystem {index} does not exist")]
    UnknownSubsystem { system: System, index: usize },

    #[error("backend error")]
    Backend(#[source] Box<dyn StdError + Send + Sync>),

    #[error("residual became non-finite at iteration {iter}")]
    Diverged { iter: usize },

    #[error("no acceptable step above damping {min_damping:e} at iteration {iter}")]
    DampingFailed { iter: usize, min_damping: f64 },

    #[error("no convergence after {iters} iterations (residual {residual:e})")]
    MaxIters { iters: usize, residual: f64 },
}

impl Error {
    pub(crate) fn backend<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Backend(Box::new(err))
    }
}
