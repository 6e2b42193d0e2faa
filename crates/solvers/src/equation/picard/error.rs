use std::error::Error as StdError;

use thiserror::Error;

use crate::equation::newton;

/// Errors that can occur during Picard iteration.
#[derive(Debug, Error)]
pub enum Error {
    #[error("backend error")]
    Backend(#[source] Box<dyn StdError + Send + Sync>),

    #[error("inner Newton solve of subsystem {index} failed")]
    Newton {
        index: usize,
        #[source]
        source: newton::Error,
    },

    #[error("invalid inner Newton config: {0}")]
    InnerConfig(#[from] newton::ConfigError),

    #[error("combined residual became non-finite at iteration {iter}")]
    Diverged { iter: usize },

    #[error(
        "Picard iteration did not converge in {iters} iterations \
         (residual {residual:e}, relative {relative:e})"
    )]
    MaxIters {
        iters: usize,
        residual: f64,
        relative: f64,
    },
}

impl Error {
    pub(crate) fn backend<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Backend(Box::new(err))
    }
}
