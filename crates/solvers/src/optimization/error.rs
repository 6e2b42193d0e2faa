use std::error::Error as StdError;

use thiserror::Error;

use crate::pde;

/// Errors that can occur while evaluating an optimization problem.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Pde(#[from] pde::Error),

    #[error("control problem evaluation failed")]
    Problem(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn problem<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Problem(Box::new(err))
    }
}
