use thiserror::Error;

use crate::optimization;

use super::Report;

/// Errors that end a gradient descent run.
///
/// Every variant carries the [`Report`] of the run up to the failure.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Armijo rule failed")]
    LineSearchFailed { report: Report },

    #[error("maximum number of iterations exceeded")]
    MaxIters { report: Report },

    #[error("evaluation failed")]
    Evaluation {
        #[source]
        source: optimization::Error,
        report: Report,
    },
}

impl Error {
    /// Returns the statistics of the failed run.
    #[must_use]
    pub fn report(&self) -> &Report {
        match self {
            Self::LineSearchFailed { report }
            | Self::MaxIters { report }
            | Self::Evaluation { report, .. } => report,
        }
    }
}
