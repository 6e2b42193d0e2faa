use std::error::Error as StdError;

use pdeopt_core::System;
use thiserror::Error;

use crate::equation::{newton, picard};

/// Errors that can occur while solving a state or adjoint system.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{system} subsystem {index}: linear solve failed")]
    Linear {
        system: System,
        index: usize,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("{system} subsystem {index}: Newton solve failed")]
    Newton {
        system: System,
        index: usize,
        #[source]
        source: newton::Error,
    },

    #[error("{system} system: Picard iteration failed")]
    Picard {
        system: System,
        #[source]
        source: picard::Error,
    },
}
