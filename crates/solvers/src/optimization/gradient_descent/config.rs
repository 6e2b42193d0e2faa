use thiserror::Error;

use crate::optimization::line_search;

/// Configuration for gradient descent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    tolerance: f64,
    max_iters: usize,
    soft_exit: bool,
    verbose: bool,
    line_search: line_search::Config,
}

/// Errors that can occur when validating a gradient descent config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tolerance must be finite and non-negative")]
    Tolerance,

    #[error("maximum_iterations must be at least 1")]
    MaxIters,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1e-3, 100).unwrap()
    }
}

impl Config {
    /// Creates a new config with the default line search.
    ///
    /// Runs are verbose and fail hard by default.
    ///
    /// # Errors
    ///
    /// Returns an error if `tolerance` is negative or non-finite, or if
    /// `max_iters` is zero.
    pub fn new(tolerance: f64, max_iters: usize) -> Result<Self, ConfigError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::Tolerance);
        }
        if max_iters == 0 {
            return Err(ConfigError::MaxIters);
        }

        Ok(Self {
            tolerance,
            max_iters,
            soft_exit: false,
            verbose: true,
            line_search: line_search::Config::default(),
        })
    }

    /// Reports line search failure and the iteration limit through the
    /// solution status instead of an error.
    #[must_use]
    pub fn with_soft_exit(mut self, soft_exit: bool) -> Self {
        self.soft_exit = soft_exit;
        self
    }

    /// Logs iterations and the final report at `info` instead of `debug` level.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn with_line_search(mut self, line_search: line_search::Config) -> Self {
        self.line_search = line_search;
        self
    }

    /// Returns the tolerance on the relative gradient norm.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    #[must_use]
    pub fn soft_exit(&self) -> bool {
        self.soft_exit
    }

    #[must_use]
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    #[must_use]
    pub fn line_search(&self) -> &line_search::Config {
        &self.line_search
    }
}
