use thiserror::Error;

/// Configuration for the Picard solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    rtol: f64,
    atol: f64,
    max_iters: usize,
    inner_atol: f64,
    newton_max_iters: usize,
    verbose: bool,
}

/// Errors that can occur when validating a Picard solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rtol must be finite and non-negative")]
    Rtol,

    #[error("atol must be finite and non-negative")]
    Atol,

    #[error("inner_atol must be finite and non-negative")]
    InnerAtol,

    #[error("newton_max_iters must be at least 1")]
    NewtonMaxIters,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1e-10, 1e-20, 50, 1e-10).unwrap()
    }
}

impl Config {
    /// Creates a new config with validated tolerances.
    ///
    /// `inner_atol` scales the first residual of each subsystem into the
    /// absolute tolerance of its inner Newton solves.
    ///
    /// # Errors
    ///
    /// Returns an error if any tolerance is negative or non-finite.
    pub fn new(
        rtol: f64,
        atol: f64,
        max_iters: usize,
        inner_atol: f64,
    ) -> Result<Self, ConfigError> {
        if !rtol.is_finite() || rtol < 0.0 {
            return Err(ConfigError::Rtol);
        }
        if !atol.is_finite() || atol < 0.0 {
            return Err(ConfigError::Atol);
        }
        if !inner_atol.is_finite() || inner_atol < 0.0 {
            return Err(ConfigError::InnerAtol);
        }

        Ok(Self {
            rtol,
            atol,
            max_iters,
            inner_atol,
            newton_max_iters: 50,
            verbose: false,
        })
    }

    /// Sets the iteration limit of the inner Newton solves.
    ///
    /// # Errors
    ///
    /// Returns an error if `newton_max_iters` is zero.
    pub fn with_newton_max_iters(mut self, newton_max_iters: usize) -> Result<Self, ConfigError> {
        if newton_max_iters == 0 {
            return Err(ConfigError::NewtonMaxIters);
        }
        self.newton_max_iters = newton_max_iters;
        Ok(self)
    }

    /// Logs every outer iteration at `info` instead of `debug` level.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Returns the relative tolerance on the combined residual.
    #[must_use]
    pub fn rtol(&self) -> f64 {
        self.rtol
    }

    /// Returns the absolute tolerance on the combined residual.
    #[must_use]
    pub fn atol(&self) -> f64 {
        self.atol
    }

    /// Returns the maximum number of outer iterations.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the scale for inner absolute tolerances.
    #[must_use]
    pub fn inner_atol(&self) -> f64 {
        self.inner_atol
    }

    /// Returns the iteration limit of the inner Newton solves.
    #[must_use]
    pub fn newton_max_iters(&self) -> usize {
        self.newton_max_iters
    }

    /// Returns whether outer iterations are logged at `info` level.
    #[must_use]
    pub fn verbose(&self) -> bool {
        self.verbose
    }
}
