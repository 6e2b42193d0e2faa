use thiserror::Error;

/// Configuration for the Newton solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    rtol: f64,
    atol: f64,
    max_iters: usize,
    damped: bool,
    min_damping: f64,
    verbose: bool,
}

/// Errors that can occur when validating a Newton solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rtol must be finite and non-negative")]
    Rtol,

    #[error("atol must be finite and non-negative")]
    Atol,

    #[error("max_iters must be at least 1")]
    MaxIters,

    #[error("min_damping must be in (0, 1]")]
    MinDamping,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1e-10, 1e-10, 50).unwrap()
    }
}

impl Config {
    /// Creates a damped Newton config with validated tolerances.
    ///
    /// # Errors
    ///
    /// Returns an error if a tolerance is negative or non-finite, or if
    /// `max_iters` is zero.
    pub fn new(rtol: f64, atol: f64, max_iters: usize) -> Result<Self, ConfigError> {
        if !rtol.is_finite() || rtol < 0.0 {
            return Err(ConfigError::Rtol);
        }
        if !atol.is_finite() || atol < 0.0 {
            return Err(ConfigError::Atol);
        }
        if max_iters == 0 {
            return Err(ConfigError::MaxIters);
        }

        Ok(Self {
            rtol,
            atol,
            max_iters,
            damped: true,
            min_damping: 1e-6,
            verbose: false,
        })
    }

    /// Enables or disables step damping.
    #[must_use]
    pub fn with_damping(mut self, damped: bool) -> Self {
        self.damped = damped;
        self
    }

    /// Sets the smallest damping factor tried before giving up.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < min_damping <= 1`.
    pub fn with_min_damping(mut self, min_damping: f64) -> Result<Self, ConfigError> {
        if !(min_damping > 0.0 && min_damping <= 1.0) {
            return Err(ConfigError::MinDamping);
        }
        self.min_damping = min_damping;
        Ok(self)
    }

    /// Logs every iteration at `info` instead of `debug` level.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Returns the relative residual tolerance.
    #[must_use]
    pub fn rtol(&self) -> f64 {
        self.rtol
    }

    /// Returns the absolute residual tolerance.
    #[must_use]
    pub fn atol(&self) -> f64 {
        self.atol
    }

    /// Returns the maximum number of Newton iterations.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns whether steps are damped.
    #[must_use]
    pub fn damped(&self) -> bool {
        self.damped
    }

    /// Returns the smallest damping factor tried.
    #[must_use]
    pub fn min_damping(&self) -> f64 {
        self.min_damping
    }

    /// Returns whether iterations are logged at `info` level.
    #[must_use]
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Returns the residual norm at which the iteration stops.
    #[must_use]
    pub fn tolerance(&self, initial_residual: f64) -> f64 {
        (self.rtol * initial_residual).max(self.atol)
    }
}
