use thiserror::Error;

/// Configuration for the Armijo line search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    initial_stepsize: f64,
    epsilon: f64,
    beta: f64,
    min_step: f64,
}

/// Errors that can occur when validating a line search config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("initial_stepsize must be finite and positive")]
    InitialStepsize,

    #[error("epsilon_armijo must lie strictly between 0 and 1")]
    Epsilon,

    #[error("beta_armijo must be finite and greater than 1")]
    Beta,

    #[error("min_step must be finite and non-negative")]
    MinStep,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1.0, 1e-4, 2.0).unwrap()
    }
}

impl Config {
    /// Creates a new config.
    ///
    /// # Errors
    ///
    /// Returns an error if the step is not positive, `epsilon` is outside
    /// `(0, 1)` or `beta` is not greater than 1.
    pub fn new(initial_stepsize: f64, epsilon: f64, beta: f64) -> Result<Self, ConfigError> {
        if !initial_stepsize.is_finite() || initial_stepsize <= 0.0 {
            return Err(ConfigError::InitialStepsize);
        }
        if !(epsilon > 0.0 && epsilon < 1.0) {
            return Err(ConfigError::Epsilon);
        }
        if !beta.is_finite() || beta <= 1.0 {
            return Err(ConfigError::Beta);
        }

        Ok(Self {
            initial_stepsize,
            epsilon,
            beta,
            min_step: 1e-8,
        })
    }

    /// Sets the bound on `t * max ||d||_inf` below which the search breaks down.
    ///
    /// # Errors
    ///
    /// Returns an error if `min_step` is negative or non-finite.
    pub fn with_min_step(mut self, min_step: f64) -> Result<Self, ConfigError> {
        if !min_step.is_finite() || min_step < 0.0 {
            return Err(ConfigError::MinStep);
        }
        self.min_step = min_step;
        Ok(self)
    }

    #[must_use]
    pub fn initial_stepsize(&self) -> f64 {
        self.initial_stepsize
    }

    /// Returns the sufficient decrease parameter.
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns the backtracking factor.
    #[must_use]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    #[must_use]
    pub fn min_step(&self) -> f64 {
        self.min_step
    }
}
