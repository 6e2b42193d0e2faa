//! File-based settings for PDE-constrained optimization runs.
//!
//! Settings are read from TOML with three optional sections:
//!
//! ```toml
//! [state_equation]
//! picard_iteration = false
//! newton_damped = true
//!
//! [optimization_routine]
//! tolerance = 1e-3
//! maximum_iterations = 100
//!
//! [line_search]
//! beta_armijo = 2.0
//! ```
//!
//! Missing keys take their defaults and unknown keys are rejected. The
//! capitalized section names `StateEquation`, `OptimizationRoutine` and
//! `LineSearch` are accepted as well. Values are validated when converted
//! into solver configs.

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    equation::{newton, picard},
    optimization::{gradient_descent, line_search},
    pde::Strategy,
};

/// Errors that can occur when loading or converting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file `{path}`")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings")]
    Parse(#[from] toml::de::Error),

    #[error("invalid Newton settings")]
    Newton(#[from] newton::ConfigError),

    #[error("invalid Picard settings")]
    Picard(#[from] picard::ConfigError),

    #[error("invalid optimization routine settings")]
    Descent(#[from] gradient_descent::ConfigError),

    #[error("invalid line search settings")]
    LineSearch(#[from] line_search::ConfigError),
}

/// All settings of an optimization run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    #[serde(alias = "StateEquation")]
    pub state_equation: StateEquation,

    #[serde(alias = "OptimizationRoutine")]
    pub optimization_routine: OptimizationRoutine,

    #[serde(alias = "LineSearch")]
    pub line_search: LineSearch,
}

/// How state and adjoint systems are solved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StateEquation {
    pub is_linear: bool,
    pub picard_iteration: bool,
    pub picard_rtol: f64,
    pub picard_atol: f64,
    pub picard_iter: usize,
    pub picard_verbose: bool,
    pub inner_newton_rtol: f64,
    pub inner_newton_atol: f64,
    pub newton_iter: usize,
    pub newton_damped: bool,
    pub newton_verbose: bool,
}

impl Default for StateEquation {
    fn default() -> Self {
        Self {
            is_linear: false,
            picard_iteration: false,
            picard_rtol: 1e-10,
            picard_atol: 1e-20,
            picard_iter: 50,
            picard_verbose: false,
            inner_newton_rtol: 1e-10,
            inner_newton_atol: 1e-10,
            newton_iter: 50,
            newton_damped: true,
            newton_verbose: true,
        }
    }
}

/// Termination and reporting of the descent loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizationRoutine {
    pub tolerance: f64,
    pub maximum_iterations: usize,
    pub soft_exit: bool,
    pub verbose: bool,
}

impl Default for OptimizationRoutine {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            maximum_iterations: 100,
            soft_exit: false,
            verbose: true,
        }
    }
}

/// Parameters of the Armijo rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineSearch {
    pub initial_stepsize: f64,
    pub epsilon_armijo: f64,
    pub beta_armijo: f64,
}

impl Default for LineSearch {
    fn default() -> Self {
        Self {
            initial_stepsize: 1.0,
            epsilon_armijo: 1e-4,
            beta_armijo: 2.0,
        }
    }
}

impl Settings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML, a value has the wrong
    /// type, or a key is unknown.
    pub fn from_toml(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Returns the strategy for the state system.
    ///
    /// Picard iteration takes precedence over `is_linear`. Without either,
    /// each subsystem is solved with Newton's method.
    ///
    /// # Errors
    ///
    /// Returns an error if a tolerance or iteration limit is invalid.
    pub fn state_strategy(&self) -> Result<Strategy, SettingsError> {
        let state = &self.state_equation;
        if state.picard_iteration {
            return Ok(Strategy::Picard(self.picard_config()?));
        }
        if state.is_linear {
            return Ok(Strategy::Linear);
        }

        let config = newton::Config::new(
            state.inner_newton_rtol,
            state.inner_newton_atol,
            state.newton_iter,
        )?
        .with_damping(state.newton_damped)
        .with_verbose(state.newton_verbose);
        Ok(Strategy::Newton(config))
    }

    /// Returns the strategy for the adjoint system.
    ///
    /// Adjoint systems are linear, so each subsystem is solved directly unless
    /// the subsystems are coupled through Picard iteration.
    ///
    /// # Errors
    ///
    /// Returns an error if a Picard setting is invalid.
    pub fn adjoint_strategy(&self) -> Result<Strategy, SettingsError> {
        if self.state_equation.picard_iteration {
            Ok(Strategy::Picard(self.picard_config()?))
        } else {
            Ok(Strategy::Linear)
        }
    }

    /// Returns the gradient descent config, including its line search.
    ///
    /// # Errors
    ///
    /// Returns an error if a routine or line search setting is invalid.
    pub fn descent_config(&self) -> Result<gradient_descent::Config, SettingsError> {
        let routine = &self.optimization_routine;
        let search = &self.line_search;

        let line_search = line_search::Config::new(
            search.initial_stepsize,
            search.epsilon_armijo,
            search.beta_armijo,
        )?;
        let config = gradient_descent::Config::new(routine.tolerance, routine.maximum_iterations)?
            .with_soft_exit(routine.soft_exit)
            .with_verbose(routine.verbose)
            .with_line_search(line_search);
        Ok(config)
    }

    fn picard_config(&self) -> Result<picard::Config, SettingsError> {
        let state = &self.state_equation;
        let config = picard::Config::new(
            state.picard_rtol,
            state.picard_atol,
            state.picard_iter,
            state.inner_newton_atol,
        )?
        .with_newton_max_iters(state.newton_iter)?
        .with_verbose(state.picard_verbose);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn empty_text_gives_defaults() {
        let settings = Settings::from_toml("").expect("empty settings are valid");
        assert_eq!(settings, Settings::default());

        assert_eq!(
            settings.state_strategy().unwrap(),
            Strategy::Newton(newton::Config::default().with_verbose(true))
        );
        assert_eq!(settings.adjoint_strategy().unwrap(), Strategy::Linear);
        assert_eq!(
            settings.descent_config().unwrap(),
            gradient_descent::Config::default()
        );
    }

    #[test]
    fn parses_sections_and_aliases() {
        let settings = Settings::from_toml(
            r#"
            [StateEquation]
            picard_iteration = true
            picard_rtol = 1e-8
            picard_iter = 20

            [optimization_routine]
            tolerance = 1e-5
            soft_exit = true

            [LineSearch]
            beta_armijo = 4.0
            "#,
        )
        .expect("valid settings");

        assert!(settings.state_equation.picard_iteration);
        assert_eq!(settings.state_equation.picard_iter, 20);
        assert!(settings.optimization_routine.soft_exit);
        assert_eq!(settings.optimization_routine.maximum_iterations, 100);

        let Strategy::Picard(picard) = settings.state_strategy().unwrap() else {
            panic!("expected Picard state strategy");
        };
        assert_relative_eq!(picard.rtol(), 1e-8);
        assert_relative_eq!(picard.atol(), 1e-20);
        assert_eq!(picard.max_iters(), 20);
        assert!(matches!(
            settings.adjoint_strategy().unwrap(),
            Strategy::Picard(_)
        ));

        let descent = settings.descent_config().unwrap();
        assert_relative_eq!(descent.tolerance(), 1e-5);
        assert!(descent.soft_exit());
        assert_relative_eq!(descent.line_search().beta(), 4.0);
    }

    #[test]
    fn linear_state_skips_newton() {
        let settings = Settings::from_toml("[state_equation]\nis_linear = true\n").unwrap();
        assert_eq!(settings.state_strategy().unwrap(), Strategy::Linear);
    }

    #[test]
    fn undamped_newton_from_settings() {
        let settings = Settings::from_toml(
            "[state_equation]\nnewton_damped = false\ninner_newton_rtol = 1e-6\n",
        )
        .unwrap();

        let Strategy::Newton(config) = settings.state_strategy().unwrap() else {
            panic!("expected Newton state strategy");
        };
        assert!(!config.damped());
        assert!(config.verbose());
        assert_relative_eq!(config.rtol(), 1e-6);
    }

    #[test]
    fn newton_iterations_can_be_quiet() {
        let settings = Settings::from_toml("[state_equation]\nnewton_verbose = false\n").unwrap();

        let Strategy::Newton(config) = settings.state_strategy().unwrap() else {
            panic!("expected Newton state strategy");
        };
        assert!(!config.verbose());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = Settings::from_toml("[line_search]\nmethod = \"armijo\"\n");
        assert!(matches!(result, Err(SettingsError::Parse(_))));

        let result = Settings::from_toml("[Regularization]\nmu = 1.0\n");
        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }

    #[test]
    fn invalid_values_fail_conversion() {
        let settings = Settings::from_toml("[line_search]\nbeta_armijo = 0.5\n").unwrap();
        assert!(matches!(
            settings.descent_config(),
            Err(SettingsError::LineSearch(line_search::ConfigError::Beta))
        ));

        let settings = Settings::from_toml("[state_equation]\ninner_newton_atol = -1.0\n").unwrap();
        assert!(matches!(
            settings.state_strategy(),
            Err(SettingsError::Newton(newton::ConfigError::Atol))
        ));

        let settings = Settings::from_toml("[optimization_routine]\nmaximum_iterations = 0\n").unwrap();
        assert!(matches!(
            settings.descent_config(),
            Err(SettingsError::Descent(gradient_descent::ConfigError::MaxIters))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = Settings::from_file("does/not/exist.toml");
        assert!(matches!(result, Err(SettingsError::Io { .. })));
    }
}
