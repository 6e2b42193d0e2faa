//! Armijo backtracking line search.
//!
//! # Algorithm
//!
//! Starting from the stored step `t`, the search tries the controls
//! `c + t d` and accepts them once
//!
//! ```text
//! J(c + t d) < J(c) + epsilon * t * (g, d)
//! ```
//!
//! Each rejected trial divides `t` by `beta`. The search breaks down once
//! `t * max_i ||d_i||_inf` falls to the configured minimum step, restoring the
//! original controls.
//!
//! The step size persists between searches. Without curvature information an
//! accepted step is multiplied by `beta` for the next search, so the step can
//! recover after a run of short steps. With curvature information (a
//! Newton-like direction) every search starts from `t = 1`.
//!
//! # Observer Events
//!
//! The search emits one [`Event`] per trial step. Returning
//! [`Action::StopEarly`] restores the controls and reports the search as
//! broken.

mod action;
mod config;
mod event;
mod outcome;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use event::Event;
pub use outcome::Outcome;

use pdeopt_core::{ControlProblem, Field, Observer, PdeBackend, vector};
use tracing::debug;

use super::{Error, OptimizationProblem};

/// Armijo line search with a step size that persists across searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmijoLineSearch {
    config: Config,
    stepsize: f64,
}

impl ArmijoLineSearch {
    /// Creates a line search starting from `config.initial_stepsize()`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            stepsize: config.initial_stepsize(),
            config,
        }
    }

    /// Returns the step size the next search will try first.
    #[must_use]
    pub fn stepsize(&self) -> f64 {
        self.stepsize
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Searches along `directions` and moves the controls of `problem`.
    ///
    /// On acceptance the controls hold the accepted step and the state is
    /// solved there. A broken search or a failed trial evaluation leaves the
    /// original controls in place.
    ///
    /// # Errors
    ///
    /// Returns an error if a state solve or an evaluation of the problem fails.
    pub fn search<B, P, Obs>(
        &mut self,
        problem: &mut OptimizationProblem<'_, B, P>,
        directions: &[Field],
        has_curvature_info: bool,
        mut observer: Obs,
    ) -> Result<Outcome, Error>
    where
        B: PdeBackend,
        P: ControlProblem,
        Obs: Observer<Event, Action>,
    {
        let initial = problem.objective()?;
        let slope = problem.directional_derivative(directions)?;
        let max_norm = directions
            .iter()
            .map(|d| vector::norm_inf(d))
            .fold(0.0, f64::max);

        if has_curvature_info {
            self.stepsize = 1.0;
        }

        let saved = problem.controls().to_vec();
        let mut trials = 0;

        loop {
            let stepsize = self.stepsize;
            if stepsize * max_norm <= self.config.min_step() {
                debug!(stepsize, trials, "stepsize too small");
                restore(problem, &saved);
                return Ok(Outcome::Broken { stepsize, trials });
            }

            problem.update_controls(|controls| {
                for ((control, base), direction) in controls.iter_mut().zip(&saved).zip(directions) {
                    control.clone_from(base);
                    vector::axpy(stepsize, direction, control);
                }
            });
            let objective = match problem.objective() {
                Ok(objective) => objective,
                Err(err) => {
                    restore(problem, &saved);
                    return Err(err);
                }
            };
            let threshold = initial + self.config.epsilon() * stepsize * slope;
            trials += 1;

            debug!(trial = trials, stepsize, objective, threshold, "armijo trial");

            let event = Event {
                trial: trials,
                stepsize,
                objective,
                threshold,
            };
            if let Some(Action::StopEarly) = observer.observe(&event) {
                restore(problem, &saved);
                return Ok(Outcome::Broken { stepsize, trials });
            }

            if objective < threshold {
                if !has_curvature_info {
                    self.stepsize *= self.config.beta();
                }
                return Ok(Outcome::Accepted {
                    stepsize,
                    objective,
                    trials,
                });
            }

            self.stepsize /= self.config.beta();
        }
    }

    /// Searches along `directions` without observation.
    ///
    /// # Errors
    ///
    /// Returns an error if a state solve or an evaluation of the problem fails.
    pub fn search_unobserved<B, P>(
        &mut self,
        problem: &mut OptimizationProblem<'_, B, P>,
        directions: &[Field],
        has_curvature_info: bool,
    ) -> Result<Outcome, Error>
    where
        B: PdeBackend,
        P: ControlProblem,
    {
        self.search(problem, directions, has_curvature_info, ())
    }
}

fn restore<B, P>(problem: &mut OptimizationProblem<'_, B, P>, saved: &[Field])
where
    B: PdeBackend,
    P: ControlProblem,
{
    problem.update_controls(|controls| controls.clone_from_slice(saved));
}
