//! Gradient descent with Armijo line search.
//!
//! # Algorithm
//!
//! Each iteration computes the gradient `g` at the current controls, checks
//! the relative stationarity measure
//!
//! ```text
//! ||g_k|| / ||g_0|| <= tolerance
//! ```
//!
//! and otherwise searches along `d = -g` with an [`ArmijoLineSearch`]. The
//! state at the accepted step is kept, so each iteration costs one adjoint
//! solve plus one state solve per trial step.
//!
//! # Termination
//!
//! A broken line search or reaching the iteration limit ends the run. With
//! `soft_exit` these are reported through [`Status`]; otherwise they are
//! errors. Every termination path produces a [`Report`] with the final
//! statistics.
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] per iteration, before the convergence check.
//! Observers can return [`Action::StopEarly`] to keep the current controls.
//! [`minimize_with_search_observer`] additionally forwards the events of every
//! line search trial.
//!
//! [`ArmijoLineSearch`]: super::line_search::ArmijoLineSearch

mod action;
mod config;
mod error;
mod event;
mod report;
mod solution;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use report::{Report, Sci};
pub use solution::{Solution, Status};

use pdeopt_core::{ControlProblem, Field, Observer, PdeBackend, vector};
use tracing::{debug, error, info, warn};

use super::{
    OptimizationProblem,
    line_search::{self, ArmijoLineSearch, Outcome},
};

/// Minimizes the objective of `problem` by gradient descent.
///
/// The controls of `problem` are updated in place and hold the final iterate
/// on return, including on error.
///
/// # Errors
///
/// Returns an error if a solve or evaluation fails, or, without `soft_exit`,
/// if the line search breaks down or the iteration limit is reached.
pub fn minimize<B, P, Obs>(
    problem: &mut OptimizationProblem<'_, B, P>,
    config: &Config,
    observer: Obs,
) -> Result<Solution, Error>
where
    B: PdeBackend,
    P: ControlProblem,
    Obs: Observer<Event, Action>,
{
    minimize_with_search_observer(problem, config, observer, ())
}

/// Minimizes the objective of `problem`, also observing every line search.
///
/// `search_observer` receives the [`line_search::Event`] of each trial step
/// in every iteration and may abandon a search with
/// [`line_search::Action::StopEarly`], which ends the run like a broken
/// Armijo rule.
///
/// # Errors
///
/// See [`minimize`].
pub fn minimize_with_search_observer<B, P, Obs, SearchObs>(
    problem: &mut OptimizationProblem<'_, B, P>,
    config: &Config,
    mut observer: Obs,
    mut search_observer: SearchObs,
) -> Result<Solution, Error>
where
    B: PdeBackend,
    P: ControlProblem,
    Obs: Observer<Event, Action>,
    SearchObs: Observer<line_search::Event, line_search::Action>,
{
    let mut progress = Progress::default();
    let mut line_search = ArmijoLineSearch::new(*config.line_search());

    problem.invalidate_state();
    let termination = iterate(
        problem,
        config,
        &mut line_search,
        &mut progress,
        &mut observer,
        &mut search_observer,
    );

    let report = Report {
        iterations: progress.iteration,
        objective: progress.objective,
        relative_norm: progress.relative_norm,
        state_solves: problem.state_solves(),
        adjoint_solves: problem.adjoint_solves(),
    };

    let status = match termination {
        Ok(Termination::Converged) => Status::Converged,
        Ok(Termination::StoppedByObserver) => Status::StoppedByObserver,
        Ok(Termination::LineSearchFailed) if config.soft_exit() => {
            warn!("Armijo rule failed.");
            Status::LineSearchFailed
        }
        Ok(Termination::LineSearchFailed) => {
            error!("Armijo rule failed.");
            log_report(config, &report);
            return Err(Error::LineSearchFailed { report });
        }
        Ok(Termination::MaxIters) if config.soft_exit() => {
            warn!("Maximum number of iterations exceeded.");
            Status::MaxIters
        }
        Ok(Termination::MaxIters) => {
            error!("Maximum number of iterations exceeded.");
            log_report(config, &report);
            return Err(Error::MaxIters { report });
        }
        Err(source) => {
            error!(error = %source, "evaluation failed");
            log_report(config, &report);
            return Err(Error::Evaluation { source, report });
        }
    };

    log_report(config, &report);
    Ok(Solution { status, report })
}

/// Minimizes the objective of `problem` without observation.
///
/// # Errors
///
/// See [`minimize`].
pub fn minimize_unobserved<B, P>(
    problem: &mut OptimizationProblem<'_, B, P>,
    config: &Config,
) -> Result<Solution, Error>
where
    B: PdeBackend,
    P: ControlProblem,
{
    minimize(problem, config, ())
}

/// Why the iteration loop ended.
enum Termination {
    Converged,
    StoppedByObserver,
    LineSearchFailed,
    MaxIters,
}

/// Values reported when the run ends.
struct Progress {
    iteration: usize,
    objective: f64,
    relative_norm: f64,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            iteration: 0,
            objective: f64::NAN,
            relative_norm: 1.0,
        }
    }
}

fn iterate<B, P, Obs, SearchObs>(
    problem: &mut OptimizationProblem<'_, B, P>,
    config: &Config,
    line_search: &mut ArmijoLineSearch,
    progress: &mut Progress,
    observer: &mut Obs,
    search_observer: &mut SearchObs,
) -> Result<Termination, super::Error>
where
    B: PdeBackend,
    P: ControlProblem,
    Obs: Observer<Event, Action>,
    SearchObs: Observer<line_search::Event, line_search::Action>,
{
    let mut initial_norm = 0.0;

    loop {
        problem.invalidate_adjoint();
        problem.solve_gradient()?;
        let gradient_norm = problem.stationarity_measure_squared()?.sqrt();
        progress.objective = problem.objective()?;

        if progress.iteration == 0 {
            initial_norm = gradient_norm;
            if initial_norm == 0.0 {
                return Ok(Termination::Converged);
            }
        }

        progress.relative_norm = gradient_norm / initial_norm;
        log_iteration(config, progress, line_search.stepsize());

        let event = Event {
            iteration: progress.iteration,
            objective: progress.objective,
            gradient_norm,
            relative_norm: progress.relative_norm,
            stepsize: line_search.stepsize(),
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Termination::StoppedByObserver);
        }

        if progress.relative_norm <= config.tolerance() {
            return Ok(Termination::Converged);
        }

        let directions: Vec<Field> = problem.gradients().iter().map(|g| vector::negated(g)).collect();
        let outcome = line_search.search(problem, &directions, false, |event: &line_search::Event| {
            search_observer.observe(event)
        })?;
        match outcome {
            Outcome::Accepted { objective, .. } => progress.objective = objective,
            Outcome::Broken { .. } => return Ok(Termination::LineSearchFailed),
        }

        progress.iteration += 1;
        if progress.iteration >= config.max_iters() {
            return Ok(Termination::MaxIters);
        }
    }
}

fn log_iteration(config: &Config, progress: &Progress, stepsize: f64) {
    let (iter, obj, rel, step) = (
        progress.iteration,
        Sci(progress.objective),
        Sci(progress.relative_norm),
        Sci(stepsize),
    );
    if config.verbose() {
        info!("Iteration {iter:4} - Objective value: {obj}    Gradient norm: {rel} (rel)    Step size: {step}");
    } else {
        debug!("Iteration {iter:4} - Objective value: {obj}    Gradient norm: {rel} (rel)    Step size: {step}");
    }
}

fn log_report(config: &Config, report: &Report) {
    if config.verbose() {
        info!("{report}");
    } else {
        debug!("{report}");
    }
}
