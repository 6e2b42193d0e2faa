//! Newton's method for a single nonlinear subsystem.
//!
//! # Algorithm
//!
//! Each iteration asks the backend for the correction `du` solving
//! `J(u) du = -r(u)` and updates the iterate. Boundary conditions are imposed
//! on the initial iterate; residuals and corrections are homogenized so the
//! constrained entries never move.
//!
//! The solver stops once
//!
//! ```text
//! ||r(u)|| <= max(rtol * ||r(u_0)||, atol)
//! ```
//!
//! # Damping
//!
//! With damping enabled (the default), a step `u + λ du` is accepted only if
//! it passes the monotonicity test `||r(u + λ du)|| <= (1 - λ/2) ||r(u)||`.
//! Otherwise `λ` is halved. Falling below the configured minimum damping is a
//! failure. Damping makes the iteration globally convergent from poor initial
//! guesses at the price of extra residual assemblies.
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] after each accepted update. Observers can
//! return [`Action::StopEarly`] to halt with the current iterate.

mod action;
mod config;
mod damping;
mod error;
mod event;
mod solution;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use pdeopt_core::{Field, Fields, Observer, PdeBackend, System, vector};
use tracing::{debug, info};

use damping::damped_update;

/// Solves subsystem `index` of `system` in place using Newton's method.
///
/// The iterate is read from and written back to `fields`.
///
/// # Errors
///
/// Returns an error if the subsystem does not exist, the backend fails, the
/// residual becomes non-finite, damping cannot find an acceptable step, or the
/// iteration limit is reached.
pub fn solve<B, Obs>(
    backend: &B,
    system: System,
    index: usize,
    fields: &mut Fields,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    B: PdeBackend,
    Obs: Observer<Event, Action>,
{
    if index >= fields.system(system).len() {
        return Err(Error::UnknownSubsystem { system, index });
    }

    backend.apply_bcs(system, index, &mut fields.system_mut(system)[index]);

    let mut residual = homogenized_residual(backend, system, index, fields)?;
    let mut norm = backend.norm(&residual);
    if !norm.is_finite() {
        return Err(Error::Diverged { iter: 0 });
    }

    let initial = norm;
    let tol = config.tolerance(initial);
    log_progress(config, system, index, 0, norm, 1.0);

    if norm <= tol {
        return Ok(Solution {
            status: Status::Converged,
            residual: norm,
            initial_residual: initial,
            iters: 0,
        });
    }

    for iter in 1..=config.max_iters() {
        let mut correction = backend
            .newton_correction(system, index, fields, &residual)
            .map_err(Error::backend)?;
        backend.homogenize_bcs(system, index, &mut correction);

        let damping = if config.damped() {
            let step = damped_update(backend, system, index, fields, &correction, norm, iter, config)?;
            residual = step.residual;
            norm = step.norm;
            step.damping
        } else {
            vector::axpy(1.0, &correction, &mut fields.system_mut(system)[index]);
            residual = homogenized_residual(backend, system, index, fields)?;
            norm = backend.norm(&residual);
            1.0
        };

        if !norm.is_finite() {
            return Err(Error::Diverged { iter });
        }

        let relative = norm / initial;
        log_progress(config, system, index, iter, norm, relative);

        let event = Event {
            system,
            index,
            iter,
            residual: norm,
            relative,
            damping,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Solution {
                status: Status::StoppedByObserver,
                residual: norm,
                initial_residual: initial,
                iters: iter,
            });
        }

        if norm <= tol {
            return Ok(Solution {
                status: Status::Converged,
                residual: norm,
                initial_residual: initial,
                iters: iter,
            });
        }
    }

    Err(Error::MaxIters {
        iters: config.max_iters(),
        residual: norm,
    })
}

/// Solves a subsystem using Newton's method without observation.
///
/// This is a convenience wrapper around [`solve`] that uses a no-op observer.
///
/// # Errors
///
/// Returns the same errors as [`solve`].
pub fn solve_unobserved<B>(
    backend: &B,
    system: System,
    index: usize,
    fields: &mut Fields,
    config: &Config,
) -> Result<Solution, Error>
where
    B: PdeBackend,
{
    solve(backend, system, index, fields, config, ())
}

/// Assembles the residual at the current fields and zeros constrained entries.
fn homogenized_residual<B: PdeBackend>(
    backend: &B,
    system: System,
    index: usize,
    fields: &Fields,
) -> Result<Field, Error> {
    let mut residual = backend
        .residual(system, index, fields)
        .map_err(Error::backend)?;
    backend.homogenize_bcs(system, index, &mut residual);
    Ok(residual)
}

fn log_progress(
    config: &Config,
    system: System,
    index: usize,
    iter: usize,
    residual: f64,
    relative: f64,
) {
    if config.verbose() {
        info!(%system, index, iter, residual, relative, "Newton iteration");
    } else {
        debug!(%system, index, iter, residual, relative, "Newton iteration");
    }
}
