//! Picard (fixed-point) iteration over coupled subsystems.
//!
//! # Algorithm
//!
//! Each outer iteration assembles the residual of every subsystem, zeros the
//! constrained entries and combines the norms:
//!
//! ```text
//! res = sqrt(sum_j ||r_j||²)
//! ```
//!
//! The iteration stops once `res / res_0 < rtol` or `res < atol`. Otherwise
//! every subsystem is updated in turn with an undamped Newton solve, using the
//! freshest values of the others (Gauss-Seidel ordering). The inner relative
//! tolerance `min(0.9 res, 0.9)` tightens as the outer iterate converges.
//!
//! # Inner absolute tolerances
//!
//! The first outer iteration records, per subsystem, an absolute tolerance
//! `||r_j(u_0)|| * inner_atol`, falling back to `inner_atol` when that
//! residual is exactly zero. These are kept in [`InnerTolerances`] and reused
//! by later solves that pass the same value.
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] per outer iteration, after the residual is
//! assembled and before the convergence check.

mod action;
mod config;
mod error;
mod event;
mod inner;
mod solution;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use inner::InnerTolerances;
pub use solution::{Solution, Status};

use pdeopt_core::{Fields, Observer, PdeBackend, System};
use tracing::{debug, info};

use crate::equation::newton;

/// Solves all subsystems of `system` with Picard iteration.
///
/// # Errors
///
/// Returns an error if the backend or an inner Newton solve fails, if the
/// combined residual becomes non-finite, or if the outer iteration limit is
/// reached without convergence.
pub fn solve<B, Obs>(
    backend: &B,
    system: System,
    fields: &mut Fields,
    config: &Config,
    inner: &mut InnerTolerances,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    B: PdeBackend,
    Obs: Observer<Event, Action>,
{
    let count = fields.system(system).len();
    let mut initial = None;
    let mut iter = 0;

    loop {
        let mut norms = Vec::with_capacity(count);
        for index in 0..count {
            let mut residual = backend
                .residual(system, index, fields)
                .map_err(Error::backend)?;
            backend.homogenize_bcs(system, index, &mut residual);
            norms.push(backend.norm(&residual));
        }
        inner.record(&norms, config.inner_atol());

        let squared: f64 = norms.iter().map(|n| n * n).sum();
        if squared == 0.0 {
            return Ok(Solution {
                status: Status::Converged,
                residual: 0.0,
                relative: 0.0,
                iters: iter,
            });
        }

        let residual = squared.sqrt();
        if !residual.is_finite() {
            return Err(Error::Diverged { iter });
        }
        let initial = *initial.get_or_insert(residual);
        let relative = residual / initial;

        if config.verbose() {
            info!(%system, "Iteration {iter}: ||res|| (abs): {residual:.3e}   ||res|| (rel): {relative:.3e}");
        } else {
            debug!(%system, iter, residual, relative, "Picard iteration");
        }

        let event = Event {
            system,
            iter,
            residual,
            relative,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Solution {
                status: Status::StoppedByObserver,
                residual,
                relative,
                iters: iter,
            });
        }

        if relative < config.rtol() || residual < config.atol() {
            return Ok(Solution {
                status: Status::Converged,
                residual,
                relative,
                iters: iter,
            });
        }

        if iter == config.max_iters() {
            return Err(Error::MaxIters {
                iters: iter,
                residual,
                relative,
            });
        }

        let rtol = (0.9 * residual).min(0.9);
        for index in 0..count {
            let newton_config = newton::Config::new(rtol, inner.atol(index), config.newton_max_iters())?
                .with_damping(false);
            newton::solve_unobserved(backend, system, index, fields, &newton_config)
                .map_err(|source| Error::Newton { index, source })?;
        }

        iter += 1;
    }
}

/// Solves a coupled system with Picard iteration without observation.
///
/// This is a convenience wrapper around [`solve`] that uses a no-op observer.
///
/// # Errors
///
/// Returns the same errors as [`solve`].
pub fn solve_unobserved<B>(
    backend: &B,
    system: System,
    fields: &mut Fields,
    config: &Config,
    inner: &mut InnerTolerances,
) -> Result<Solution, Error>
where
    B: PdeBackend,
{
    solve(backend, system, fields, config, inner, ())
}
