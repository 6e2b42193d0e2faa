use pdeopt_core::{Field, Fields, PdeBackend, System, vector};

use super::{Config, Error, homogenized_residual};

/// An accepted damped update.
pub(super) struct DampedStep {
    pub(super) residual: Field,
    pub(super) norm: f64,
    pub(super) damping: f64,
}

/// Applies `u += λ du`, halving `λ` until the residual decreases enough.
///
/// On failure the iterate is restored to its value before the call.
#[allow(clippy::too_many_arguments)]
pub(super) fn damped_update<B: PdeBackend>(
    backend: &B,
    system: System,
    index: usize,
    fields: &mut Fields,
    correction: &[f64],
    norm: f64,
    iter: usize,
    config: &Config,
) -> Result<DampedStep, Error> {
    let start = fields.system(system)[index].clone();
    let mut damping = 1.0;

    loop {
        let iterate = &mut fields.system_mut(system)[index];
        iterate.copy_from_slice(&start);
        vector::axpy(damping, correction, iterate);

        let residual = homogenized_residual(backend, system, index, fields)?;
        let trial_norm = backend.norm(&residual);

        if trial_norm.is_finite() && trial_norm <= (1.0 - 0.5 * damping) * norm {
            return Ok(DampedStep {
                residual,
                norm: trial_norm,
                damping,
            });
        }

        damping *= 0.5;
        if damping < config.min_damping() {
            fields.system_mut(system)[index].copy_from_slice(&start);
            return Err(Error::DampingFailed {
                iter,
                min_damping: config.min_damping(),
            });
        }
    }
}
