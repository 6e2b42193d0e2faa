use std::fmt;

use crate::{Field, Fields, vector};

/// Selects which family of equations a backend call refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum System {
    /// The primal equations whose solution is the state.
    State,

    /// The adjoint equations used to compute gradients.
    Adjoint,
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State => f.write_str("state"),
            Self::Adjoint => f.write_str("adjoint"),
        }
    }
}

/// The interface to an external finite-element solver.
///
/// A system consists of one or more subsystems, addressed by `index`, each
/// with its own unknown in [`Fields::system`]. The optimization core only
/// relies on the contracts below; assembly, meshes and linear algebra stay
/// inside the backend.
///
/// Residuals and corrections have the length of the subsystem's unknown.
pub trait PdeBackend {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Assembles the residual of a subsystem at the current fields.
    ///
    /// Boundary conditions are not applied; callers use
    /// [`homogenize_bcs`](Self::homogenize_bcs) when needed.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if assembly fails.
    fn residual(&self, system: System, index: usize, fields: &Fields)
    -> Result<Field, Self::Error>;

    /// Solves the linearized subsystem `J du = -residual` at the current fields.
    ///
    /// The correction must vanish on constrained entries.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the linear solve fails.
    fn newton_correction(
        &self,
        system: System,
        index: usize,
        fields: &Fields,
        residual: &[f64],
    ) -> Result<Field, Self::Error>;

    /// Solves a linear subsystem directly.
    ///
    /// The other subsystems are taken from `fields` as they are. The returned
    /// values satisfy the boundary conditions.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the subsystem cannot be solved.
    fn solve_linear(&self, system: System, index: usize, fields: &Fields)
    -> Result<Field, Self::Error>;

    /// Imposes the Dirichlet values of a subsystem on `values`.
    fn apply_bcs(&self, system: System, index: usize, values: &mut [f64]);

    /// Zeros the constrained entries of a residual or correction.
    fn homogenize_bcs(&self, system: System, index: usize, values: &mut [f64]);

    /// Norm used for residual convergence checks.
    fn norm(&self, values: &[f64]) -> f64 {
        vector::norm_l2(values)
    }
}
