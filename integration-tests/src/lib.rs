//! Manufactured problems shared by the integration tests.
//!
//! [`PoissonControl`] discretizes the distributed control problem
//!
//! ```text
//! minimize   ½ ∫ (u - u_d)² + ½ α ∫ c²
//! subject to -u'' + κ u³ = f + c   on (0, 1),   u(0) = u(1) = 0
//! ```
//!
//! with second-order finite differences on a uniform grid. Boundary nodes
//! carry Dirichlet rows, interior rows are tridiagonal and solved with the
//! Thomas algorithm. Integrals use the nodal rule `h Σ` over interior nodes,
//! which makes `α c - p` the gradient in the matching scalar product.

use std::f64::consts::PI;

use pdeopt_core::{ControlProblem, Field, Fields, PdeBackend, System, vector};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FixtureError {
    #[error("direct solve requested for a nonlinear state equation")]
    Nonlinear,

    #[error("zero pivot in tridiagonal solve")]
    Singular,
}

/// Semilinear Poisson control problem on the unit interval.
#[derive(Debug, Clone)]
pub struct PoissonControl {
    intervals: usize,
    kappa: f64,
    alpha: f64,
    source: Vec<f64>,
    target: Vec<f64>,
}

impl PoissonControl {
    /// Creates the problem with `f = 1` and `u_d(x) = sin(πx) / 4`.
    ///
    /// # Panics
    ///
    /// Panics if `intervals < 2`.
    #[must_use]
    pub fn new(intervals: usize, kappa: f64, alpha: f64) -> Self {
        assert!(intervals >= 2, "need at least one interior node");
        let h = 1.0 / intervals as f64;
        let target = (0..=intervals)
            .map(|i| 0.25 * (PI * i as f64 * h).sin())
            .collect();
        Self {
            intervals,
            kappa,
            alpha,
            source: vec![1.0; intervals + 1],
            target,
        }
    }

    /// Grid spacing.
    #[must_use]
    pub fn h(&self) -> f64 {
        1.0 / self.intervals as f64
    }

    /// Number of grid nodes, boundaries included.
    #[must_use]
    pub fn nodes(&self) -> usize {
        self.intervals + 1
    }

    /// Zero control, state and adjoint.
    #[must_use]
    pub fn fields(&self) -> Fields {
        let n = self.nodes();
        Fields::new(vec![vec![0.0; n]], vec![vec![0.0; n]], vec![vec![0.0; n]])
    }

    /// Diagonal of the interior Jacobian `A + 3 κ diag(u²)`.
    fn jacobian_diagonal(&self, state: &[f64]) -> Vec<f64> {
        let h2 = self.h() * self.h();
        state[1..self.intervals]
            .iter()
            .map(|u| 2.0 / h2 + 3.0 * self.kappa * u * u)
            .collect()
    }

    /// Solves the interior system `(A + diag) x = rhs`, zero on the boundary.
    fn solve_interior(&self, diagonal: &[f64], rhs: &[f64]) -> Result<Field, FixtureError> {
        let off = -1.0 / (self.h() * self.h());
        let interior = thomas(off, diagonal, &rhs[1..self.intervals])?;

        let mut values = vec![0.0; self.nodes()];
        values[1..self.intervals].copy_from_slice(&interior);
        Ok(values)
    }

    /// Applies the interior Jacobian to `x`, which is zero on the boundary.
    fn apply_jacobian(&self, state: &[f64], x: &[f64]) -> Field {
        let h2 = self.h() * self.h();
        let mut y = vec![0.0; self.nodes()];
        for i in 1..self.intervals {
            y[i] = (2.0 * x[i] - x[i - 1] - x[i + 1]) / h2
                + 3.0 * self.kappa * state[i] * state[i] * x[i];
        }
        y
    }
}

impl PdeBackend for PoissonControl {
    type Error = FixtureError;

    fn residual(&self, system: System, _index: usize, fields: &Fields) -> Result<Field, FixtureError> {
        let (u, c) = (&fields.states[0], &fields.controls[0]);
        let h2 = self.h() * self.h();

        let mut residual = vec![0.0; self.nodes()];
        match system {
            System::State => {
                for i in 1..self.intervals {
                    residual[i] = (2.0 * u[i] - u[i - 1] - u[i + 1]) / h2
                        + self.kappa * u[i].powi(3)
                        - self.source[i]
                        - c[i];
                }
            }
            System::Adjoint => {
                let p = &fields.adjoints[0];
                residual = self.apply_jacobian(u, p);
                for i in 1..self.intervals {
                    residual[i] += u[i] - self.target[i];
                }
            }
        }
        Ok(residual)
    }

    fn newton_correction(
        &self,
        _system: System,
        _index: usize,
        fields: &Fields,
        residual: &[f64],
    ) -> Result<Field, FixtureError> {
        let diagonal = self.jacobian_diagonal(&fields.states[0]);
        let rhs = vector::negated(residual);
        self.solve_interior(&diagonal, &rhs)
    }

    fn solve_linear(&self, system: System, _index: usize, fields: &Fields) -> Result<Field, FixtureError> {
        let (u, c) = (&fields.states[0], &fields.controls[0]);
        match system {
            System::State if self.kappa != 0.0 => Err(FixtureError::Nonlinear),
            System::State => {
                let rhs: Field = self.source.iter().zip(c).map(|(f, c)| f + c).collect();
                self.solve_interior(&self.jacobian_diagonal(u), &rhs)
            }
            System::Adjoint => {
                let rhs: Field = u.iter().zip(&self.target).map(|(u, d)| d - u).collect();
                self.solve_interior(&self.jacobian_diagonal(u), &rhs)
            }
        }
    }

    fn apply_bcs(&self, _system: System, _index: usize, values: &mut [f64]) {
        values[0] = 0.0;
        values[self.intervals] = 0.0;
    }

    fn homogenize_bcs(&self, _system: System, _index: usize, values: &mut [f64]) {
        values[0] = 0.0;
        values[self.intervals] = 0.0;
    }
}

impl ControlProblem for PoissonControl {
    type Error = FixtureError;

    fn objective(&self, fields: &Fields) -> Result<f64, FixtureError> {
        let (u, c) = (&fields.states[0], &fields.controls[0]);
        let interior = 1..self.intervals;
        let misfit: f64 = interior
            .clone()
            .map(|i| (u[i] - self.target[i]).powi(2))
            .sum();
        let cost: f64 = interior.map(|i| c[i] * c[i]).sum();
        Ok(0.5 * self.h() * (misfit + self.alpha * cost))
    }

    fn gradient(&self, _index: usize, fields: &Fields) -> Result<Field, FixtureError> {
        let (c, p) = (&fields.controls[0], &fields.adjoints[0]);
        let mut gradient: Field = c.iter().zip(p).map(|(c, p)| self.alpha * c - p).collect();
        self.homogenize_bcs(System::State, 0, &mut gradient);
        Ok(gradient)
    }

    fn inner(&self, _index: usize, a: &[f64], b: &[f64]) -> f64 {
        self.h() * vector::dot(&a[1..self.intervals], &b[1..self.intervals])
    }
}

/// Thomas algorithm for a symmetric tridiagonal matrix with constant
/// off-diagonal `off`.
fn thomas(off: f64, diagonal: &[f64], rhs: &[f64]) -> Result<Vec<f64>, FixtureError> {
    let n = diagonal.len();
    let mut upper = vec![0.0; n];
    let mut x = vec![0.0; n];

    let mut pivot = diagonal[0];
    for i in 0..n {
        if i > 0 {
            pivot = diagonal[i] - off * upper[i - 1];
        }
        if pivot == 0.0 {
            return Err(FixtureError::Singular);
        }
        upper[i] = off / pivot;
        let carried = if i > 0 { off * x[i - 1] } else { 0.0 };
        x[i] = (rhs[i] - carried) / pivot;
    }
    for i in (0..n.saturating_sub(1)).rev() {
        x[i] -= upper[i] * x[i + 1];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn thomas_solves_tridiagonal_system() {
        // [2 -1 0; -1 2 -1; 0 -1 2] x = [1, 0, 1] has x = [1, 1, 1].
        let x = thomas(-1.0, &[2.0, 2.0, 2.0], &[1.0, 0.0, 1.0]).unwrap();
        for value in x {
            assert_relative_eq!(value, 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn linear_state_matches_parabola() {
        // -u'' = 1 has u = x (1 - x) / 2, reproduced exactly by the stencil.
        let fixture = PoissonControl::new(8, 0.0, 1e-2);
        let fields = fixture.fields();
        let u = fixture.solve_linear(System::State, 0, &fields).unwrap();

        for (i, value) in u.iter().enumerate() {
            let x = i as f64 * fixture.h();
            assert_relative_eq!(*value, 0.5 * x * (1.0 - x), epsilon = 1e-12);
        }
    }
}
