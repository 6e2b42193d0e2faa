//! Manufactured backends shared by the solver tests.
//!
//! All of them are pointwise: every node is an independent scalar equation,
//! so Jacobians are diagonal and corrections are a division.

use std::cell::Cell;

use pdeopt_core::{ControlProblem, Field, Fields, PdeBackend, System};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MockError {
    #[error("{0} system is not provided by this backend")]
    Unsupported(System),

    #[error("linear solve requested for a nonlinear equation")]
    Nonlinear,

    #[error("control outside the admissible range")]
    OutOfRange,
}

/// Scalar law evaluated at each node.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Law {
    /// `a u + b u³`
    Cubic { a: f64, b: f64 },

    /// `atan(u)`, where undamped Newton diverges from `|u| > 1.39`.
    Arctan,
}

impl Law {
    fn value(self, u: f64) -> f64 {
        match self {
            Self::Cubic { a, b } => a * u + b * u.powi(3),
            Self::Arctan => u.atan(),
        }
    }

    fn slope(self, u: f64) -> f64 {
        match self {
            Self::Cubic { a, b } => a + 3.0 * b * u * u,
            Self::Arctan => 1.0 / (1.0 + u * u),
        }
    }
}

/// State-only backend: `law(u_k) = rhs_k`, with an optional Dirichlet node.
pub(crate) struct Pointwise {
    pub(crate) law: Law,
    pub(crate) rhs: Vec<f64>,
    pub(crate) fixed: Option<(usize, f64)>,
}

impl Pointwise {
    pub(crate) fn new(law: Law, rhs: Vec<f64>) -> Self {
        Self {
            law,
            rhs,
            fixed: None,
        }
    }

    pub(crate) fn with_fixed(mut self, node: usize, value: f64) -> Self {
        self.fixed = Some((node, value));
        self
    }
}

impl PdeBackend for Pointwise {
    type Error = MockError;

    fn residual(&self, system: System, _index: usize, fields: &Fields) -> Result<Field, MockError> {
        if system == System::Adjoint {
            return Err(MockError::Unsupported(system));
        }
        Ok(fields.states[0]
            .iter()
            .zip(&self.rhs)
            .map(|(u, f)| self.law.value(*u) - f)
            .collect())
    }

    fn newton_correction(
        &self,
        _system: System,
        _index: usize,
        fields: &Fields,
        residual: &[f64],
    ) -> Result<Field, MockError> {
        Ok(fields.states[0]
            .iter()
            .zip(residual)
            .map(|(u, r)| -r / self.law.slope(*u))
            .collect())
    }

    fn solve_linear(&self, system: System, _index: usize, _fields: &Fields) -> Result<Field, MockError> {
        match self.law {
            Law::Cubic { a, b } if b == 0.0 => Ok(self.rhs.iter().map(|f| f / a).collect()),
            _ if system == System::Adjoint => Err(MockError::Unsupported(system)),
            _ => Err(MockError::Nonlinear),
        }
    }

    fn apply_bcs(&self, _system: System, _index: usize, values: &mut [f64]) {
        if let Some((node, value)) = self.fixed {
            values[node] = value;
        }
    }

    fn homogenize_bcs(&self, _system: System, _index: usize, values: &mut [f64]) {
        if let Some((node, _)) = self.fixed {
            values[node] = 0.0;
        }
    }
}

/// Pointwise control problem with a cubic state equation.
///
/// ```text
/// state:     a u + b u³ - c - f = 0
/// adjoint:   (a + 3 b u²) p + (u - u_d) = 0
/// objective: ½ |u - u_d|² + ½ α |c|²
/// gradient:  α c - p
/// ```
pub(crate) struct CubicControl {
    pub(crate) a: f64,
    pub(crate) b: f64,
    pub(crate) alpha: f64,
    pub(crate) source: Vec<f64>,
    pub(crate) target: Vec<f64>,
    pub(crate) linear_solves: Cell<usize>,
}

impl CubicControl {
    pub(crate) fn new(a: f64, b: f64, alpha: f64, source: Vec<f64>, target: Vec<f64>) -> Self {
        Self {
            a,
            b,
            alpha,
            source,
            target,
            linear_solves: Cell::new(0),
        }
    }

    /// Fields with zero controls, states and adjoints.
    pub(crate) fn fields(&self) -> Fields {
        let n = self.target.len();
        Fields::new(vec![vec![0.0; n]], vec![vec![0.0; n]], vec![vec![0.0; n]])
    }

    fn slope(&self, u: f64) -> f64 {
        self.a + 3.0 * self.b * u * u
    }
}

impl PdeBackend for CubicControl {
    type Error = MockError;

    fn residual(&self, system: System, _index: usize, fields: &Fields) -> Result<Field, MockError> {
        let (u, c, p) = (&fields.states[0], &fields.controls[0], &fields.adjoints[0]);
        let residual = match system {
            System::State => (0..u.len())
                .map(|k| self.a * u[k] + self.b * u[k].powi(3) - c[k] - self.source[k])
                .collect(),
            System::Adjoint => (0..u.len())
                .map(|k| self.slope(u[k]) * p[k] + (u[k] - self.target[k]))
                .collect(),
        };
        Ok(residual)
    }

    fn newton_correction(
        &self,
        _system: System,
        _index: usize,
        fields: &Fields,
        residual: &[f64],
    ) -> Result<Field, MockError> {
        // Both equations share the Jacobian a + 3 b u².
        Ok(residual
            .iter()
            .zip(&fields.states[0])
            .map(|(r, u)| -r / self.slope(*u))
            .collect())
    }

    fn solve_linear(&self, system: System, _index: usize, fields: &Fields) -> Result<Field, MockError> {
        self.linear_solves.set(self.linear_solves.get() + 1);
        let (u, c) = (&fields.states[0], &fields.controls[0]);
        match system {
            System::State if self.b != 0.0 => Err(MockError::Nonlinear),
            System::State => Ok((0..c.len()).map(|k| (c[k] + self.source[k]) / self.a).collect()),
            System::Adjoint => Ok((0..u.len())
                .map(|k| -(u[k] - self.target[k]) / self.slope(u[k]))
                .collect()),
        }
    }

    fn apply_bcs(&self, _system: System, _index: usize, _values: &mut [f64]) {}

    fn homogenize_bcs(&self, _system: System, _index: usize, _values: &mut [f64]) {}
}

impl ControlProblem for CubicControl {
    type Error = MockError;

    fn objective(&self, fields: &Fields) -> Result<f64, MockError> {
        let (u, c) = (&fields.states[0], &fields.controls[0]);
        let misfit: f64 = u.iter().zip(&self.target).map(|(u, d)| (u - d).powi(2)).sum();
        let cost: f64 = c.iter().map(|c| c * c).sum();
        Ok(0.5 * misfit + 0.5 * self.alpha * cost)
    }

    fn gradient(&self, _index: usize, fields: &Fields) -> Result<Field, MockError> {
        let (c, p) = (&fields.controls[0], &fields.adjoints[0]);
        Ok(c.iter().zip(p).map(|(c, p)| self.alpha * c - p).collect())
    }
}

/// Two coupled linear subsystems per node, controlled through the first.
///
/// ```text
/// state:     2 u - ½ v - c = 0,   2 v - ½ u - 1 = 0
/// adjoint:   2 p - ½ q + (u - u_d) = 0,   2 q - ½ p + (v - v_d) = 0
/// objective: ½ |u - u_d|² + ½ |v - v_d|² + ½ α |c|²
/// gradient:  α c - p
/// ```
///
/// The unique state for `c = 0` is `u = 2/15`, `v = 8/15`.
pub(crate) struct Coupled {
    pub(crate) alpha: f64,
    pub(crate) targets: [f64; 2],
}

impl Coupled {
    pub(crate) fn fields(&self, nodes: usize) -> Fields {
        Fields::new(
            vec![vec![0.0; nodes]],
            vec![vec![0.0; nodes]; 2],
            vec![vec![0.0; nodes]; 2],
        )
    }

    fn unknowns(system: System, fields: &Fields) -> (&[f64], &[f64]) {
        let values = fields.system(system);
        (&values[0], &values[1])
    }
}

impl PdeBackend for Coupled {
    type Error = MockError;

    fn residual(&self, system: System, index: usize, fields: &Fields) -> Result<Field, MockError> {
        let (first, second) = Self::unknowns(system, fields);
        let nodes = first.len();
        let residual = match (system, index) {
            (System::State, 0) => (0..nodes)
                .map(|k| 2.0 * first[k] - 0.5 * second[k] - fields.controls[0][k])
                .collect(),
            (System::State, _) => (0..nodes)
                .map(|k| 2.0 * second[k] - 0.5 * first[k] - 1.0)
                .collect(),
            (System::Adjoint, 0) => (0..nodes)
                .map(|k| 2.0 * first[k] - 0.5 * second[k] + fields.states[0][k] - self.targets[0])
                .collect(),
            (System::Adjoint, _) => (0..nodes)
                .map(|k| 2.0 * second[k] - 0.5 * first[k] + fields.states[1][k] - self.targets[1])
                .collect(),
        };
        Ok(residual)
    }

    fn newton_correction(
        &self,
        _system: System,
        _index: usize,
        _fields: &Fields,
        residual: &[f64],
    ) -> Result<Field, MockError> {
        Ok(residual.iter().map(|r| -r / 2.0).collect())
    }

    fn solve_linear(&self, system: System, index: usize, fields: &Fields) -> Result<Field, MockError> {
        let current = &fields.system(system)[index];
        let residual = self.residual(system, index, fields)?;
        Ok(current.iter().zip(residual).map(|(x, r)| x - r / 2.0).collect())
    }

    fn apply_bcs(&self, _system: System, _index: usize, _values: &mut [f64]) {}

    fn homogenize_bcs(&self, _system: System, _index: usize, _values: &mut [f64]) {}
}

impl ControlProblem for Coupled {
    type Error = MockError;

    fn objective(&self, fields: &Fields) -> Result<f64, MockError> {
        let misfit: f64 = fields
            .states
            .iter()
            .zip(self.targets)
            .flat_map(|(x, d)| x.iter().map(move |x| (x - d).powi(2)))
            .sum();
        let cost: f64 = fields.controls[0].iter().map(|c| c * c).sum();
        Ok(0.5 * misfit + 0.5 * self.alpha * cost)
    }

    fn gradient(&self, _index: usize, fields: &Fields) -> Result<Field, MockError> {
        let (c, p) = (&fields.controls[0], &fields.adjoints[0]);
        Ok(c.iter().zip(p).map(|(c, p)| self.alpha * c - p).collect())
    }
}

/// Delegates to `inner` but fails to evaluate the objective once any control
/// value exceeds `bound` in magnitude.
pub(crate) struct Bounded<'a> {
    pub(crate) inner: &'a CubicControl,
    pub(crate) bound: f64,
}

impl ControlProblem for Bounded<'_> {
    type Error = MockError;

    fn objective(&self, fields: &Fields) -> Result<f64, MockError> {
        if fields.controls.iter().flatten().any(|c| c.abs() > self.bound) {
            return Err(MockError::OutOfRange);
        }
        self.inner.objective(fields)
    }

    fn gradient(&self, index: usize, fields: &Fields) -> Result<Field, MockError> {
        self.inner.gradient(index, fields)
    }
}
