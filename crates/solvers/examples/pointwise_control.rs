//! Runs gradient descent on a pointwise control problem and prints the log.
//!
//! ```text
//! minimize   ½ |u - u_d|² + ½ α |c|²
//! subject to u + u³ = c + f   at every node
//! ```
//!
//! Run with `cargo run --example pointwise_control [settings.toml]`. Set
//! `RUST_LOG=debug` for per-solve output.

use std::{env, process::ExitCode};

use pdeopt_core::{ControlProblem, Field, Fields, PdeBackend, System};
use pdeopt_solvers::{OptimizationProblem, Settings, optimization::gradient_descent};
use thiserror::Error;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
#[error("the state equation has no direct solver")]
struct NonlinearState;

struct Pointwise {
    alpha: f64,
    source: Vec<f64>,
    target: Vec<f64>,
}

impl Pointwise {
    fn slope(u: f64) -> f64 {
        1.0 + 3.0 * u * u
    }
}

impl PdeBackend for Pointwise {
    type Error = NonlinearState;

    fn residual(&self, system: System, _index: usize, fields: &Fields) -> Result<Field, Self::Error> {
        let (u, c, p) = (&fields.states[0], &fields.controls[0], &fields.adjoints[0]);
        Ok((0..u.len())
            .map(|k| match system {
                System::State => u[k] + u[k].powi(3) - c[k] - self.source[k],
                System::Adjoint => Self::slope(u[k]) * p[k] + u[k] - self.target[k],
            })
            .collect())
    }

    fn newton_correction(
        &self,
        _system: System,
        _index: usize,
        fields: &Fields,
        residual: &[f64],
    ) -> Result<Field, Self::Error> {
        Ok(residual
            .iter()
            .zip(&fields.states[0])
            .map(|(r, u)| -r / Self::slope(*u))
            .collect())
    }

    fn solve_linear(&self, system: System, _index: usize, fields: &Fields) -> Result<Field, Self::Error> {
        match system {
            System::State => Err(NonlinearState),
            System::Adjoint => Ok(fields.states[0]
                .iter()
                .zip(&self.target)
                .map(|(u, d)| (d - u) / Self::slope(*u))
                .collect()),
        }
    }

    fn apply_bcs(&self, _system: System, _index: usize, _values: &mut [f64]) {}

    fn homogenize_bcs(&self, _system: System, _index: usize, _values: &mut [f64]) {}
}

impl ControlProblem for Pointwise {
    type Error = NonlinearState;

    fn objective(&self, fields: &Fields) -> Result<f64, Self::Error> {
        let (u, c) = (&fields.states[0], &fields.controls[0]);
        let misfit: f64 = u.iter().zip(&self.target).map(|(u, d)| (u - d).powi(2)).sum();
        let cost: f64 = c.iter().map(|c| c * c).sum();
        Ok(0.5 * misfit + 0.5 * self.alpha * cost)
    }

    fn gradient(&self, _index: usize, fields: &Fields) -> Result<Field, Self::Error> {
        let (c, p) = (&fields.controls[0], &fields.adjoints[0]);
        Ok(c.iter().zip(p).map(|(c, p)| self.alpha * c - p).collect())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .without_time()
        .init();

    let settings = match env::args().nth(1) {
        Some(path) => Settings::from_file(path),
        None => Ok(Settings::default()),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            error!(error = %err, "could not load settings");
            return ExitCode::FAILURE;
        }
    };

    let n = 8;
    let backend = Pointwise {
        alpha: 1e-2,
        source: vec![0.5; n],
        target: (0..n).map(|k| k as f64 / n as f64).collect(),
    };
    let fields = Fields::new(vec![vec![0.0; n]], vec![vec![0.0; n]], vec![vec![0.0; n]]);

    let (mut problem, config) = match OptimizationProblem::from_settings(&backend, &backend, fields, &settings)
        .and_then(|problem| Ok((problem, settings.descent_config()?)))
    {
        Ok(setup) => setup,
        Err(err) => {
            error!(error = %err, "invalid settings");
            return ExitCode::FAILURE;
        }
    };

    match gradient_descent::minimize_unobserved(&mut problem, &config) {
        Ok(solution) => {
            println!("{:?}: controls = {:.4?}", solution.status, problem.controls()[0]);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "optimization failed");
            ExitCode::FAILURE
        }
    }
}
