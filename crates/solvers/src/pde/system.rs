use pdeopt_core::{Field, Fields, PdeBackend, System};
use tracing::debug;

use crate::equation::{
    newton,
    picard::{self, InnerTolerances},
};

use super::{Error, Memo, Strategy};

/// Solves one state or adjoint system and caches the result.
///
/// [`solve`](Self::solve) does nothing while the stored solution is valid.
/// Each real solve increments [`number_of_solves`](Self::number_of_solves).
#[derive(Debug, Clone)]
pub struct SystemProblem {
    system: System,
    strategy: Strategy,
    initial_guess: Option<Vec<Field>>,
    inner: InnerTolerances,
    memo: Memo,
}

impl SystemProblem {
    /// Creates a problem for `system` that solves with `strategy`.
    #[must_use]
    pub fn new(system: System, strategy: Strategy) -> Self {
        Self {
            system,
            strategy,
            initial_guess: None,
            inner: InnerTolerances::new(),
            memo: Memo::new(),
        }
    }

    /// Resets the unknowns to `guess` before every solve.
    ///
    /// Without a guess, each solve starts from the previous solution.
    #[must_use]
    pub fn with_initial_guess(mut self, guess: Vec<Field>) -> Self {
        self.initial_guess = Some(guess);
        self
    }

    /// Returns the system this problem solves.
    #[must_use]
    pub fn system(&self) -> System {
        self.system
    }

    /// Returns the solve strategy.
    #[must_use]
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Returns whether the stored solution is valid.
    #[must_use]
    pub fn has_solution(&self) -> bool {
        self.memo.has_solution()
    }

    /// Returns the number of solves performed so far.
    #[must_use]
    pub fn number_of_solves(&self) -> usize {
        self.memo.number_of_solves()
    }

    /// Marks the stored solution as stale.
    pub fn invalidate(&mut self) {
        self.memo.invalidate();
    }

    /// Solves the system in place unless the stored solution is valid.
    ///
    /// # Errors
    ///
    /// Returns an error if a linear, Newton or Picard solve fails. The
    /// solution stays invalid in that case.
    pub fn solve<B: PdeBackend>(&mut self, backend: &B, fields: &mut Fields) -> Result<(), Error> {
        if self.memo.has_solution() {
            return Ok(());
        }

        let system = self.system;
        if let Some(guess) = &self.initial_guess {
            for (values, initial) in fields.system_mut(system).iter_mut().zip(guess) {
                values.clone_from(initial);
            }
        }

        let count = fields.system(system).len();
        match &self.strategy {
            Strategy::Linear => {
                for index in 0..count {
                    let values = backend
                        .solve_linear(system, index, fields)
                        .map_err(|err| Error::Linear {
                            system,
                            index,
                            source: Box::new(err),
                        })?;
                    fields.system_mut(system)[index] = values;
                }
            }
            Strategy::Newton(config) => {
                for index in 0..count {
                    newton::solve_unobserved(backend, system, index, fields, config)
                        .map_err(|source| Error::Newton {
                            system,
                            index,
                            source,
                        })?;
                }
            }
            Strategy::Picard(config) => {
                picard::solve_unobserved(backend, system, fields, config, &mut self.inner)
                    .map_err(|source| Error::Picard { system, source })?;
            }
        }

        self.memo.mark_solved();
        debug!(%system, solves = self.memo.number_of_solves(), "system solved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::test_utils::{Coupled, CubicControl, Law, Pointwise};

    fn linear_backend() -> CubicControl {
        CubicControl::new(2.0, 0.0, 1.0, vec![1.0, 2.0], vec![0.0, 0.0])
    }

    #[test]
    fn solve_is_idempotent_until_invalidated() {
        let backend = linear_backend();
        let mut fields = backend.fields();
        let mut state = SystemProblem::new(System::State, Strategy::Linear);

        state.solve(&backend, &mut fields).expect("should solve");
        state.solve(&backend, &mut fields).expect("should solve");

        assert!(state.has_solution());
        assert_eq!(state.number_of_solves(), 1);
        assert_eq!(backend.linear_solves.get(), 1);
        assert_eq!(fields.states[0], vec![0.5, 1.0]);

        state.invalidate();
        assert!(!state.has_solution());
        state.solve(&backend, &mut fields).expect("should solve");

        assert_eq!(state.number_of_solves(), 2);
        assert_eq!(backend.linear_solves.get(), 2);
    }

    #[test]
    fn newton_strategy_solves_nonlinear_state() {
        let backend = CubicControl::new(1.0, 1.0, 1.0, vec![2.0, 10.0], vec![0.0, 0.0]);
        let mut fields = backend.fields();
        let mut state = SystemProblem::new(System::State, Strategy::default());

        state.solve(&backend, &mut fields).expect("should solve");

        assert_relative_eq!(fields.states[0][0], 1.0, epsilon = 1e-8);
        assert_relative_eq!(fields.states[0][1], 2.0, epsilon = 1e-8);
        assert_eq!(backend.linear_solves.get(), 0);
    }

    #[test]
    fn linear_strategy_reports_backend_failure() {
        let backend = CubicControl::new(1.0, 1.0, 1.0, vec![2.0], vec![0.0]);
        let mut fields = backend.fields();
        let mut state = SystemProblem::new(System::State, Strategy::Linear);

        let result = state.solve(&backend, &mut fields);

        assert!(matches!(
            result,
            Err(Error::Linear {
                system: System::State,
                index: 0,
                ..
            })
        ));
        assert!(!state.has_solution());
        assert_eq!(state.number_of_solves(), 0);
    }

    #[test]
    fn picard_strategy_solves_coupled_adjoint() {
        let backend = Coupled {
            alpha: 1.0,
            targets: [1.0, 1.0],
        };
        let mut fields = backend.fields(1);
        let strategy = Strategy::Picard(picard::Config::default());

        SystemProblem::new(System::State, strategy)
            .solve(&backend, &mut fields)
            .expect("state should solve");
        let mut adjoint = SystemProblem::new(System::Adjoint, strategy);
        adjoint.solve(&backend, &mut fields).expect("adjoint should solve");

        // Transposed system with right-hand side u_d - u, v_d - v.
        let (du, dv) = (1.0 - 2.0 / 15.0, 1.0 - 8.0 / 15.0);
        let p = (2.0 * du + 0.5 * dv) / 3.75;
        let q = (2.0 * dv + 0.5 * du) / 3.75;
        assert_relative_eq!(fields.adjoints[0][0], p, epsilon = 1e-9);
        assert_relative_eq!(fields.adjoints[1][0], q, epsilon = 1e-9);
        assert_eq!(adjoint.number_of_solves(), 1);
    }

    #[test]
    fn initial_guess_resets_unknowns() {
        // Undamped Newton on atan diverges from 3.0 but converges from 0.5.
        let backend = Pointwise::new(Law::Arctan, vec![0.5]);
        let mut fields = Fields::new(vec![], vec![vec![3.0]], vec![]);
        let config = newton::Config::default().with_damping(false);

        let mut state = SystemProblem::new(System::State, Strategy::Newton(config))
            .with_initial_guess(vec![vec![0.5]]);
        state.solve(&backend, &mut fields).expect("should solve");

        assert_relative_eq!(fields.states[0][0], 0.5_f64.tan(), epsilon = 1e-9);
    }
}
