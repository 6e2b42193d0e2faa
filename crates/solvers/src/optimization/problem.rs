use pdeopt_core::{ControlProblem, Field, Fields, PdeBackend, System};

use crate::{
    pde::{Memo, Strategy, SystemProblem},
    settings::{Settings, SettingsError},
};

use super::Error;

/// A PDE-constrained optimization problem at its current controls.
///
/// Owns the [`Fields`] and keeps track of which derived quantities are still
/// valid. Changing the controls through [`update_controls`] invalidates the
/// state, which in turn invalidates the adjoint and the gradient.
///
/// [`update_controls`]: Self::update_controls
pub struct OptimizationProblem<'a, B, P> {
    backend: &'a B,
    problem: &'a P,
    fields: Fields,
    state: SystemProblem,
    adjoint: SystemProblem,
    gradient: Memo,
    gradients: Vec<Field>,
}

impl<'a, B, P> OptimizationProblem<'a, B, P>
where
    B: PdeBackend,
    P: ControlProblem,
{
    /// Creates a problem whose state and adjoint systems use the given strategies.
    ///
    /// `fields` provides the initial controls and the initial iterates of the
    /// state and adjoint unknowns.
    #[must_use]
    pub fn new(
        backend: &'a B,
        problem: &'a P,
        fields: Fields,
        state_strategy: Strategy,
        adjoint_strategy: Strategy,
    ) -> Self {
        let gradients = fields.controls.iter().map(|c| vec![0.0; c.len()]).collect();
        Self {
            backend,
            problem,
            fields,
            state: SystemProblem::new(System::State, state_strategy),
            adjoint: SystemProblem::new(System::Adjoint, adjoint_strategy),
            gradient: Memo::new(),
            gradients,
        }
    }

    /// Creates a problem whose solve strategies come from `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state equation settings are invalid.
    pub fn from_settings(
        backend: &'a B,
        problem: &'a P,
        fields: Fields,
        settings: &Settings,
    ) -> Result<Self, SettingsError> {
        Ok(Self::new(
            backend,
            problem,
            fields,
            settings.state_strategy()?,
            settings.adjoint_strategy()?,
        ))
    }

    /// Replaces the state system, for example to add an initial guess.
    #[must_use]
    pub fn with_state(mut self, state: SystemProblem) -> Self {
        self.state = state;
        self
    }

    /// Replaces the adjoint system.
    #[must_use]
    pub fn with_adjoint(mut self, adjoint: SystemProblem) -> Self {
        self.adjoint = adjoint;
        self
    }

    #[must_use]
    pub fn backend(&self) -> &'a B {
        self.backend
    }

    #[must_use]
    pub fn problem(&self) -> &'a P {
        self.problem
    }

    #[must_use]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    #[must_use]
    pub fn controls(&self) -> &[Field] {
        &self.fields.controls
    }

    /// Returns the last computed gradients, one per control.
    ///
    /// Only meaningful after [`solve_gradient`](Self::solve_gradient).
    #[must_use]
    pub fn gradients(&self) -> &[Field] {
        &self.gradients
    }

    #[must_use]
    pub fn state(&self) -> &SystemProblem {
        &self.state
    }

    #[must_use]
    pub fn adjoint(&self) -> &SystemProblem {
        &self.adjoint
    }

    /// Returns how often the state system was solved.
    #[must_use]
    pub fn state_solves(&self) -> usize {
        self.state.number_of_solves()
    }

    /// Returns how often the adjoint system was solved.
    #[must_use]
    pub fn adjoint_solves(&self) -> usize {
        self.adjoint.number_of_solves()
    }

    /// Returns how often the gradient was computed.
    #[must_use]
    pub fn gradient_solves(&self) -> usize {
        self.gradient.number_of_solves()
    }

    /// Marks the state, adjoint and gradient as stale.
    pub fn invalidate_state(&mut self) {
        self.state.invalidate();
        self.invalidate_adjoint();
    }

    /// Marks the adjoint and gradient as stale.
    pub fn invalidate_adjoint(&mut self) {
        self.adjoint.invalidate();
        self.invalidate_gradient();
    }

    /// Marks the gradient as stale.
    pub fn invalidate_gradient(&mut self) {
        self.gradient.invalidate();
    }

    /// Modifies the controls in place and invalidates everything derived from them.
    pub fn update_controls<F>(&mut self, update: F)
    where
        F: FnOnce(&mut [Field]),
    {
        update(&mut self.fields.controls);
        self.invalidate_state();
    }

    /// Solves the state system unless it is already solved.
    ///
    /// # Errors
    ///
    /// Returns an error if the state solve fails.
    pub fn solve_state(&mut self) -> Result<(), Error> {
        self.state.solve(self.backend, &mut self.fields)?;
        Ok(())
    }

    /// Solves the adjoint system, solving the state first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the state or adjoint solve fails.
    pub fn solve_adjoint(&mut self) -> Result<(), Error> {
        self.solve_state()?;
        self.adjoint.solve(self.backend, &mut self.fields)?;
        Ok(())
    }

    /// Computes the gradient for every control unless it is already valid.
    ///
    /// # Errors
    ///
    /// Returns an error if a solve or a gradient evaluation fails.
    pub fn solve_gradient(&mut self) -> Result<(), Error> {
        if self.gradient.has_solution() {
            return Ok(());
        }

        self.solve_adjoint()?;
        for (index, gradient) in self.gradients.iter_mut().enumerate() {
            *gradient = self
                .problem
                .gradient(index, &self.fields)
                .map_err(Error::problem)?;
        }
        self.gradient.mark_solved();
        Ok(())
    }

    /// Evaluates the cost functional at the current controls.
    ///
    /// # Errors
    ///
    /// Returns an error if the state solve or the evaluation fails.
    pub fn objective(&mut self) -> Result<f64, Error> {
        self.solve_state()?;
        self.problem.objective(&self.fields).map_err(Error::problem)
    }

    /// Returns `sum_i (g_i, g_i)` in the scalar products of the controls.
    ///
    /// # Errors
    ///
    /// Returns an error if the gradient cannot be computed.
    pub fn stationarity_measure_squared(&mut self) -> Result<f64, Error> {
        self.solve_gradient()?;
        Ok(self
            .gradients
            .iter()
            .enumerate()
            .map(|(index, g)| self.problem.inner(index, g, g))
            .sum())
    }

    /// Returns `sum_i (g_i, d_i)`, the derivative along `directions`.
    ///
    /// # Errors
    ///
    /// Returns an error if the gradient cannot be computed.
    pub fn directional_derivative(&mut self, directions: &[Field]) -> Result<f64, Error> {
        self.solve_gradient()?;
        Ok(self
            .gradients
            .iter()
            .zip(directions)
            .enumerate()
            .map(|(index, (g, d))| self.problem.inner(index, g, d))
            .sum())
    }

    /// Consumes the problem and returns its fields.
    #[must_use]
    pub fn into_fields(self) -> Fields {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::test_utils::CubicControl;

    fn linear_problem(backend: &CubicControl) -> OptimizationProblem<'_, CubicControl, CubicControl> {
        OptimizationProblem::new(
            backend,
            backend,
            backend.fields(),
            Strategy::Linear,
            Strategy::Linear,
        )
    }

    #[test]
    fn gradient_solves_state_and_adjoint_once() {
        let backend = CubicControl::new(1.0, 0.0, 0.5, vec![1.0, 1.0], vec![2.0, 0.0]);
        let mut problem = linear_problem(&backend);

        problem.solve_gradient().expect("should solve");
        problem.solve_gradient().expect("should solve");

        assert_eq!(problem.state_solves(), 1);
        assert_eq!(problem.adjoint_solves(), 1);
        assert_eq!(problem.gradient_solves(), 1);

        // u = 1, p = -(u - u_d), g = α c - p with c = 0.
        assert_relative_eq!(problem.fields().states[0][0], 1.0);
        assert_relative_eq!(problem.gradients()[0][0], -1.0);
        assert_relative_eq!(problem.gradients()[0][1], 1.0);
        assert_relative_eq!(problem.stationarity_measure_squared().unwrap(), 2.0);
        assert_relative_eq!(
            problem.directional_derivative(&[vec![1.0, 3.0]]).unwrap(),
            2.0
        );
    }

    #[test]
    fn updating_controls_cascades_invalidation() {
        let backend = CubicControl::new(1.0, 0.0, 0.5, vec![1.0], vec![2.0]);
        let mut problem = linear_problem(&backend);
        problem.solve_gradient().expect("should solve");

        problem.update_controls(|controls| controls[0][0] = 1.0);
        assert!(!problem.state().has_solution());
        assert!(!problem.adjoint().has_solution());

        let objective = problem.objective().expect("should evaluate");
        // u = 2 hits the target, leaving ½ α c².
        assert_relative_eq!(objective, 0.25);
        assert_eq!(problem.state_solves(), 2);
        assert_eq!(problem.adjoint_solves(), 1);

        problem.solve_gradient().expect("should solve");
        assert_eq!(problem.adjoint_solves(), 2);
        assert_relative_eq!(problem.gradients()[0][0], 0.5);
    }

    #[test]
    fn invalidating_adjoint_keeps_state() {
        let backend = CubicControl::new(1.0, 0.0, 1.0, vec![1.0], vec![0.0]);
        let mut problem = linear_problem(&backend);
        problem.solve_gradient().expect("should solve");

        problem.invalidate_adjoint();
        problem.solve_gradient().expect("should solve");

        assert_eq!(problem.state_solves(), 1);
        assert_eq!(problem.adjoint_solves(), 2);
        assert_eq!(problem.gradient_solves(), 2);
    }
}
