use crate::{Field, Fields, vector};

/// Defines the reduced cost functional of an optimal control problem.
///
/// Callers guarantee that the state (and, for [`gradient`](Self::gradient),
/// the adjoint) in `fields` is solved for the current controls.
pub trait ControlProblem {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Evaluates the cost functional.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the objective cannot be computed.
    fn objective(&self, fields: &Fields) -> Result<f64, Self::Error>;

    /// Assembles the gradient with respect to control `index`.
    ///
    /// The result is the representative of the derivative in the scalar
    /// product given by [`inner`](Self::inner).
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the gradient cannot be computed.
    fn gradient(&self, index: usize, fields: &Fields) -> Result<Field, Self::Error>;

    /// Scalar product on the space of control `index`.
    ///
    /// Defaults to the Euclidean product of nodal values.
    fn inner(&self, _index: usize, a: &[f64], b: &[f64]) -> f64 {
        vector::dot(a, b)
    }
}
