//! Gradient-based optimization of PDE-constrained problems.
//!
//! An [`OptimizationProblem`] owns the fields of a problem and keeps its
//! state, adjoint and gradient consistent with the current controls. Solvers
//! in this module move the controls downhill.
//!
//! # Solvers
//!
//! - [`line_search`]: Armijo backtracking along a search direction
//! - [`gradient_descent`]: steepest descent globalized by the line search

mod error;
mod problem;

pub mod gradient_descent;
pub mod line_search;

pub use error::Error;
pub use problem::OptimizationProblem;
