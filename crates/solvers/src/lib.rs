//! Solvers for PDE-constrained optimization.
//!
//! The crate is layered bottom-up:
//!
//! - [`equation`]: Newton and Picard iteration on backend residuals
//! - [`pde`]: memoized state and adjoint solves built on those solvers
//! - [`optimization`]: the optimization context, Armijo line search and
//!   gradient descent
//! - [`settings`]: TOML settings that select strategies and tolerances
//!
//! Every solver reports progress through an [`Observer`] and logs through
//! [`tracing`]. Install a subscriber to see the output.
//!
//! [`Observer`]: pdeopt_core::Observer

pub mod equation;
pub mod optimization;
pub mod pde;
pub mod settings;

#[cfg(test)]
mod test_utils;

pub use optimization::OptimizationProblem;
pub use settings::Settings;
