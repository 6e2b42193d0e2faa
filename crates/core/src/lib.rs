//! Core traits and types for PDE-constrained optimization.
//!
//! This crate defines the shared abstractions that solvers and observers
//! build on:
//!
//! - [`Fields`]: the controls, states and adjoints of a problem, stored as
//!   discretized nodal values
//! - [`PdeBackend`]: the narrow interface to an external finite-element
//!   solver (assemble, solve, boundary conditions, norms)
//! - [`ControlProblem`]: the cost functional, its gradient and the scalar
//!   product on the control space
//! - [`Observer`]: receives solver events and optionally returns control actions

mod backend;
mod fields;
mod observer;
mod problem;

pub mod vector;

pub use backend::{PdeBackend, System};
pub use fields::{Field, Fields};
pub use observer::Observer;
pub use problem::ControlProblem;
