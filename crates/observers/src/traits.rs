//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, enabling
//! observers to work generically across different solvers.
//!
//! # Event traits
//!
//! - [`HasResidual`]: events that carry a residual norm
//! - [`HasObjective`]: events that carry an objective value
//!
//! # Action traits
//!
//! - [`CanStopEarly`]: actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use pdeopt_core::Observer;
//! use pdeopt_observers::traits::{CanStopEarly, HasResidual};
//!
//! struct GoodEnough {
//!     tolerance: f64,
//!     min_iters: usize,
//!     iter: usize,
//! }
//!
//! impl<E: HasResidual, A: CanStopEarly> Observer<E, A> for GoodEnough {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         self.iter += 1;
//!         if self.iter >= self.min_iters && event.residual() < self.tolerance {
//!             return Some(A::stop_early());
//!         }
//!         None
//!     }
//! }
//! ```

use pdeopt_solvers::{
    equation::{newton, picard},
    optimization::{gradient_descent, line_search},
};

/// An event that carries a residual norm.
pub trait HasResidual {
    /// Returns the residual norm for this event.
    fn residual(&self) -> f64;
}

/// An event that carries an objective value.
pub trait HasObjective {
    /// Returns the objective for this event.
    fn objective(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

// --- HasResidual impls ---

impl HasResidual for newton::Event {
    fn residual(&self) -> f64 {
        self.residual
    }
}

impl HasResidual for picard::Event {
    fn residual(&self) -> f64 {
        self.residual
    }
}

// --- HasObjective impls ---

impl HasObjective for line_search::Event {
    fn objective(&self) -> f64 {
        self.objective
    }
}

impl HasObjective for gradient_descent::Event {
    fn objective(&self) -> f64 {
        self.objective
    }
}

// --- CanStopEarly impls ---

impl CanStopEarly for newton::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanStopEarly for picard::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanStopEarly for line_search::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanStopEarly for gradient_descent::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
