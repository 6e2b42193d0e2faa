//! Reusable observers for pdeopt solvers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work across the Newton, Picard, line search and gradient descent solvers.
//!
//! # Modules
//!
//! - [`traits`]: Capability traits for cross-solver observers
//!   ([`HasResidual`], [`HasObjective`], [`CanStopEarly`])
//! - [`history`]: [`HistoryObserver`], which records named traces of solver
//!   events for later inspection or export
//!
//! [`Observer`]: pdeopt_core::Observer
//! [`HasResidual`]: traits::HasResidual
//! [`HasObjective`]: traits::HasObjective
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod history;
pub mod traits;

pub use history::{HistoryObserver, Traceable};
