//! State and adjoint solve orchestration.
//!
//! A [`SystemProblem`] solves every subsystem of the state or adjoint system
//! with a configured [`Strategy`] and remembers whether its solution is still
//! valid. Callers invalidate it explicitly whenever its inputs change.

mod error;
mod memo;
mod strategy;
mod system;

pub use error::Error;
pub use memo::Memo;
pub use strategy::Strategy;
pub use system::SystemProblem;
