//! Solvers for nonlinear residual equations.
//!
//! A [`PdeBackend`] assembles residuals and linearized corrections for the
//! subsystems of a state or adjoint system. Solvers in this module drive those
//! residuals toward zero.
//!
//! # Solvers
//!
//! - [`newton`]: damped or undamped Newton iteration for one subsystem
//! - [`picard`]: fixed-point iteration over coupled subsystems, with an
//!   inner Newton solve per subsystem
//!
//! [`PdeBackend`]: pdeopt_core::PdeBackend

pub mod newton;
pub mod picard;
