//! One-dimensional two-electrode cell simulator.
//!
//! The crate takes the raw text a user typed into an input form, turns it
//! into a validated, fully populated parameter record, maps that record onto
//! the state vectors and banded-Jacobian structure an implicit DAE
//! integrator needs, and drives the integration to a requested end time
//! while streaming `(time, state)` samples back to the caller.
//!
//! Pipeline: [`parameters::ParameterSet`] → [`parameters::ValidatedParameters`]
//! → [`numerics::SolverProblem`] → [`numerics::SolveSession`].

pub mod discretization;
pub mod numerics;
pub mod parameters;
pub mod physics;
pub mod processing;
