//! Dynamics module for cable-motion.
//!
//! Discrete payload integration: cable tensions, gravity and linear damping
//! drive a point mass, and the workspace box clamps and bounces it.

mod integrator;
mod state;

pub use integrator::{Integrator, StepReport};
pub use state::PayloadState;
