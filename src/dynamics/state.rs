//! Payload state.

use crate::geometry::{is_finite, Vec3};

/// Kinematic state of the payload.
///
/// Owned by the caller and changed only through [`Integrator`] methods.
/// Acceleration is recomputed on every step and kept for inspection.
///
/// [`Integrator`]: super::Integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadState {
    /// Position in workspace units.
    pub position: Vec3,
    /// Velocity.
    pub velocity: Vec3,
    /// Acceleration from the last step.
    pub acceleration: Vec3,
}

impl PayloadState {
    /// Payload at rest at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
            acceleration: Vec3::zeros(),
        }
    }

    /// Whether every component of the state is finite.
    pub fn is_finite(&self) -> bool {
        is_finite(&self.position) && is_finite(&self.velocity) && is_finite(&self.acceleration)
    }

    /// Speed (velocity magnitude).
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }
}

impl Default for PayloadState {
    fn default() -> Self {
        Self::at(Vec3::zeros())
    }
}
