//! Payload dynamics configuration.

use serde::Deserialize;

use crate::geometry::{Axis, Vec3};

/// Physical parameters of the payload and the control cycle.
///
/// Defaults reproduce the reference simulation: 1 kg payload, 9.81 m/s²
/// gravity along +Y up, 0.7 linear damping, 50 ms cycle, 50 N tension cap.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Payload mass.
    pub mass: f32,

    /// Gravity magnitude, acting against `up_axis`.
    pub gravity: f32,

    /// Linear damping coefficient per second.
    pub damping: f32,

    /// Fixed control-cycle period in seconds.
    pub dt: f32,

    /// Velocity retained (and inverted) on a boundary bounce.
    pub restitution: f32,

    /// Rated maximum cable tension.
    pub max_tension: f32,

    /// Axis pointing up, against gravity.
    pub up_axis: Axis,

    /// Payload position at startup. Nothing persists across restarts.
    pub initial_position: [f32; 3],
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            gravity: 9.81,
            damping: 0.7,
            dt: 0.05,
            restitution: 0.5,
            max_tension: 50.0,
            up_axis: Axis::Y,
            initial_position: [0.0; 3],
        }
    }
}

impl PhysicsConfig {
    /// Gravity force on the payload (points down).
    pub fn weight(&self) -> Vec3 {
        self.up_axis.unit() * (-self.mass * self.gravity)
    }

    /// Initial payload position as a vector.
    pub fn initial_position(&self) -> Vec3 {
        Vec3::from(self.initial_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_points_down_the_up_axis() {
        let physics = PhysicsConfig {
            mass: 2.0,
            up_axis: Axis::Z,
            ..PhysicsConfig::default()
        };

        let w = physics.weight();
        assert_eq!(w.x, 0.0);
        assert_eq!(w.y, 0.0);
        assert!((w.z + 19.62).abs() < 1e-4);
    }
}
