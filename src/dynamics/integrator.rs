//! Semi-implicit Euler step with box collision.

use super::PayloadState;
use crate::config::PhysicsConfig;
use crate::error::{KinematicsError, Result};
use crate::geometry::{is_finite, Vec3, WorkspaceBounds};
use crate::kinematics::CableState;

/// What happened during one integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Net force that drove the step (cables plus weight).
    pub net_force: Vec3,
    /// Axes on which the payload hit a face and bounced.
    pub bounced: [bool; 3],
}

impl StepReport {
    /// Whether any axis bounced.
    #[inline]
    pub fn bounced_any(&self) -> bool {
        self.bounced.iter().any(|b| *b)
    }
}

/// Integrates payload motion inside the workspace box.
#[derive(Debug, Clone)]
pub struct Integrator {
    mass: f32,
    weight: Vec3,
    damping: f32,
    restitution: f32,
    dt: f32,
    bounds: WorkspaceBounds,
}

impl Integrator {
    /// Create an integrator from the physics configuration.
    pub fn new(physics: &PhysicsConfig, bounds: WorkspaceBounds) -> Self {
        Self {
            mass: physics.mass,
            weight: physics.weight(),
            damping: physics.damping,
            restitution: physics.restitution,
            dt: physics.dt,
            bounds,
        }
    }

    /// Configured control-cycle period.
    #[inline]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Collision box.
    #[inline]
    pub fn bounds(&self) -> &WorkspaceBounds {
        &self.bounds
    }

    /// Sum of cable forces plus the payload's weight.
    pub fn net_force(&self, cables: &[CableState]) -> Vec3 {
        cables.iter().fold(self.weight, |net, cable| net + cable.force())
    }

    /// Advance the payload by `dt` seconds under the given cable tensions.
    ///
    /// Velocity is updated first, then damped by `1 - damping * dt` (floored
    /// at zero), then used to move the position. A coordinate that leaves
    /// the box is put back on the face and its velocity component becomes
    /// `-v * restitution`.
    ///
    /// # Errors
    ///
    /// - `KinematicsError::InvalidTimeStep` if `dt` is not finite and positive
    /// - `KinematicsError::NonFinite` if the state or forces are not finite;
    ///   the state is left untouched
    pub fn step(&self, state: &mut PayloadState, cables: &[CableState], dt: f32) -> Result<StepReport> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(KinematicsError::InvalidTimeStep(dt).into());
        }

        let net_force = self.net_force(cables);
        if !is_finite(&net_force) || !state.is_finite() {
            return Err(KinematicsError::NonFinite.into());
        }

        let acceleration = net_force / self.mass;
        let mut velocity = state.velocity + acceleration * dt;
        velocity *= (1.0 - self.damping * dt).max(0.0);
        let mut position = state.position + velocity * dt;

        let bounced = self.bounds.collide(&mut position, &mut velocity, self.restitution);
        if bounced.iter().any(|b| *b) {
            debug!("payload bounced on axes x={} y={} z={}", bounced[0], bounced[1], bounced[2]);
        }

        state.position = position;
        state.velocity = velocity;
        state.acceleration = acceleration;

        Ok(StepReport { net_force, bounced })
    }

    /// [`Integrator::step`] with the configured period.
    ///
    /// # Errors
    ///
    /// Same as [`Integrator::step`].
    pub fn step_fixed(&self, state: &mut PayloadState, cables: &[CableState]) -> Result<StepReport> {
        self.step(state, cables, self.dt)
    }

    /// Position-driven step: place the payload at `target`, clamped into the
    /// box, at rest. Returns where it ended up.
    ///
    /// # Errors
    ///
    /// Returns `KinematicsError::NonFinite` for a non-finite target.
    pub fn step_to_target(&self, state: &mut PayloadState, target: &Vec3) -> Result<Vec3> {
        if !is_finite(target) {
            return Err(KinematicsError::NonFinite.into());
        }

        let position = self.bounds.clamp(target);
        *state = PayloadState::at(position);
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::geometry::AnchorSet;
    use crate::kinematics::forward_kinematics;
    use crate::tension::TensionAllocator;

    fn reference_anchors() -> AnchorSet {
        AnchorSet::from_positions(&[
            Vec3::new(-200.0, 200.0, -200.0),
            Vec3::new(-200.0, 200.0, 200.0),
            Vec3::new(200.0, 200.0, 200.0),
            Vec3::new(200.0, 200.0, -200.0),
        ])
        .unwrap()
    }

    fn integrator(physics: &PhysicsConfig) -> Integrator {
        Integrator::new(
            physics,
            WorkspaceBounds::from_anchors(&reference_anchors(), 0.0, physics.up_axis, 400.0),
        )
    }

    #[test]
    fn test_bounce_on_x_face() {
        let physics = PhysicsConfig {
            gravity: 0.0,
            damping: 0.0,
            ..PhysicsConfig::default()
        };
        let integrator = integrator(&physics);
        let mut state = PayloadState {
            position: Vec3::new(250.0, 0.0, 0.0),
            velocity: Vec3::new(10.0, 0.0, 0.0),
            acceleration: Vec3::zeros(),
        };

        let report = integrator.step(&mut state, &[], 0.05).unwrap();

        assert_eq!(report.bounced, [true, false, false]);
        assert_eq!(state.position.x, 200.0);
        assert!((state.velocity.x + 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_free_fall() {
        let physics = PhysicsConfig {
            damping: 0.0,
            ..PhysicsConfig::default()
        };
        let integrator = integrator(&physics);
        let mut state = PayloadState::default();

        let report = integrator.step(&mut state, &[], 0.05).unwrap();

        assert!(!report.bounced_any());
        assert!((state.acceleration.y + 9.81).abs() < 1e-5);
        assert!((state.velocity.y + 0.4905).abs() < 1e-5);
        assert!((state.position.y + 0.024525).abs() < 1e-6);
    }

    #[test]
    fn test_hover_with_allocated_tensions() {
        let physics = PhysicsConfig::default();
        let integrator = integrator(&physics);
        let allocator = TensionAllocator::from_config(&physics);
        let mut state = PayloadState::default();

        let mut cables = forward_kinematics(&reference_anchors(), &state.position).unwrap();
        allocator.allocate_into(&mut cables, &Vec3::zeros());
        integrator.step_fixed(&mut state, &cables).unwrap();

        assert!(state.position.norm() < 1e-4);
        assert!(state.acceleration.norm() < 1e-3);
    }

    #[test]
    fn test_damping_slows_payload() {
        let physics = PhysicsConfig {
            gravity: 0.0,
            ..PhysicsConfig::default()
        };
        let integrator = integrator(&physics);
        let mut state = PayloadState::default();
        state.velocity = Vec3::new(0.0, 0.0, 10.0);

        integrator.step(&mut state, &[], 0.05).unwrap();

        // 10 * (1 - 0.7 * 0.05)
        assert!((state.velocity.z - 9.65).abs() < 1e-4);
    }

    #[test]
    fn test_heavy_damping_stops_without_reversing() {
        let physics = PhysicsConfig {
            gravity: 0.0,
            damping: 30.0,
            ..PhysicsConfig::default()
        };
        let integrator = integrator(&physics);
        let mut state = PayloadState::default();
        state.velocity = Vec3::new(4.0, 0.0, 0.0);

        // damping * dt = 1.5: the factor would be -0.5
        integrator.step(&mut state, &[], 0.05).unwrap();

        assert_eq!(state.velocity, Vec3::zeros());
        assert_eq!(state.position, Vec3::zeros());
    }

    #[test]
    fn test_invalid_time_step() {
        let integrator = integrator(&PhysicsConfig::default());
        let mut state = PayloadState::default();

        for dt in [0.0, -0.1, f32::NAN] {
            let result = integrator.step(&mut state, &[], dt);
            assert!(matches!(
                result,
                Err(Error::Kinematics(KinematicsError::InvalidTimeStep(_)))
            ));
        }
        assert_eq!(state, PayloadState::default());
    }

    #[test]
    fn test_step_to_target_clamps() {
        let integrator = integrator(&PhysicsConfig::default());
        let mut state = PayloadState::default();
        state.velocity = Vec3::new(1.0, 2.0, 3.0);

        let reached = integrator
            .step_to_target(&mut state, &Vec3::new(500.0, 0.0, -10.0))
            .unwrap();

        assert_eq!(reached, Vec3::new(200.0, 0.0, -10.0));
        assert_eq!(state, PayloadState::at(reached));
    }
}
