//! Dispatcher without hardware.

use heapless::Vec;

use super::{ActuationCommand, ActuationDispatcher, ActuationPlan, SpoolPositions};
use crate::error::{ActuationError, Result};
use crate::geometry::MAX_ANCHORS;

/// Records plans instead of driving motors.
///
/// Used by the simulation profile and in tests. Accepts both step and
/// tension commands.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    motors: usize,
    dispatched: usize,
    last: Option<ActuationPlan>,
    positions: SpoolPositions,
    tensions: Vec<f32, MAX_ANCHORS>,
}

impl RecordingDispatcher {
    /// Create a recorder for `motors` spools.
    pub fn new(motors: usize) -> Self {
        Self {
            motors,
            positions: SpoolPositions::new(motors),
            ..Self::default()
        }
    }

    /// Number of plans dispatched.
    #[inline]
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    /// Most recent plan.
    #[inline]
    pub fn last_plan(&self) -> Option<&ActuationPlan> {
        self.last.as_ref()
    }

    /// Accumulated signed steps per spool.
    #[inline]
    pub fn positions(&self) -> &SpoolPositions {
        &self.positions
    }

    /// Tensions from the most recent tension plan.
    #[inline]
    pub fn tensions(&self) -> &[f32] {
        &self.tensions
    }
}

impl ActuationDispatcher for RecordingDispatcher {
    fn dispatch(&mut self, plan: &ActuationPlan) -> Result<()> {
        if plan.len() != self.motors {
            return Err(ActuationError::MotorCountMismatch {
                commands: plan.len(),
                motors: self.motors,
            }
            .into());
        }

        self.positions.apply(plan);

        if !plan.is_step_plan() {
            self.tensions = plan
                .iter()
                .map(|c| c.tension().map(|t| t.value()).unwrap_or(0.0))
                .collect();
        }

        debug!("recorded plan {} with {} commands", self.dispatched, plan.len());
        self.dispatched += 1;
        self.last = Some(plan.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuation::StepCommand;
    use crate::config::units::{Seconds, Steps};
    use crate::error::Error;
    use crate::kinematics::{Direction, SpoolAction};

    fn step(action: SpoolAction, steps: u32) -> ActuationCommand {
        ActuationCommand::Step(StepCommand {
            action,
            direction: Direction::Clockwise,
            steps: Steps(steps),
            half_step_delay: Seconds(0.001),
        })
    }

    #[test]
    fn test_accumulates_signed_steps() {
        let mut recorder = RecordingDispatcher::new(2);
        let mut plan = ActuationPlan::new();
        plan.push(step(SpoolAction::Shorten, 10)).unwrap();
        plan.push(step(SpoolAction::Release, 4)).unwrap();

        recorder.dispatch(&plan).unwrap();
        recorder.dispatch(&plan).unwrap();

        assert_eq!(recorder.dispatched(), 2);
        assert_eq!(recorder.positions().as_slice(), &[-20, 8]);
        assert_eq!(recorder.last_plan(), Some(&plan));
    }

    #[test]
    fn test_records_tensions() {
        let mut recorder = RecordingDispatcher::new(3);
        recorder.dispatch(&ActuationPlan::from_tensions(&[1.0, 0.0, 2.5])).unwrap();

        assert_eq!(recorder.tensions(), &[1.0, 0.0, 2.5]);
        assert_eq!(recorder.positions().as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn test_rejects_wrong_motor_count() {
        let mut recorder = RecordingDispatcher::new(4);
        let result = recorder.dispatch(&ActuationPlan::from_tensions(&[1.0]));

        assert!(matches!(
            result,
            Err(Error::Actuation(ActuationError::MotorCountMismatch { commands: 1, motors: 4 }))
        ));
        assert_eq!(recorder.dispatched(), 0);
    }
}
