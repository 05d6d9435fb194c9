//! Actuation commands and plans.

use heapless::Vec;

use crate::config::units::{Newtons, Seconds, Steps};
use crate::error::{ActuationError, Result};
use crate::geometry::MAX_ANCHORS;
use crate::kinematics::{Direction, ModeTable, MovementMode, SpoolAction, SpoolMoves};
use crate::tension::Allocation;

/// Step a spool a fixed number of times in one direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepCommand {
    /// Shorten or release.
    pub action: SpoolAction,
    /// Rotation performing `action` on this spool.
    pub direction: Direction,
    /// Number of steps.
    pub steps: Steps,
    /// Time STEP is held high, and then low, per step.
    pub half_step_delay: Seconds,
}

impl StepCommand {
    /// Wall time the command takes on its own clock.
    #[inline]
    pub fn duration(&self) -> Seconds {
        self.half_step_delay * (2.0 * self.steps.0 as f32)
    }

    /// Signed step count (negative when shortening).
    #[inline]
    pub fn signed_steps(&self) -> i64 {
        self.action.sign() * self.steps.0 as i64
    }
}

/// What one motor should do this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuationCommand {
    /// Position-driven: step the spool.
    Step(StepCommand),
    /// Force-driven: hold this tension.
    Tension(Newtons),
}

impl ActuationCommand {
    /// The step command, if this is one.
    #[inline]
    pub fn as_step(&self) -> Option<&StepCommand> {
        match self {
            ActuationCommand::Step(cmd) => Some(cmd),
            ActuationCommand::Tension(_) => None,
        }
    }

    /// The tension, if this is a tension command.
    #[inline]
    pub fn tension(&self) -> Option<Newtons> {
        match self {
            ActuationCommand::Tension(t) => Some(*t),
            ActuationCommand::Step(_) => None,
        }
    }
}

/// One command per anchor, in anchor order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActuationPlan {
    commands: Vec<ActuationCommand, MAX_ANCHORS>,
}

impl ActuationPlan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan from geometry-derived spool moves, all at one half-step delay.
    pub fn from_moves(moves: &SpoolMoves, half_step_delay: Seconds) -> Self {
        let commands = moves
            .iter()
            .map(|m| {
                ActuationCommand::Step(StepCommand {
                    action: m.action,
                    direction: m.direction,
                    steps: m.steps,
                    half_step_delay,
                })
            })
            .collect();

        Self { commands }
    }

    /// Plan replaying a jog mode's fixed table row.
    ///
    /// # Errors
    ///
    /// Returns `KinematicsError::ModeTableUnavailable` if the table has no
    /// row for this mode.
    pub fn from_mode(table: &ModeTable, mode: MovementMode) -> Result<Self> {
        let actions = table.actions(mode)?;
        let directions = table.directions(mode)?;

        let commands = actions
            .iter()
            .zip(directions)
            .map(|(action, direction)| {
                ActuationCommand::Step(StepCommand {
                    action: *action,
                    direction: *direction,
                    steps: table.steps(),
                    half_step_delay: table.half_step_delay(),
                })
            })
            .collect();

        Ok(Self { commands })
    }

    /// Plan holding the allocated tensions.
    pub fn from_allocation(allocation: &Allocation) -> Self {
        Self::from_tensions(&allocation.tensions)
    }

    /// Plan holding the given tensions.
    pub fn from_tensions(tensions: &[f32]) -> Self {
        let commands = tensions
            .iter()
            .take(MAX_ANCHORS)
            .map(|t| ActuationCommand::Tension(Newtons(*t)))
            .collect();

        Self { commands }
    }

    /// Append a command.
    ///
    /// # Errors
    ///
    /// Returns `ActuationError::MotorCountMismatch` when the plan already
    /// holds [`MAX_ANCHORS`] commands.
    pub fn push(&mut self, command: ActuationCommand) -> Result<()> {
        self.commands.push(command).map_err(|_| {
            ActuationError::MotorCountMismatch {
                commands: MAX_ANCHORS + 1,
                motors: MAX_ANCHORS,
            }
            .into()
        })
    }

    /// Number of commands.
    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the plan has no commands.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Command for one motor.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&ActuationCommand> {
        self.commands.get(index)
    }

    /// All commands, in motor order.
    #[inline]
    pub fn commands(&self) -> &[ActuationCommand] {
        &self.commands
    }

    /// Iterate over commands in motor order.
    pub fn iter(&self) -> impl Iterator<Item = &ActuationCommand> {
        self.commands.iter()
    }

    /// Largest step count of any step command.
    pub fn max_steps(&self) -> Steps {
        self.iter()
            .filter_map(ActuationCommand::as_step)
            .map(|c| c.steps)
            .max()
            .unwrap_or(Steps::ZERO)
    }

    /// Whether every command is a step command.
    pub fn is_step_plan(&self) -> bool {
        self.iter().all(|c| c.as_step().is_some())
    }

    /// Whether no motor has anything to step.
    pub fn is_idle(&self) -> bool {
        self.max_steps().is_zero() && self.is_step_plan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ModesConfig, SpoolConfig};
    use crate::geometry::{AnchorSet, Vec3};
    use crate::kinematics::plan_steps;

    fn anchors() -> AnchorSet {
        AnchorSet::from_positions(&[
            Vec3::new(-200.0, 200.0, -200.0),
            Vec3::new(-200.0, 200.0, 200.0),
            Vec3::new(200.0, 200.0, 200.0),
            Vec3::new(200.0, 200.0, -200.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_plan_from_moves() {
        let spool = SpoolConfig::new(10.0, 200);
        let moves = plan_steps(&anchors(), &spool, &Vec3::zeros(), &Vec3::new(0.0, 10.0, 0.0)).unwrap();
        let plan = ActuationPlan::from_moves(&moves, Seconds(0.001));

        assert_eq!(plan.len(), 4);
        assert!(plan.is_step_plan());
        assert!(!plan.is_idle());
        for cmd in plan.iter().filter_map(ActuationCommand::as_step) {
            assert_eq!(cmd.action, SpoolAction::Shorten);
            assert_eq!(cmd.half_step_delay, Seconds(0.001));
        }
    }

    #[test]
    fn test_plan_from_mode() {
        let table = ModeTable::from_config(&ModesConfig::default(), &SpoolConfig::new(10.0, 200), &anchors());
        let plan = ActuationPlan::from_mode(&table, MovementMode::Down).unwrap();

        assert_eq!(plan.max_steps(), Steps(100));
        assert!(plan
            .iter()
            .filter_map(ActuationCommand::as_step)
            .all(|c| c.action == SpoolAction::Release && c.direction == Direction::CounterClockwise));
    }

    #[test]
    fn test_tension_plan() {
        let plan = ActuationPlan::from_tensions(&[1.0, 2.0, 3.0]);

        assert_eq!(plan.len(), 3);
        assert!(!plan.is_step_plan());
        assert_eq!(plan.get(1).unwrap().tension(), Some(Newtons(2.0)));
        assert_eq!(plan.max_steps(), Steps::ZERO);
    }

    #[test]
    fn test_step_duration() {
        let cmd = StepCommand {
            action: SpoolAction::Release,
            direction: Direction::Clockwise,
            steps: Steps(100),
            half_step_delay: Seconds(0.15),
        };
        assert!((cmd.duration().value() - 30.0).abs() < 1e-3);
        assert_eq!(cmd.signed_steps(), 100);
    }
}
