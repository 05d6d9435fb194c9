//! Robot facade tying configuration, kinematics, tension allocation,
//! dynamics and actuation together.

use crate::actuation::{ActuationCommand, ActuationDispatcher, ActuationPlan, SpoolPositions};
use crate::command::Command;
use crate::config::{JogStrategy, RobotConfig};
use crate::dynamics::{Integrator, PayloadState, StepReport};
use crate::error::Result;
use crate::geometry::{AnchorSet, Vec3, WorkspaceBounds};
use crate::kinematics::{
    cable_lengths, forward_kinematics, plan_steps_from_lengths, CableLengths, CableStates,
    ModeTable, MovementMode,
};
use crate::tension::{Allocation, TensionAllocator};

/// Result of one force-driven control cycle.
#[derive(Debug, Clone)]
pub struct ForceCycle {
    /// Cables at the start of the cycle, with the allocated tensions.
    pub cables: CableStates,
    /// Tension solve outcome.
    pub allocation: Allocation,
    /// One tension command per anchor, built from `allocation`.
    pub plan: ActuationPlan,
    /// Integration outcome.
    pub report: StepReport,
}

/// A cable robot built from one configuration.
///
/// `CableRobot` owns all mutable state: the payload state, the spool step
/// counters and the cable lengths the spools have been driven to. Each call
/// runs one control cycle to completion; there is no background activity.
///
/// Position moves are planned from the driven lengths rather than from the
/// tracked position, so step rounding never accumulates: every cable stays
/// within half a step of its length at the tracked position.
///
/// # Example
///
/// ```rust,ignore
/// use cable_motion::{CableRobot, RecordingDispatcher};
/// use cable_motion::command::parse_command;
///
/// let config = cable_motion::load_config("robot.toml")?;
/// let mut robot = CableRobot::from_config(config)?;
/// let mut motors = RecordingDispatcher::new(robot.anchors().len());
///
/// robot.execute(&parse_command("w")?, &mut motors)?;
/// robot.execute(&parse_command("0,-50,0")?, &mut motors)?;
/// ```
#[derive(Debug, Clone)]
pub struct CableRobot {
    config: RobotConfig,
    anchors: AnchorSet,
    bounds: WorkspaceBounds,
    modes: ModeTable,
    allocator: TensionAllocator,
    integrator: Integrator,
    state: PayloadState,
    spools: SpoolPositions,
    lengths: CableLengths,
}

impl CableRobot {
    /// Build a robot from configuration.
    ///
    /// The payload starts at rest at the configured initial position
    /// (clamped into the workspace box); spool counters start at zero.
    ///
    /// # Errors
    ///
    /// Returns the first configuration validation error.
    pub fn from_config(config: RobotConfig) -> Result<Self> {
        let anchors = AnchorSet::from_config(&config)?;
        let up_axis = config.physics.up_axis;
        let bounds = WorkspaceBounds::from_config(&anchors, &config.workspace, up_axis);
        let modes = ModeTable::from_config(&config.modes, &config.spool, &anchors);
        let allocator = TensionAllocator::from_config(&config.physics);
        let integrator = Integrator::new(&config.physics, bounds);
        let state = PayloadState::at(bounds.clamp(&config.physics.initial_position()));
        let spools = SpoolPositions::new(anchors.len());
        let lengths = cable_lengths(&anchors, &state.position)?;

        info!(
            "cable robot ready: {} anchors, payload at {} {} {}",
            anchors.len(),
            state.position.x,
            state.position.y,
            state.position.z
        );

        Ok(Self {
            config,
            anchors,
            bounds,
            modes,
            allocator,
            integrator,
            state,
            spools,
            lengths,
        })
    }

    /// Configuration the robot was built from.
    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    /// Anchor set.
    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    /// Workspace collision box.
    pub fn bounds(&self) -> &WorkspaceBounds {
        &self.bounds
    }

    /// Resolved jog table.
    pub fn modes(&self) -> &ModeTable {
        &self.modes
    }

    /// Tension allocator.
    pub fn allocator(&self) -> &TensionAllocator {
        &self.allocator
    }

    /// Payload integrator.
    pub fn integrator(&self) -> &Integrator {
        &self.integrator
    }

    /// Current payload state.
    pub fn state(&self) -> &PayloadState {
        &self.state
    }

    /// Current payload position.
    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    /// Signed steps taken by every spool since startup.
    pub fn spool_positions(&self) -> &SpoolPositions {
        &self.spools
    }

    /// Cable lengths the spools have been driven to, in anchor order.
    ///
    /// Each is within half a step of the true length at [`CableRobot::position`].
    pub fn driven_lengths(&self) -> &[f32] {
        &self.lengths
    }

    /// Cable lengths and directions for the current position.
    ///
    /// # Errors
    ///
    /// Returns `KinematicsError::NonFinite` if the state has gone non-finite.
    pub fn cables(&self) -> Result<CableStates> {
        forward_kinematics(&self.anchors, &self.state.position)
    }

    /// Put the payload back at its initial position, at rest, and zero the
    /// spool counters.
    ///
    /// # Errors
    ///
    /// Returns `KinematicsError::NonFinite` if the initial position is not
    /// finite.
    pub fn reset(&mut self) -> Result<()> {
        let state = PayloadState::at(self.bounds.clamp(&self.config.physics.initial_position()));
        self.lengths = cable_lengths(&self.anchors, &state.position)?;
        self.state = state;
        self.spools.reset();
        Ok(())
    }

    /// One force-driven cycle with the configured period.
    ///
    /// # Errors
    ///
    /// Same as [`CableRobot::force_cycle_with_dt`].
    pub fn force_cycle(&mut self, desired_force: &Vec3) -> Result<ForceCycle> {
        self.force_cycle_with_dt(desired_force, self.integrator.dt())
    }

    /// One force-driven cycle: forward kinematics, tension allocation for
    /// `desired_force` plus gravity compensation, then one integration step
    /// of `dt` seconds.
    ///
    /// The returned cycle carries the tension plan but nothing is
    /// dispatched; see [`CableRobot::drive_force`].
    ///
    /// # Errors
    ///
    /// - `KinematicsError::NonFinite` for a non-finite state
    /// - `KinematicsError::InvalidTimeStep` for a bad `dt`
    pub fn force_cycle_with_dt(&mut self, desired_force: &Vec3, dt: f32) -> Result<ForceCycle> {
        let cycle = self.allocate(desired_force)?;
        self.integrate(cycle, dt)
    }

    /// One force-driven cycle with the configured period, sending the
    /// tension plan to `dispatcher` before the payload is integrated.
    ///
    /// # Errors
    ///
    /// Same as [`CableRobot::force_cycle_with_dt`], or the dispatcher's
    /// `ActuationError`. On a dispatch failure the state is left unchanged.
    pub fn drive_force<D>(&mut self, desired_force: &Vec3, dispatcher: &mut D) -> Result<ForceCycle>
    where
        D: ActuationDispatcher + ?Sized,
    {
        let cycle = self.allocate(desired_force)?;
        dispatcher.dispatch(&cycle.plan)?;
        self.integrate(cycle, self.integrator.dt())
    }

    fn allocate(&self, desired_force: &Vec3) -> Result<ForceCycle> {
        let mut cables = forward_kinematics(&self.anchors, &self.state.position)?;
        let allocation = self.allocator.allocate_into(&mut cables, desired_force);
        let plan = ActuationPlan::from_allocation(&allocation);

        Ok(ForceCycle {
            cables,
            allocation,
            plan,
            report: StepReport {
                net_force: Vec3::zeros(),
                bounced: [false; 3],
            },
        })
    }

    fn integrate(&mut self, mut cycle: ForceCycle, dt: f32) -> Result<ForceCycle> {
        let mut state = self.state;
        cycle.report = self.integrator.step(&mut state, &cycle.cables, dt)?;
        // Held under tension, the cables follow the payload
        self.lengths = cable_lengths(&self.anchors, &state.position)?;
        self.state = state;
        Ok(cycle)
    }

    /// Step plan that would carry the payload to `target` (clamped into the
    /// workspace box), and where it would end up. Nothing changes.
    ///
    /// # Errors
    ///
    /// Returns `KinematicsError::NonFinite` for a non-finite target.
    pub fn plan_move(&self, target: &Vec3) -> Result<(ActuationPlan, Vec3)> {
        let mut end = self.state;
        let reached = self.integrator.step_to_target(&mut end, target)?;
        let moves = plan_steps_from_lengths(&self.anchors, &self.config.spool, &self.lengths, &reached)?;
        let plan = ActuationPlan::from_moves(&moves, self.config.spool.half_step_delay);

        Ok((plan, reached))
    }

    /// Move to `target` in position-driven mode and return the step plan.
    ///
    /// The payload is placed at the clamped target at rest and the spool
    /// counters advance by the plan.
    ///
    /// # Errors
    ///
    /// Same as [`CableRobot::plan_move`].
    pub fn move_to(&mut self, target: &Vec3) -> Result<ActuationPlan> {
        let (plan, reached) = self.plan_move(target)?;
        self.commit(&plan, Some(reached));
        Ok(plan)
    }

    /// Step plan for one jog, per the configured strategy, and the
    /// resulting position. Nothing changes.
    ///
    /// The geometry strategy moves `jog_distance` along the mode's axis. The
    /// table strategy replays the fixed row; it knows nothing about geometry,
    /// so the tracked position stays where it is while the driven lengths
    /// change. The next position move makes up the difference.
    ///
    /// # Errors
    ///
    /// `KinematicsError::ModeTableUnavailable` when the table strategy has no
    /// row for this mode.
    pub fn plan_jog(&self, mode: MovementMode) -> Result<(ActuationPlan, Option<Vec3>)> {
        match self.config.modes.strategy {
            JogStrategy::Geometry => {
                let offset = mode.direction(self.config.physics.up_axis) * self.config.modes.jog_distance;
                let target = self.state.position + offset;
                let (plan, reached) = self.plan_move(&target)?;
                Ok((plan, Some(reached)))
            }
            JogStrategy::Table => Ok((ActuationPlan::from_mode(&self.modes, mode)?, None)),
        }
    }

    /// Jog once in `mode` and return the step plan.
    ///
    /// # Errors
    ///
    /// Same as [`CableRobot::plan_jog`].
    pub fn jog(&mut self, mode: MovementMode) -> Result<ActuationPlan> {
        let (plan, reached) = self.plan_jog(mode)?;
        self.commit(&plan, reached);
        Ok(plan)
    }

    /// Decode-and-run entry point: plan the command, dispatch the plan, and
    /// only then update the tracked state.
    ///
    /// `Stop` dispatches nothing and brings the payload to rest.
    ///
    /// # Errors
    ///
    /// Planning errors, or the dispatcher's `ActuationError`. On a dispatch
    /// failure the tracked state is left as it was before the command.
    pub fn execute<D>(&mut self, command: &Command, dispatcher: &mut D) -> Result<()>
    where
        D: ActuationDispatcher + ?Sized,
    {
        let (plan, reached) = match command {
            Command::Move(mode) => self.plan_jog(*mode)?,
            Command::Target(target) => {
                let (plan, reached) = self.plan_move(target)?;
                (plan, Some(reached))
            }
            Command::Stop => {
                self.state.velocity = Vec3::zeros();
                self.state.acceleration = Vec3::zeros();
                return Ok(());
            }
        };

        dispatcher.dispatch(&plan)?;
        self.commit(&plan, reached);
        Ok(())
    }

    /// Run a jog sequence, one mode at a time.
    ///
    /// # Errors
    ///
    /// Stops at the first failing jog; earlier jogs stay applied.
    pub fn execute_sequence<D>(&mut self, sequence: &[MovementMode], dispatcher: &mut D) -> Result<()>
    where
        D: ActuationDispatcher + ?Sized,
    {
        for mode in sequence {
            self.execute(&Command::Move(*mode), dispatcher)?;
        }
        Ok(())
    }

    fn commit(&mut self, plan: &ActuationPlan, reached: Option<Vec3>) {
        self.spools.apply(plan);

        let length_per_step = self.config.spool.length_per_step();
        for (length, command) in self.lengths.iter_mut().zip(plan.iter()) {
            if let ActuationCommand::Step(cmd) = command {
                *length += cmd.signed_steps() as f32 * length_per_step;
            }
        }

        if let Some(position) = reached {
            self.state = PayloadState::at(position);
        }
        debug!(
            "plan committed: {} motors, up to {} steps",
            plan.len(),
            plan.max_steps().0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuation::{ActuationCommand, RecordingDispatcher};
    use crate::config::{AnchorConfig, ModesConfig, PhysicsConfig, SpoolConfig, WorkspaceConfig};
    use crate::error::{ActuationError, Error};
    use crate::kinematics::{Direction, SpoolAction};

    fn reference_config() -> RobotConfig {
        let anchor = |name: &str, position: [f32; 3], shorten_direction| AnchorConfig {
            name: heapless::String::try_from(name).unwrap(),
            position,
            shorten_direction,
        };

        RobotConfig {
            anchors: [
                anchor("C1", [-200.0, 200.0, -200.0], Direction::Clockwise),
                anchor("C2", [-200.0, 200.0, 200.0], Direction::Clockwise),
                anchor("C3", [200.0, 200.0, 200.0], Direction::CounterClockwise),
                anchor("C4", [200.0, 200.0, -200.0], Direction::CounterClockwise),
            ]
            .into_iter()
            .collect(),
            spool: SpoolConfig::new(10.0, 200),
            physics: PhysicsConfig::default(),
            workspace: WorkspaceConfig::default(),
            modes: ModesConfig::default(),
        }
    }

    struct BrokenDispatcher;

    impl ActuationDispatcher for BrokenDispatcher {
        fn dispatch(&mut self, _plan: &ActuationPlan) -> Result<()> {
            Err(ActuationError::PinError.into())
        }
    }

    #[test]
    fn test_force_cycle_hovers() {
        let mut robot = CableRobot::from_config(reference_config()).unwrap();

        let cycle = robot.force_cycle(&Vec3::zeros()).unwrap();

        assert_eq!(cycle.cables.len(), 4);
        assert!(cycle.allocation.tensions.iter().all(|t| *t > 0.0 && *t <= 50.0));
        assert!(robot.position().norm() < 1e-4);
    }

    #[test]
    fn test_move_to_tracks_spools() {
        let mut robot = CableRobot::from_config(reference_config()).unwrap();

        let plan = robot.move_to(&Vec3::new(0.0, 50.0, 0.0)).unwrap();

        assert_eq!(robot.position(), Vec3::new(0.0, 50.0, 0.0));
        for (i, cmd) in plan.iter().enumerate() {
            let cmd = cmd.as_step().unwrap();
            assert_eq!(cmd.action, SpoolAction::Shorten);
            assert_eq!(robot.spool_positions().get(i), Some(-(cmd.steps.0 as i64)));
        }

        // Going back releases the same amount
        robot.move_to(&Vec3::zeros()).unwrap();
        assert!(robot.spool_positions().as_slice().iter().all(|s| *s == 0));
    }

    #[test]
    fn test_move_to_clamps_target() {
        let mut robot = CableRobot::from_config(reference_config()).unwrap();
        robot.move_to(&Vec3::new(1000.0, 0.0, 0.0)).unwrap();
        assert_eq!(robot.position(), Vec3::new(200.0, 0.0, 0.0));
    }

    #[test]
    fn test_geometry_jog_moves_payload() {
        let mut robot = CableRobot::from_config(reference_config()).unwrap();
        let mut motors = RecordingDispatcher::new(4);

        robot.execute(&Command::Move(MovementMode::Up), &mut motors).unwrap();

        assert_eq!(robot.position(), Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(motors.dispatched(), 1);
        assert_eq!(motors.positions(), robot.spool_positions());
    }

    #[test]
    fn test_table_jog_replays_row() {
        let mut config = reference_config();
        config.modes.strategy = JogStrategy::Table;
        let mut robot = CableRobot::from_config(config).unwrap();

        let plan = robot.jog(MovementMode::Forward).unwrap();

        let directions: heapless::Vec<Direction, 4> = plan
            .iter()
            .filter_map(ActuationCommand::as_step)
            .map(|c| c.direction)
            .collect();
        use Direction::{Clockwise as CW, CounterClockwise as CCW};
        assert_eq!(directions.as_slice(), &[CW, CCW, CW, CCW]);
        assert_eq!(robot.spool_positions().as_slice(), &[-100, 100, 100, -100]);
        assert_eq!(robot.position(), Vec3::zeros());
    }

    #[test]
    fn test_small_jogs_carry_rounding() {
        let mut config = reference_config();
        // A fifth of a step's worth of cable per jog
        config.modes.jog_distance = 0.01;
        let mut robot = CableRobot::from_config(config).unwrap();
        let half_step = robot.config().spool.length_per_step() / 2.0;

        for _ in 0..200 {
            robot.jog(MovementMode::Up).unwrap();
        }

        assert!((robot.position().y - 2.0).abs() < 1e-3);
        let spools = robot.spool_positions().as_slice();
        assert!(spools[0] < 0);
        assert!(spools.iter().all(|s| *s == spools[0]));
        for (driven, cable) in robot.driven_lengths().iter().zip(robot.cables().unwrap().iter()) {
            assert!((driven - cable.length).abs() <= half_step + 1e-3);
        }

        robot.move_to(&Vec3::zeros()).unwrap();
        assert!(robot.spool_positions().as_slice().iter().all(|s| *s == 0));
    }

    #[test]
    fn test_move_after_table_jog_undoes_steps() {
        let mut config = reference_config();
        config.modes.strategy = JogStrategy::Table;
        let mut robot = CableRobot::from_config(config).unwrap();

        robot.jog(MovementMode::Forward).unwrap();
        assert_eq!(robot.spool_positions().as_slice(), &[-100, 100, 100, -100]);

        // Position never moved, but the cables did
        robot.move_to(&Vec3::zeros()).unwrap();
        assert!(robot.spool_positions().as_slice().iter().all(|s| *s == 0));
    }

    #[test]
    fn test_drive_force_dispatches_tensions() {
        let mut robot = CableRobot::from_config(reference_config()).unwrap();
        let mut motors = RecordingDispatcher::new(4);

        let cycle = robot.drive_force(&Vec3::new(5.0, 0.0, 0.0), &mut motors).unwrap();

        assert_eq!(motors.dispatched(), 1);
        assert!(!cycle.plan.is_step_plan());
        assert_eq!(motors.tensions(), cycle.allocation.tensions.as_slice());
        assert_eq!(motors.last_plan(), Some(&cycle.plan));
        assert!(robot.position().x > 0.0);
    }

    #[test]
    fn test_drive_force_failure_keeps_state() {
        let mut robot = CableRobot::from_config(reference_config()).unwrap();

        let result = robot.drive_force(&Vec3::new(5.0, 0.0, 0.0), &mut BrokenDispatcher);

        assert!(matches!(result, Err(Error::Actuation(ActuationError::PinError))));
        assert_eq!(robot.position(), Vec3::zeros());
    }

    #[test]
    fn test_dispatch_failure_keeps_state() {
        let mut robot = CableRobot::from_config(reference_config()).unwrap();

        let result = robot.execute(&Command::Target(Vec3::new(0.0, 50.0, 0.0)), &mut BrokenDispatcher);

        assert!(matches!(result, Err(Error::Actuation(ActuationError::PinError))));
        assert_eq!(robot.position(), Vec3::zeros());
        assert!(robot.spool_positions().as_slice().iter().all(|s| *s == 0));
    }

    #[test]
    fn test_stop_brings_payload_to_rest() {
        let mut robot = CableRobot::from_config(reference_config()).unwrap();
        robot.force_cycle(&Vec3::new(0.0, 0.0, 20.0)).unwrap();
        assert!(robot.state().speed() > 0.0);

        robot.execute(&Command::Stop, &mut BrokenDispatcher).unwrap();
        assert_eq!(robot.state().speed(), 0.0);
    }
}
