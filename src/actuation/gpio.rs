//! Software-timed STEP/DIR dispatcher.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::Vec;

use super::{ActuationCommand, ActuationDispatcher, ActuationPlan, StepCommand};
use crate::error::{ActuationError, ConfigError, Error, Result};
use crate::geometry::MAX_ANCHORS;
use crate::kinematics::Direction;

/// STEP and DIR pins of one stepper driver.
pub struct StepperPins<STEP, DIR>
where
    STEP: OutputPin,
    DIR: OutputPin,
{
    step: STEP,
    dir: DIR,
    /// Cached to avoid redundant DIR writes.
    current_direction: Option<Direction>,
}

impl<STEP, DIR> StepperPins<STEP, DIR>
where
    STEP: OutputPin,
    DIR: OutputPin,
{
    /// Wrap a driver's pins.
    pub fn new(step: STEP, dir: DIR) -> Self {
        Self {
            step,
            dir,
            current_direction: None,
        }
    }

    /// Give the pins back.
    pub fn release(self) -> (STEP, DIR) {
        (self.step, self.dir)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        if direction.dir_level() {
            self.dir.set_high().map_err(|_| ActuationError::PinError)?;
        } else {
            self.dir.set_low().map_err(|_| ActuationError::PinError)?;
        }

        self.current_direction = Some(direction);
        Ok(())
    }
}

/// Drives every motor from one software clock.
///
/// All DIR pins are set first. Then, tick by tick, STEP goes high on every
/// motor that still owes steps, the dispatcher waits the smallest half-step
/// delay among those motors, drops STEP and waits again. Motors with fewer
/// steps finish early; the rest keep going. A plan runs to completion.
pub struct LockstepDispatcher<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    motors: Vec<StepperPins<STEP, DIR>, MAX_ANCHORS>,
    delay: DELAY,
}

impl<STEP, DIR, DELAY> LockstepDispatcher<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create a dispatcher with no motors.
    pub fn new(delay: DELAY) -> Self {
        Self {
            motors: Vec::new(),
            delay,
        }
    }

    /// Attach the next motor. Motors are indexed in the order added, which
    /// must match anchor order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TooManyAnchors` past [`MAX_ANCHORS`] motors.
    pub fn add_motor(&mut self, step: STEP, dir: DIR) -> Result<usize> {
        self.motors
            .push(StepperPins::new(step, dir))
            .map_err(|_| Error::Config(ConfigError::TooManyAnchors(MAX_ANCHORS + 1)))?;
        Ok(self.motors.len() - 1)
    }

    /// Builder form of [`LockstepDispatcher::add_motor`].
    ///
    /// # Errors
    ///
    /// Same as [`LockstepDispatcher::add_motor`].
    pub fn with_motor(mut self, step: STEP, dir: DIR) -> Result<Self> {
        self.add_motor(step, dir)?;
        Ok(self)
    }

    /// Number of attached motors.
    #[inline]
    pub fn motor_count(&self) -> usize {
        self.motors.len()
    }

    /// Delay provider.
    #[inline]
    pub fn delay(&self) -> &DELAY {
        &self.delay
    }

    /// Give back the pins and the delay provider.
    pub fn release(self) -> (Vec<StepperPins<STEP, DIR>, MAX_ANCHORS>, DELAY) {
        (self.motors, self.delay)
    }

    fn step_commands(&self, plan: &ActuationPlan) -> Result<Vec<StepCommand, MAX_ANCHORS>> {
        if plan.len() != self.motors.len() {
            return Err(ActuationError::MotorCountMismatch {
                commands: plan.len(),
                motors: self.motors.len(),
            }
            .into());
        }

        plan.iter()
            .map(|c| match c {
                ActuationCommand::Step(cmd) => Ok(*cmd),
                ActuationCommand::Tension(_) => Err(ActuationError::UnsupportedCommand.into()),
            })
            .collect()
    }
}

impl<STEP, DIR, DELAY> ActuationDispatcher for LockstepDispatcher<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn dispatch(&mut self, plan: &ActuationPlan) -> Result<()> {
        let commands = self.step_commands(plan)?;

        for (motor, cmd) in self.motors.iter_mut().zip(commands.iter()) {
            if !cmd.steps.is_zero() {
                motor.set_direction(cmd.direction)?;
            }
        }

        let mut remaining: Vec<u32, MAX_ANCHORS> = commands.iter().map(|c| c.steps.0).collect();
        let mut ticks: u32 = 0;

        debug!("lockstep dispatch: {} motors, {} ticks", commands.len(), plan.max_steps().0);

        loop {
            let half_step_ns = commands
                .iter()
                .zip(remaining.iter())
                .filter(|(_, r)| **r > 0)
                .map(|(c, _)| c.half_step_delay.as_nanos())
                .min();

            let Some(half_step_ns) = half_step_ns else {
                break;
            };

            for (motor, r) in self.motors.iter_mut().zip(remaining.iter()) {
                if *r > 0 {
                    motor.step.set_high().map_err(|_| ActuationError::PinError)?;
                }
            }
            self.delay.delay_ns(half_step_ns);

            for (motor, r) in self.motors.iter_mut().zip(remaining.iter_mut()) {
                if *r > 0 {
                    motor.step.set_low().map_err(|_| ActuationError::PinError)?;
                    *r -= 1;
                }
            }
            self.delay.delay_ns(half_step_ns);

            ticks += 1;
        }

        debug!("lockstep dispatch done after {} ticks", ticks);
        Ok(())
    }
}
