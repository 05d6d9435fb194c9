//! Hardware step-generator dispatcher.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use super::{ActuationCommand, ActuationDispatcher, ActuationPlan, StepCommand};
use crate::error::{ActuationError, ConfigError, Error, Result};
use crate::geometry::MAX_ANCHORS;
use crate::kinematics::Direction;

/// A free-running step generator, such as a PWM timer or a PIO state machine
/// wired to one driver's STEP pin.
///
/// Once started the channel emits STEP pulses at the given rate until
/// stopped; the dispatcher counts steps by elapsed time.
pub trait StepChannel {
    /// Error type of the underlying peripheral.
    type Error: core::fmt::Debug;

    /// Set the driver's DIR line.
    fn set_direction(&mut self, direction: Direction) -> core::result::Result<(), Self::Error>;

    /// Start emitting one STEP pulse per `1 / step_frequency_hz` seconds.
    fn start(&mut self, step_frequency_hz: f32) -> core::result::Result<(), Self::Error>;

    /// Stop emitting pulses.
    fn stop(&mut self) -> core::result::Result<(), Self::Error>;
}

/// Runs every motor on its own hardware channel.
///
/// All channels with steps to take are started together, each at
/// `1 / (2 * half_step_delay)` steps per second, and each is stopped once
/// its step count has elapsed. Channels are stopped in order of finishing
/// time, so the plan takes as long as its slowest motor.
pub struct ChannelDispatcher<CH, DELAY>
where
    CH: StepChannel,
    DELAY: DelayNs,
{
    channels: Vec<CH, MAX_ANCHORS>,
    delay: DELAY,
}

impl<CH, DELAY> ChannelDispatcher<CH, DELAY>
where
    CH: StepChannel,
    DELAY: DelayNs,
{
    /// Create a dispatcher with no channels.
    pub fn new(delay: DELAY) -> Self {
        Self {
            channels: Vec::new(),
            delay,
        }
    }

    /// Attach the next channel, in anchor order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TooManyAnchors` past [`MAX_ANCHORS`] channels.
    pub fn with_channel(mut self, channel: CH) -> Result<Self> {
        self.channels
            .push(channel)
            .map_err(|_| Error::Config(ConfigError::TooManyAnchors(MAX_ANCHORS + 1)))?;
        Ok(self)
    }

    /// Attached channels.
    #[inline]
    pub fn channels(&self) -> &[CH] {
        &self.channels
    }

    /// Delay provider.
    #[inline]
    pub fn delay(&self) -> &DELAY {
        &self.delay
    }

    fn run(&mut self, commands: &[StepCommand]) -> Result<()> {
        // (channel index, finishing time in ns)
        let mut schedule: Vec<(usize, u64), MAX_ANCHORS> = Vec::new();

        for (i, (channel, cmd)) in self.channels.iter_mut().zip(commands).enumerate() {
            if cmd.steps.is_zero() {
                continue;
            }
            channel
                .set_direction(cmd.direction)
                .map_err(|_| ActuationError::ChannelError)?;
            let _ = schedule.push((i, run_time_ns(cmd)));
        }

        for &(i, _) in schedule.iter() {
            let hz = commands[i].half_step_delay.step_frequency_hz();
            self.channels[i].start(hz).map_err(|_| ActuationError::ChannelError)?;
        }

        schedule.sort_unstable_by_key(|&(_, finish_ns)| finish_ns);

        let mut elapsed_ns: u64 = 0;
        for &(i, finish_ns) in schedule.iter() {
            wait_ns(&mut self.delay, finish_ns - elapsed_ns);
            elapsed_ns = finish_ns;
            self.channels[i].stop().map_err(|_| ActuationError::ChannelError)?;
        }

        Ok(())
    }

    fn stop_all(&mut self) {
        for channel in self.channels.iter_mut() {
            let _ = channel.stop();
        }
    }
}

impl<CH, DELAY> ActuationDispatcher for ChannelDispatcher<CH, DELAY>
where
    CH: StepChannel,
    DELAY: DelayNs,
{
    fn dispatch(&mut self, plan: &ActuationPlan) -> Result<()> {
        if plan.len() != self.channels.len() {
            return Err(ActuationError::MotorCountMismatch {
                commands: plan.len(),
                motors: self.channels.len(),
            }
            .into());
        }

        let commands: Vec<StepCommand, MAX_ANCHORS> = plan
            .iter()
            .map(|c| match c {
                ActuationCommand::Step(cmd) => Ok(*cmd),
                ActuationCommand::Tension(_) => Err(Error::Actuation(ActuationError::UnsupportedCommand)),
            })
            .collect::<Result<_>>()?;

        debug!("channel dispatch: {} channels", commands.len());

        let result = self.run(&commands);
        if result.is_err() {
            warn!("step channel failed; stopping all channels");
            self.stop_all();
        }
        result
    }
}

/// How long a channel runs for `cmd`: a high and a low half period per step.
fn run_time_ns(cmd: &StepCommand) -> u64 {
    (2 * cmd.steps.0 as u64).saturating_mul(cmd.half_step_delay.as_nanos() as u64)
}

/// `DelayNs` takes `u32` nanoseconds (about 4.29 s); longer waits are split.
fn wait_ns<DELAY: DelayNs>(delay: &mut DELAY, mut ns: u64) {
    while ns > 0 {
        let chunk = ns.min(u32::MAX as u64);
        delay.delay_ns(chunk as u32);
        ns -= chunk;
    }
}
