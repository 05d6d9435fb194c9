//! Actuation module for cable-motion.
//!
//! Turns per-anchor plans into motor motion. A plan is one
//! [`ActuationCommand`] per anchor; an [`ActuationDispatcher`] executes it on
//! some backend:
//!
//! - [`LockstepDispatcher`]: software-timed STEP/DIR pins on a shared clock
//! - [`ChannelDispatcher`]: hardware step generators (timer or PIO) that run
//!   at a set frequency until stopped
//! - [`RecordingDispatcher`]: no hardware, for simulation and tests

mod channel;
mod command;
mod dispatcher;
mod gpio;
mod positions;
mod recording;

pub use channel::{ChannelDispatcher, StepChannel};
pub use command::{ActuationCommand, ActuationPlan, StepCommand};
pub use dispatcher::ActuationDispatcher;
pub use gpio::{LockstepDispatcher, StepperPins};
pub use positions::SpoolPositions;
pub use recording::RecordingDispatcher;
