//! # cable-motion
//!
//! Motion-control core for cable-driven parallel robots: a payload hung from
//! N >= 3 cables, each wound by a stepper-driven spool at a fixed anchor.
//!
//! ## Features
//!
//! - **Forward kinematics**: cable length and unit direction per anchor
//! - **Tension allocation**: least-squares cable tensions for a desired force,
//!   clamped to `[0, max_tension]`
//! - **Step planning**: cable-length changes to spool directions and step counts
//! - **Payload dynamics**: tension, gravity and damping with a bouncing
//!   workspace box
//! - **embedded-hal 1.0**: STEP/DIR pins via `OutputPin`, timing via `DelayNs`
//! - **no_std compatible**: the core builds without the standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cable_motion::{CableRobot, LockstepDispatcher};
//! use cable_motion::command::parse_command;
//!
//! // Load anchors, spool and physics from TOML
//! let config = cable_motion::load_config("robot.toml")?;
//! let mut robot = CableRobot::from_config(config)?;
//!
//! // One STEP/DIR pair per anchor, in anchor order
//! let mut motors = LockstepDispatcher::new(delay)
//!     .with_motor(step0, dir0)?
//!     .with_motor(step1, dir1)?
//!     .with_motor(step2, dir2)?
//!     .with_motor(step3, dir3)?;
//!
//! robot.execute(&parse_command("w")?, &mut motors)?;
//! robot.execute(&parse_command("0,-50,0")?, &mut motors)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `log` (default): Logs through the `log` facade
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

// Core modules
pub mod actuation;
pub mod command;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod geometry;
pub mod kinematics;
pub mod robot;
pub mod tension;

// Re-exports for ergonomic API
pub use actuation::{
    ActuationCommand, ActuationDispatcher, ActuationPlan, ChannelDispatcher, LockstepDispatcher,
    RecordingDispatcher, SpoolPositions, StepChannel, StepCommand,
};
pub use command::{parse_command, parse_sequence, Command, CommandLog};
pub use config::{validate_config, RobotConfig};
pub use dynamics::{Integrator, PayloadState};
pub use error::{Error, Result};
pub use geometry::{AnchorSet, Axis, Vec3, WorkspaceBounds, MAX_ANCHORS};
pub use kinematics::{
    cable_direction, cable_length, cable_lengths, forward_kinematics, length_delta_to_steps,
    plan_steps, plan_steps_from_lengths, CableState, Direction, MovementMode, SpoolAction,
};
pub use robot::{CableRobot, ForceCycle};
pub use tension::{Allocation, AllocationStatus, TensionAllocator};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Microsteps, Newtons, Seconds, Steps};
