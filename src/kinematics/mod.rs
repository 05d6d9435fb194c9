//! Kinematics module for cable-motion.
//!
//! Forward kinematics (cable length and direction from anchor and payload
//! position) and the mapping from cable-length changes to spool steps.
//!
//! Two ways to turn a desired motion into spool rotation are provided:
//!
//! - [`plan_steps`] derives shorten/release and step counts from the real
//!   length change of every cable. This is the authoritative path and works
//!   for any target position.
//! - [`ModeTable`] replays fixed per-anchor shorten/release rows for the six
//!   jog modes, for manual calibration of hardware whose geometry is not
//!   measured.

mod cable;
mod modes;
mod spool;

pub use cable::{
    cable_direction, cable_length, cable_lengths, forward_kinematics, CableLengths, CableState,
    CableStates, DEGENERATE_LENGTH,
};
pub use modes::{MovementMode, ModeTable};
pub use spool::{
    length_delta_to_steps, plan_steps, plan_steps_from_lengths, Direction, SpoolAction, SpoolMove,
    SpoolMoves,
};
