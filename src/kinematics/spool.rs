//! Spool rotation: shorten/release sense and step counts.

use heapless::Vec;
use libm::roundf;
use serde::Deserialize;

use super::cable::{cable_length, cable_lengths};
use crate::config::units::Steps;
use crate::config::SpoolConfig;
use crate::error::{KinematicsError, Result};
use crate::geometry::{AnchorSet, Vec3, MAX_ANCHORS};

/// Spool rotation direction, looking at the motor shaft from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Direction {
    /// Clockwise (DIR pin low).
    #[serde(rename = "cw")]
    Clockwise,
    /// Counter-clockwise (DIR pin high).
    #[serde(rename = "ccw")]
    CounterClockwise,
}

impl Direction {
    /// The other rotation.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// Logic level of the driver's DIR pin for this rotation.
    #[inline]
    pub fn dir_level(self) -> bool {
        matches!(self, Direction::CounterClockwise)
    }
}

/// What a spool does to its cable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpoolAction {
    /// Wind cable in; length decreases.
    Shorten,
    /// Pay cable out; length increases.
    Release,
}

impl SpoolAction {
    /// Action for a signed length change. Zero counts as release; it moves
    /// no steps either way.
    #[inline]
    pub fn from_delta(delta_length: f32) -> Self {
        if delta_length < 0.0 {
            SpoolAction::Shorten
        } else {
            SpoolAction::Release
        }
    }

    /// The reverse action.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            SpoolAction::Shorten => SpoolAction::Release,
            SpoolAction::Release => SpoolAction::Shorten,
        }
    }

    /// Rotation that performs this action on a spool whose shortening
    /// rotation is `shorten_direction`.
    #[inline]
    pub fn resolve(self, shorten_direction: Direction) -> Direction {
        match self {
            SpoolAction::Shorten => shorten_direction,
            SpoolAction::Release => shorten_direction.opposite(),
        }
    }

    /// Sign of the length change this action produces.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            SpoolAction::Shorten => -1,
            SpoolAction::Release => 1,
        }
    }
}

/// Convert a cable-length change into whole steps.
///
/// `round(|delta_length| / spool_circumference * steps_per_revolution)`. The
/// sign of `delta_length` is not part of the count; see
/// [`SpoolAction::from_delta`]. Saturates at `u32::MAX`; a NaN delta yields 0.
#[inline]
pub fn length_delta_to_steps(delta_length: f32, spool_circumference: f32, steps_per_revolution: u32) -> Steps {
    let revolutions = delta_length.abs() / spool_circumference;
    // Float-to-int casts saturate
    Steps(roundf(revolutions * steps_per_revolution as f32) as u32)
}

/// One spool's share of a position move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpoolMove {
    /// Shorten or release.
    pub action: SpoolAction,
    /// Rotation that performs `action` on this spool.
    pub direction: Direction,
    /// Whole steps to take.
    pub steps: Steps,
    /// Exact signed length change the steps approximate.
    pub delta_length: f32,
}

impl SpoolMove {
    /// Signed step count (negative when shortening).
    #[inline]
    pub fn signed_steps(&self) -> i64 {
        self.action.sign() * self.steps.0 as i64
    }
}

/// One spool move per anchor, in anchor order.
pub type SpoolMoves = Vec<SpoolMove, MAX_ANCHORS>;

/// Spool moves that carry the payload from `from` to `to`.
///
/// Each cable's action and step count come from its actual length change,
/// so this is valid for any pair of positions.
///
/// # Errors
///
/// Returns `KinematicsError::NonFinite` for non-finite positions.
pub fn plan_steps(anchors: &AnchorSet, spool: &SpoolConfig, from: &Vec3, to: &Vec3) -> Result<SpoolMoves> {
    let lengths = cable_lengths(anchors, from)?;
    plan_steps_from_lengths(anchors, spool, &lengths, to)
}

/// Spool moves that take every cable from its current length to its length
/// at `to`.
///
/// `lengths` holds one entry per anchor, in anchor order. When they are the
/// lengths the spools were actually driven to, the rounding left over from
/// earlier moves is made up here instead of piling up.
///
/// # Errors
///
/// Returns `KinematicsError::NonFinite` for a non-finite target or length.
pub fn plan_steps_from_lengths(
    anchors: &AnchorSet,
    spool: &SpoolConfig,
    lengths: &[f32],
    to: &Vec3,
) -> Result<SpoolMoves> {
    let steps_per_revolution = spool.total_steps_per_revolution();
    let mut moves = SpoolMoves::new();

    for (anchor, current) in anchors.iter().zip(lengths) {
        if !current.is_finite() {
            return Err(KinematicsError::NonFinite.into());
        }
        let target = cable_length(&anchor.position, to)?;
        let delta_length = target - current;
        let action = SpoolAction::from_delta(delta_length);

        let _ = moves.push(SpoolMove {
            action,
            direction: action.resolve(anchor.shorten_direction),
            steps: length_delta_to_steps(delta_length, spool.circumference, steps_per_revolution),
            delta_length,
        });
    }

    Ok(moves)
}
