//! Jog modes and their fixed per-anchor tables.

use heapless::Vec;

use super::spool::{Direction, SpoolAction};
use crate::config::units::{Seconds, Steps};
use crate::config::{ModeRow, ModesConfig, SpoolConfig};
use crate::error::{KinematicsError, Result};
use crate::geometry::{AnchorSet, Axis, Vec3, MAX_ANCHORS};

/// One of the six manual jog directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementMode {
    /// Away from the operator.
    Forward,
    /// Toward the operator.
    Backward,
    /// Operator's left.
    Left,
    /// Operator's right.
    Right,
    /// Against gravity.
    Up,
    /// With gravity.
    Down,
}

impl MovementMode {
    /// All modes, in table order.
    pub const ALL: [MovementMode; 6] = [
        MovementMode::Forward,
        MovementMode::Backward,
        MovementMode::Left,
        MovementMode::Right,
        MovementMode::Up,
        MovementMode::Down,
    ];

    /// The mode that undoes this one.
    pub fn opposite(self) -> Self {
        match self {
            MovementMode::Forward => MovementMode::Backward,
            MovementMode::Backward => MovementMode::Forward,
            MovementMode::Left => MovementMode::Right,
            MovementMode::Right => MovementMode::Left,
            MovementMode::Up => MovementMode::Down,
            MovementMode::Down => MovementMode::Up,
        }
    }

    /// Lowercase name of the mode.
    pub fn name(self) -> &'static str {
        match self {
            MovementMode::Forward => "forward",
            MovementMode::Backward => "backward",
            MovementMode::Left => "left",
            MovementMode::Right => "right",
            MovementMode::Up => "up",
            MovementMode::Down => "down",
        }
    }

    /// Unit vector of this mode in the workspace frame.
    ///
    /// Up is `up_axis`, forward is the next axis in cyclic order and right
    /// the one after that (Y up: forward = +Z, right = +X).
    pub fn direction(self, up_axis: Axis) -> Vec3 {
        let up = up_axis.unit();
        let forward = up_axis.next().unit();
        let right = up_axis.next().next().unit();

        match self {
            MovementMode::Forward => forward,
            MovementMode::Backward => -forward,
            MovementMode::Left => -right,
            MovementMode::Right => right,
            MovementMode::Up => up,
            MovementMode::Down => -up,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Reference four-anchor rows, in [`MovementMode::ALL`] order.
const REFERENCE_ROWS: [[SpoolAction; 4]; 6] = {
    use SpoolAction::{Release as R, Shorten as S};
    [
        [S, R, R, S], // forward
        [R, S, S, R], // backward
        [S, S, R, R], // left
        [R, R, S, S], // right
        [S, S, S, S], // up
        [R, R, R, R], // down
    ]
};

type DirectionRow = Vec<Direction, MAX_ANCHORS>;

/// Jog table resolved against the anchors' spool sense.
///
/// Each mode maps to a fixed shorten/release action per anchor. The actions
/// are turned into rotation directions once, at construction, so a jog is a
/// table lookup rather than any string matching.
#[derive(Debug, Clone)]
pub struct ModeTable {
    actions: [Option<ModeRow>; 6],
    directions: [Option<DirectionRow>; 6],
    steps: Steps,
    half_step_delay: Seconds,
}

impl ModeTable {
    /// Build the table for an anchor set.
    ///
    /// Configured rows win; missing rows fall back to the reference table
    /// when there are exactly four anchors and are otherwise unavailable.
    /// Row lengths are checked by configuration validation.
    pub fn from_config(modes: &ModesConfig, spool: &SpoolConfig, anchors: &AnchorSet) -> Self {
        let configured = [
            &modes.forward,
            &modes.backward,
            &modes.left,
            &modes.right,
            &modes.up,
            &modes.down,
        ];

        let mut actions: [Option<ModeRow>; 6] = Default::default();
        let mut directions: [Option<DirectionRow>; 6] = Default::default();

        for mode in MovementMode::ALL {
            let i = mode.index();
            let row = match configured[i] {
                Some(row) if row.len() == anchors.len() => Some(row.clone()),
                Some(_) => None,
                None if anchors.len() == 4 => Some(REFERENCE_ROWS[i].iter().copied().collect()),
                None => None,
            };

            directions[i] = row.as_ref().map(|row| {
                row.iter()
                    .zip(anchors.iter())
                    .map(|(action, anchor)| action.resolve(anchor.shorten_direction))
                    .collect()
            });
            actions[i] = row;
        }

        Self {
            actions,
            directions,
            steps: modes.steps,
            half_step_delay: modes.half_step_delay.unwrap_or(spool.half_step_delay),
        }
    }

    /// Per-anchor actions for a mode.
    ///
    /// # Errors
    ///
    /// Returns `KinematicsError::ModeTableUnavailable` if no row exists for
    /// this anchor layout.
    pub fn actions(&self, mode: MovementMode) -> Result<&[SpoolAction]> {
        self.actions[mode.index()]
            .as_deref()
            .ok_or_else(|| KinematicsError::ModeTableUnavailable.into())
    }

    /// Per-anchor rotation directions for a mode.
    ///
    /// # Errors
    ///
    /// Same as [`ModeTable::actions`].
    pub fn directions(&self, mode: MovementMode) -> Result<&[Direction]> {
        self.directions[mode.index()]
            .as_deref()
            .ok_or_else(|| KinematicsError::ModeTableUnavailable.into())
    }

    /// Steps every motor takes per jog.
    pub fn steps(&self) -> Steps {
        self.steps
    }

    /// Half-step delay used for jogs.
    pub fn half_step_delay(&self) -> Seconds {
        self.half_step_delay
    }
}
