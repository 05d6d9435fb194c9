//! Legacy movement mode tables.

use heapless::Vec;
use serde::Deserialize;

use super::units::{Seconds, Steps};
use crate::geometry::MAX_ANCHORS;
use crate::kinematics::SpoolAction;

/// Per-anchor shorten/release row for one mode.
pub type ModeRow = Vec<SpoolAction, MAX_ANCHORS>;

/// How a jog key becomes spool motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JogStrategy {
    /// Move the payload `jog_distance` along the mode's axis and derive steps
    /// from the cable-length changes.
    #[default]
    Geometry,
    /// Replay the fixed per-anchor table row.
    Table,
}

/// Fixed movement tables for manual jogging.
///
/// Rows left out fall back to the four-anchor reference table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModesConfig {
    /// Which path turns jog keys into steps.
    pub strategy: JogStrategy,

    /// Steps every motor takes for one mode move.
    pub steps: Steps,

    /// Optional half-step delay override for mode moves.
    #[serde(rename = "half_step_delay_s")]
    pub half_step_delay: Option<Seconds>,

    /// Geometric jog distance used when modes are resolved against geometry.
    pub jog_distance: f32,

    /// Forward row override.
    pub forward: Option<ModeRow>,
    /// Backward row override.
    pub backward: Option<ModeRow>,
    /// Left row override.
    pub left: Option<ModeRow>,
    /// Right row override.
    pub right: Option<ModeRow>,
    /// Up row override.
    pub up: Option<ModeRow>,
    /// Down row override.
    pub down: Option<ModeRow>,
}

impl Default for ModesConfig {
    fn default() -> Self {
        Self {
            strategy: JogStrategy::Geometry,
            steps: Steps(100),
            half_step_delay: None,
            jog_distance: 10.0,
            forward: None,
            backward: None,
            left: None,
            right: None,
            up: None,
            down: None,
        }
    }
}

impl ModesConfig {
    /// Iterate over every configured override row.
    pub fn overrides(&self) -> impl Iterator<Item = &ModeRow> {
        [
            &self.forward,
            &self.backward,
            &self.left,
            &self.right,
            &self.up,
            &self.down,
        ]
        .into_iter()
        .flatten()
    }
}
