//! Anchor configuration from TOML.

use heapless::String;
use serde::Deserialize;

use crate::kinematics::Direction;

/// One fixed cable anchor and its spool wiring.
#[derive(Debug, Clone, Deserialize)]
pub struct AnchorConfig {
    /// Human-readable name (max 16 chars).
    pub name: String<16>,

    /// Anchor position in workspace units.
    pub position: [f32; 3],

    /// Spool rotation that winds cable in (shortens it).
    ///
    /// Release is always the opposite rotation.
    #[serde(rename = "shorten")]
    pub shorten_direction: Direction,
}

impl AnchorConfig {
    /// Check every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
    }
}
