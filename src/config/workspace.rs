//! Workspace boundary configuration.

use serde::Deserialize;

/// How far the collision box extends beyond the anchor hull.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Outward expansion on every side. Negative values inset the box.
    pub margin: f32,

    /// Extra room below the lowest anchor on the up axis, so the payload can
    /// hang and fall beneath the anchor plane.
    pub fall_allowance: f32,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            margin: 0.0,
            fall_allowance: 400.0,
        }
    }
}
