//! Robot configuration - root configuration structure.

use heapless::Vec;
use serde::Deserialize;

use super::anchor::AnchorConfig;
use super::modes::ModesConfig;
use super::physics::PhysicsConfig;
use super::spool::SpoolConfig;
use super::workspace::WorkspaceConfig;
use crate::geometry::MAX_ANCHORS;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct RobotConfig {
    /// Ordered anchors. Order defines motor indices everywhere else.
    pub anchors: Vec<AnchorConfig, MAX_ANCHORS>,

    /// Spool geometry and stepper timing.
    pub spool: SpoolConfig,

    /// Payload dynamics.
    #[serde(default)]
    pub physics: PhysicsConfig,

    /// Collision box around the anchors.
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Legacy jog tables.
    #[serde(default)]
    pub modes: ModesConfig,
}

impl RobotConfig {
    /// Get an anchor configuration by name.
    pub fn anchor(&self, name: &str) -> Option<&AnchorConfig> {
        self.anchors.iter().find(|a| a.name.as_str() == name)
    }

    /// Get the index of an anchor by name.
    pub fn anchor_index(&self, name: &str) -> Option<usize> {
        self.anchors.iter().position(|a| a.name.as_str() == name)
    }

    /// Number of configured anchors.
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }
}
