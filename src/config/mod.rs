//! Configuration module for cable-motion.
//!
//! Provides types for loading and validating the anchor layout, spool drive,
//! payload physics and jog tables from TOML files (with `std` feature) or
//! pre-parsed data.

mod anchor;
#[cfg(feature = "std")]
mod loader;
mod modes;
mod physics;
mod spool;
mod system;
pub mod units;
mod validation;
mod workspace;

pub use anchor::AnchorConfig;
pub use modes::{JogStrategy, ModeRow, ModesConfig};
pub use physics::PhysicsConfig;
pub use spool::SpoolConfig;
pub use system::RobotConfig;
pub use validation::{validate_config, MIN_ANCHORS};
pub use workspace::WorkspaceConfig;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Microsteps, Newtons, Seconds, Steps};
