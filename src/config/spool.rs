//! Spool and stepper drive configuration.

use serde::Deserialize;

use super::units::{Microsteps, Seconds};

/// Spool geometry and stepper timing shared by every anchor.
#[derive(Debug, Clone, Deserialize)]
pub struct SpoolConfig {
    /// Cable paid out per spool revolution, in workspace units.
    pub circumference: f32,

    /// Base steps per revolution (200 for 1.8° motors).
    #[serde(default = "default_steps_per_revolution")]
    pub steps_per_revolution: u16,

    /// Microstep setting (1, 2, 4, 8, 16, 32, etc.).
    #[serde(default)]
    pub microsteps: Microsteps,

    /// Half period of one step pulse (high time and low time).
    #[serde(default = "default_half_step_delay", rename = "half_step_delay_s")]
    pub half_step_delay: Seconds,
}

fn default_steps_per_revolution() -> u16 {
    200
}

fn default_half_step_delay() -> Seconds {
    // 0.3 s per step, i.e. 1 RPM on a 200-step motor
    Seconds(0.15)
}

impl SpoolConfig {
    /// Create a spool configuration with full stepping and the default delay.
    pub fn new(circumference: f32, steps_per_revolution: u16) -> Self {
        Self {
            circumference,
            steps_per_revolution,
            microsteps: Microsteps::FULL,
            half_step_delay: default_half_step_delay(),
        }
    }

    /// Total microsteps per spool revolution.
    pub fn total_steps_per_revolution(&self) -> u32 {
        self.steps_per_revolution as u32 * self.microsteps.value() as u32
    }

    /// Cable length moved by a single microstep.
    pub fn length_per_step(&self) -> f32 {
        self.circumference / self.total_steps_per_revolution() as f32
    }
}
