//! Spool position tracking.

use heapless::Vec;

use super::{ActuationCommand, ActuationPlan};
use crate::geometry::MAX_ANCHORS;

/// Running signed step count per spool since startup.
///
/// Negative counts mean net cable wound in. Nothing is persisted; a restart
/// starts from zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpoolPositions {
    steps: Vec<i64, MAX_ANCHORS>,
}

impl SpoolPositions {
    /// Zeroed positions for `count` spools.
    pub fn new(count: usize) -> Self {
        let mut steps = Vec::new();
        for _ in 0..count.min(MAX_ANCHORS) {
            let _ = steps.push(0);
        }
        Self { steps }
    }

    /// Add the step commands of a plan. Tension commands are ignored.
    pub fn apply(&mut self, plan: &ActuationPlan) {
        for (total, command) in self.steps.iter_mut().zip(plan.iter()) {
            if let ActuationCommand::Step(cmd) = command {
                *total = total.saturating_add(cmd.signed_steps());
            }
        }
    }

    /// Position of one spool.
    #[inline]
    pub fn get(&self, index: usize) -> Option<i64> {
        self.steps.get(index).copied()
    }

    /// All positions, in anchor order.
    #[inline]
    pub fn as_slice(&self) -> &[i64] {
        &self.steps
    }

    /// Set every position back to zero.
    pub fn reset(&mut self) {
        self.steps.iter_mut().for_each(|s| *s = 0);
    }
}
