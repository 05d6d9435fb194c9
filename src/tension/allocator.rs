//! Least-squares tension allocation.
//!
//! With `D` the 3xN matrix whose column `i` is cable `i`'s unit direction,
//! tensions `T` should satisfy `D·T = F`. For N >= 3 the system is square or
//! underdetermined, so the minimum-norm least-squares solution is
//! `T = D⁺F = Dᵀ (D·Dᵀ)⁺ F`. `D·Dᵀ` is always 3x3 whatever N is, so the
//! pseudo-inverse comes from a fixed-size SVD with no allocation.
//!
//! A singular `D·Dᵀ` (directions collinear or coplanar) cannot hold the
//! payload against an arbitrary force; the cycle degrades to zero tension.
//!
//! Tensions are then clamped to `[0, max_tension]` (cables only pull). The
//! clamp is a projection, not a constrained solve: once any cable saturates,
//! the realized force drifts from the request and nothing re-solves for it.
//! [`Allocation::residual`] reports the gap.

use heapless::Vec;
use nalgebra::Matrix3;

use crate::config::PhysicsConfig;
use crate::geometry::{is_finite, Axis, Vec3, MAX_ANCHORS};
use crate::kinematics::CableState;

/// Singular values of `D·Dᵀ` at or below this fraction of the largest are treated
/// as zero, making the system singular.
pub const SINGULAR_TOLERANCE: f32 = 1e-6;

const SVD_MAX_ITERATIONS: usize = 500;

/// Outcome of the solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationStatus {
    /// Least-squares solution found (possibly clamped).
    Solved,
    /// System singular or solve failed numerically; all tensions are zero
    /// for this cycle.
    Degraded,
}

/// Tensions for one control cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// Per-cable tension, anchor order, each in `[0, max_tension]`.
    pub tensions: Vec<f32, MAX_ANCHORS>,
    /// Force asked of the cables (desired force plus gravity compensation).
    pub requested: Vec3,
    /// Force the clamped tensions actually produce, `D·T`.
    pub realized: Vec3,
    /// Whether the clamp changed any tension.
    pub saturated: bool,
    /// Solve outcome.
    pub status: AllocationStatus,
}

impl Allocation {
    fn zero(count: usize, requested: Vec3) -> Self {
        let mut tensions = Vec::new();
        for _ in 0..count.min(MAX_ANCHORS) {
            let _ = tensions.push(0.0);
        }

        Self {
            tensions,
            requested,
            realized: Vec3::zeros(),
            saturated: false,
            status: AllocationStatus::Degraded,
        }
    }

    /// Requested minus realized force.
    pub fn residual(&self) -> Vec3 {
        self.requested - self.realized
    }

    /// Write the tensions into the matching cable states.
    pub fn apply_to(&self, cables: &mut [CableState]) {
        for (cable, tension) in cables.iter_mut().zip(self.tensions.iter()) {
            cable.tension = *tension;
        }
    }
}

/// Maps a desired payload force to cable tensions.
#[derive(Debug, Clone)]
pub struct TensionAllocator {
    max_tension: f32,
    gravity_compensation: Vec3,
}

impl TensionAllocator {
    /// Create an allocator.
    ///
    /// `mass * gravity` is added along `up_axis` to every request so that a
    /// zero desired force holds the payload still.
    pub fn new(max_tension: f32, mass: f32, gravity: f32, up_axis: Axis) -> Self {
        Self {
            max_tension,
            gravity_compensation: up_axis.unit() * (mass * gravity),
        }
    }

    /// Create an allocator from the physics configuration.
    pub fn from_config(physics: &PhysicsConfig) -> Self {
        Self::new(physics.max_tension, physics.mass, physics.gravity, physics.up_axis)
    }

    /// Rated maximum cable tension.
    pub fn max_tension(&self) -> f32 {
        self.max_tension
    }

    /// Force added to every request to carry the payload's weight.
    pub fn gravity_compensation(&self) -> Vec3 {
        self.gravity_compensation
    }

    /// Solve for tensions realizing `desired_force` plus gravity compensation.
    ///
    /// Never fails: a singular system or numerical trouble yields
    /// [`AllocationStatus::Degraded`] with all tensions zero. Degenerate
    /// cables (zero direction) always get zero tension.
    pub fn allocate(&self, cables: &[CableState], desired_force: &Vec3) -> Allocation {
        let requested = desired_force + self.gravity_compensation;
        let count = cables.len().min(MAX_ANCHORS);
        let cables = &cables[..count];

        if !is_finite(&requested) {
            warn!("tension request is not finite; commanding zero tension");
            return Allocation::zero(count, requested);
        }

        let lambda = match self.solve_dual(cables, &requested) {
            Some(lambda) => lambda,
            None => {
                warn!("tension solve failed for {} cables; commanding zero tension", count);
                return Allocation::zero(count, requested);
            }
        };

        let mut tensions = Vec::new();
        let mut realized = Vec3::zeros();
        let mut saturated = false;

        for cable in cables {
            let raw = if cable.is_degenerate() {
                0.0
            } else {
                cable.direction.dot(&lambda)
            };
            if !raw.is_finite() {
                warn!("tension solve produced a non-finite tension; commanding zero tension");
                return Allocation::zero(count, requested);
            }

            let clamped = raw.clamp(0.0, self.max_tension);
            saturated |= clamped != raw;
            realized += cable.direction * clamped;
            let _ = tensions.push(clamped);
        }

        if saturated {
            debug!(
                "tension clamp active, residual {} {} {}",
                requested.x - realized.x,
                requested.y - realized.y,
                requested.z - realized.z
            );
        }

        Allocation {
            tensions,
            requested,
            realized,
            saturated,
            status: AllocationStatus::Solved,
        }
    }

    /// Solve for tensions and store them in the cable states.
    pub fn allocate_into(&self, cables: &mut [CableState], desired_force: &Vec3) -> Allocation {
        let allocation = self.allocate(cables, desired_force);
        allocation.apply_to(cables);
        allocation
    }

    /// `λ = (D·Dᵀ)⁺ F`, so that `T = Dᵀλ`.
    fn solve_dual(&self, cables: &[CableState], requested: &Vec3) -> Option<Vec3> {
        let mut gram = Matrix3::zeros();
        for cable in cables.iter().filter(|c| !c.is_degenerate()) {
            gram += cable.direction * cable.direction.transpose();
        }

        let svd = gram.try_svd(true, true, f32::EPSILON, SVD_MAX_ITERATIONS)?;
        let largest = svd.singular_values.max();
        if !(largest.is_finite() && largest > 0.0) {
            return None;
        }

        let tolerance = largest * SINGULAR_TOLERANCE;
        if svd.singular_values.iter().any(|sv| *sv <= tolerance) {
            return None;
        }

        let pinv = svd.pseudo_inverse(tolerance).ok()?;
        let lambda = pinv * requested;
        is_finite(&lambda).then_some(lambda)
    }
}
