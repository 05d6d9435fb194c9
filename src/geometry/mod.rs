//! Geometry module for cable-motion.
//!
//! Anchor layout, axis conventions and the workspace collision box. Every
//! other module reads these; nothing here depends on the rest of the crate.

mod anchors;
mod bounds;

pub use anchors::{Anchor, AnchorSet};
pub use bounds::WorkspaceBounds;

use serde::Deserialize;

/// 3D vector type used throughout the crate.
pub type Vec3 = nalgebra::Vector3<f32>;

/// Maximum number of anchors (and motors) a robot may have.
pub const MAX_ANCHORS: usize = 8;

/// Cartesian axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    #[default]
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index of this axis.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Axis from a component index (wraps modulo 3).
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        match index % 3 {
            0 => Axis::X,
            1 => Axis::Y,
            _ => Axis::Z,
        }
    }

    /// Unit vector along the positive direction of this axis.
    #[inline]
    pub fn unit(self) -> Vec3 {
        let mut v = Vec3::zeros();
        v[self.index()] = 1.0;
        v
    }

    /// Next axis in cyclic order (X -> Y -> Z -> X).
    #[inline]
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

/// Check every component is finite.
#[inline]
pub fn is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}
