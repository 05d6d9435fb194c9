//! Anchor set - the fixed cable attachment points.

use core::fmt::Write;

use heapless::{String, Vec};

use super::{is_finite, Vec3, MAX_ANCHORS};
use crate::config::{validate_config, RobotConfig, MIN_ANCHORS};
use crate::error::{ConfigError, Error, Result};
use crate::kinematics::Direction;

/// One fixed anchor with its spool wiring.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    /// Anchor name, used in logs.
    pub name: String<16>,
    /// Fixed position in workspace units.
    pub position: Vec3,
    /// Spool rotation that shortens this anchor's cable.
    pub shorten_direction: Direction,
}

/// Ordered, immutable collection of anchors.
///
/// Index `i` of the set is motor `i` for every per-cable quantity in the
/// crate. Holds at least 3 and at most [`MAX_ANCHORS`] anchors.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorSet {
    anchors: Vec<Anchor, MAX_ANCHORS>,
}

impl AnchorSet {
    /// Build the anchor set from a robot configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error of the configuration.
    pub fn from_config(config: &RobotConfig) -> Result<Self> {
        validate_config(config)?;

        let anchors = config
            .anchors
            .iter()
            .map(|a| Anchor {
                name: a.name.clone(),
                position: Vec3::from(a.position),
                shorten_direction: a.shorten_direction,
            })
            .collect();

        Ok(Self { anchors })
    }

    /// Build an anchor set from bare positions.
    ///
    /// Anchors are named `C1`, `C2`, ... and shorten clockwise.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than 3 or more than [`MAX_ANCHORS`]
    /// positions, or a non-finite coordinate.
    pub fn from_positions(positions: &[Vec3]) -> Result<Self> {
        if positions.len() < MIN_ANCHORS {
            return Err(Error::Config(ConfigError::TooFewAnchors(positions.len())));
        }
        if positions.len() > MAX_ANCHORS {
            return Err(Error::Config(ConfigError::TooManyAnchors(positions.len())));
        }

        let mut anchors = Vec::new();
        for (i, position) in positions.iter().enumerate() {
            let mut name = String::new();
            let _ = write!(name, "C{}", i + 1);
            if !is_finite(position) {
                return Err(Error::Config(ConfigError::NonFiniteAnchor(name)));
            }
            // Capacity checked above
            let _ = anchors.push(Anchor {
                name,
                position: *position,
                shorten_direction: Direction::Clockwise,
            });
        }

        Ok(Self { anchors })
    }

    /// Override the shorten direction of each anchor, in order.
    pub fn with_shorten_directions(mut self, directions: &[Direction]) -> Self {
        for (anchor, direction) in self.anchors.iter_mut().zip(directions) {
            anchor.shorten_direction = *direction;
        }
        self
    }

    /// Number of anchors.
    #[inline]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Always false for a constructed set; present for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Get an anchor by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Anchor> {
        self.anchors.get(index)
    }

    /// Iterate over anchors in motor order.
    pub fn iter(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter()
    }

    /// Iterate over anchor positions in motor order.
    pub fn positions(&self) -> impl Iterator<Item = &Vec3> + '_ {
        self.anchors.iter().map(|a| &a.position)
    }

    /// Index of the anchor with the given name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.anchors.iter().position(|a| a.name.as_str() == name)
    }
}
