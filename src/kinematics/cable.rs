//! Cable length and direction.

use heapless::Vec;

use crate::error::{KinematicsError, Result};
use crate::geometry::{is_finite, AnchorSet, Vec3, MAX_ANCHORS};

/// Lengths at or below this are treated as a payload sitting on its anchor.
pub const DEGENERATE_LENGTH: f32 = 1e-6;

/// Euclidean distance from payload to anchor.
///
/// # Errors
///
/// Returns `KinematicsError::NonFinite` if an input coordinate is NaN or
/// infinite, or the distance overflows.
pub fn cable_length(anchor: &Vec3, payload: &Vec3) -> Result<f32> {
    if !is_finite(anchor) || !is_finite(payload) {
        return Err(KinematicsError::NonFinite.into());
    }

    let length = (anchor - payload).norm();
    if !length.is_finite() {
        return Err(KinematicsError::NonFinite.into());
    }

    Ok(length)
}

/// Unit vector from payload toward anchor.
///
/// Returns the zero vector when the cable is degenerate (length at or below
/// [`DEGENERATE_LENGTH`]); such a cable must carry no tension.
///
/// # Errors
///
/// Same as [`cable_length`].
pub fn cable_direction(anchor: &Vec3, payload: &Vec3) -> Result<Vec3> {
    let length = cable_length(anchor, payload)?;
    Ok(direction_from(anchor, payload, length))
}

#[inline]
fn direction_from(anchor: &Vec3, payload: &Vec3, length: f32) -> Vec3 {
    if length <= DEGENERATE_LENGTH {
        Vec3::zeros()
    } else {
        (anchor - payload) / length
    }
}

/// Derived state of one cable for the current payload position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CableState {
    /// Anchor-to-payload distance, >= 0.
    pub length: f32,
    /// Unit vector payload -> anchor; zero for a degenerate cable.
    pub direction: Vec3,
    /// Pulling force magnitude, in [0, max_tension].
    pub tension: f32,
}

impl CableState {
    /// Whether the direction is undefined (payload on the anchor).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.length <= DEGENERATE_LENGTH
    }

    /// Force this cable applies to the payload.
    #[inline]
    pub fn force(&self) -> Vec3 {
        self.direction * self.tension
    }
}

/// One cable state per anchor, in anchor order.
pub type CableStates = Vec<CableState, MAX_ANCHORS>;

/// One cable length per anchor, in anchor order.
pub type CableLengths = Vec<f32, MAX_ANCHORS>;

/// Every cable's length for a payload position.
///
/// # Errors
///
/// Returns `KinematicsError::NonFinite` for a non-finite payload position.
pub fn cable_lengths(anchors: &AnchorSet, payload: &Vec3) -> Result<CableLengths> {
    let mut lengths = CableLengths::new();
    for anchor in anchors.iter() {
        let _ = lengths.push(cable_length(&anchor.position, payload)?);
    }
    Ok(lengths)
}

/// Compute every cable's length and direction for a payload position.
///
/// Tensions start at zero. Degenerate cables are logged and get a zero
/// direction; the remaining cables are unaffected. Calling this twice with
/// the same inputs yields bit-identical results.
///
/// # Errors
///
/// Returns `KinematicsError::NonFinite` for a non-finite payload position.
pub fn forward_kinematics(anchors: &AnchorSet, payload: &Vec3) -> Result<CableStates> {
    let mut cables = CableStates::new();

    for anchor in anchors.iter() {
        let length = cable_length(&anchor.position, payload)?;
        let direction = direction_from(&anchor.position, payload, length);

        if length <= DEGENERATE_LENGTH {
            warn!("cable {} is degenerate (length {})", anchor.name.as_str(), length);
        }

        // AnchorSet never holds more than MAX_ANCHORS
        let _ = cables.push(CableState {
            length,
            direction,
            tension: 0.0,
        });
    }

    Ok(cables)
}
