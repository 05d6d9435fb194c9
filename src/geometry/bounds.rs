//! Axis-aligned workspace box derived from the anchor layout.

use super::{AnchorSet, Axis, Vec3};
use crate::config::WorkspaceConfig;

/// Axis-aligned collision box for the payload.
///
/// Computed once from the anchor set: the min/max of anchor coordinates on
/// every axis, pushed outward by a margin, with the lower face of the up axis
/// lowered further by a fall allowance so the payload can hang below the
/// anchor plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkspaceBounds {
    /// Lower corner.
    pub min: Vec3,
    /// Upper corner.
    pub max: Vec3,
}

impl WorkspaceBounds {
    /// Create bounds from explicit corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Derive bounds from an anchor set.
    ///
    /// `margin` expands every face outward (negative insets it); `fall_allowance`
    /// additionally lowers the bottom face of `up_axis`.
    pub fn from_anchors(anchors: &AnchorSet, margin: f32, up_axis: Axis, fall_allowance: f32) -> Self {
        let mut min = Vec3::repeat(f32::INFINITY);
        let mut max = Vec3::repeat(f32::NEG_INFINITY);

        for p in anchors.positions() {
            min = min.inf(p);
            max = max.sup(p);
        }

        min.add_scalar_mut(-margin);
        max.add_scalar_mut(margin);
        min[up_axis.index()] -= fall_allowance;

        Self { min, max }
    }

    /// Derive bounds from the workspace section of the configuration.
    pub fn from_config(anchors: &AnchorSet, config: &WorkspaceConfig, up_axis: Axis) -> Self {
        Self::from_anchors(anchors, config.margin, up_axis, config.fall_allowance)
    }

    /// Check a point lies inside the box (faces included).
    pub fn contains(&self, p: &Vec3) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    /// Nearest point inside the box.
    pub fn clamp(&self, p: &Vec3) -> Vec3 {
        p.sup(&self.min).inf(&self.max)
    }

    /// Resolve a boundary violation, axis by axis.
    ///
    /// A coordinate past a face is put back on the face and that axis'
    /// velocity becomes `-v * restitution`. Other axes are left alone.
    /// Returns which axes bounced.
    pub fn collide(&self, position: &mut Vec3, velocity: &mut Vec3, restitution: f32) -> [bool; 3] {
        let mut bounced = [false; 3];

        for i in 0..3 {
            if position[i] < self.min[i] {
                position[i] = self.min[i];
            } else if position[i] > self.max[i] {
                position[i] = self.max[i];
            } else {
                continue;
            }
            velocity[i] = -velocity[i] * restitution;
            bounced[i] = true;
        }

        bounced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_anchors() -> AnchorSet {
        AnchorSet::from_positions(&[
            Vec3::new(-200.0, 200.0, -200.0),
            Vec3::new(-200.0, 200.0, 200.0),
            Vec3::new(200.0, 200.0, 200.0),
            Vec3::new(200.0, 200.0, -200.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_bounds_from_reference_layout() {
        let bounds = WorkspaceBounds::from_anchors(&reference_anchors(), 0.0, Axis::Y, 400.0);

        assert_eq!(bounds.min, Vec3::new(-200.0, -200.0, -200.0));
        assert_eq!(bounds.max, Vec3::new(200.0, 200.0, 200.0));
    }

    #[test]
    fn test_negative_margin_insets() {
        let bounds = WorkspaceBounds::from_anchors(&reference_anchors(), -20.0, Axis::Y, 400.0);

        assert_eq!(bounds.min, Vec3::new(-180.0, -180.0, -180.0));
        assert_eq!(bounds.max, Vec3::new(180.0, 180.0, 180.0));
    }

    #[test]
    fn test_collide_only_touches_violating_axis() {
        let bounds = WorkspaceBounds::new(Vec3::repeat(-10.0), Vec3::repeat(10.0));
        let mut p = Vec3::new(15.0, 0.0, -3.0);
        let mut v = Vec3::new(4.0, 1.0, 2.0);

        let bounced = bounds.collide(&mut p, &mut v, 0.5);

        assert_eq!(bounced, [true, false, false]);
        assert_eq!(p, Vec3::new(10.0, 0.0, -3.0));
        assert_eq!(v, Vec3::new(-2.0, 1.0, 2.0));
    }

    #[test]
    fn test_clamp_and_contains() {
        let bounds = WorkspaceBounds::new(Vec3::zeros(), Vec3::repeat(1.0));

        assert!(bounds.contains(&Vec3::repeat(0.5)));
        assert!(!bounds.contains(&Vec3::new(2.0, 0.5, 0.5)));
        assert_eq!(bounds.clamp(&Vec3::new(2.0, -1.0, 0.5)), Vec3::new(1.0, 0.0, 0.5));
    }
}
