//! Property tests for kinematics, allocation and step planning.

use cable_motion::config::{SpoolConfig, MIN_ANCHORS};
use cable_motion::{
    cable_direction, cable_length, forward_kinematics, length_delta_to_steps, plan_steps,
    AllocationStatus, AnchorSet, Axis, SpoolAction, TensionAllocator, Vec3, MAX_ANCHORS,
};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f32> {
    -500.0f32..500.0
}

fn point() -> impl Strategy<Value = Vec3> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn reference_anchors() -> AnchorSet {
    AnchorSet::from_positions(&[
        Vec3::new(-200.0, 200.0, -200.0),
        Vec3::new(-200.0, 200.0, 200.0),
        Vec3::new(200.0, 200.0, 200.0),
        Vec3::new(200.0, 200.0, -200.0),
    ])
    .unwrap()
}

fn layout() -> impl Strategy<Value = Vec<Vec3>> {
    prop::collection::vec(point(), MIN_ANCHORS..=MAX_ANCHORS)
}

/// Anchors all at one height.
fn flat_layout() -> impl Strategy<Value = Vec<Vec3>> {
    (coord(), prop::collection::vec((coord(), coord()), MIN_ANCHORS..=MAX_ANCHORS))
        .prop_map(|(height, xz)| xz.into_iter().map(|(x, z)| Vec3::new(x, height, z)).collect())
}

/// Anchor layouts with a payload anywhere, on one of the anchors, or in the
/// plane of a flat layout (every cable direction coplanar).
fn layout_and_payload() -> impl Strategy<Value = (Vec<Vec3>, Vec3)> {
    prop_oneof![
        (layout(), point()),
        layout()
            .prop_flat_map(|anchors| {
                let n = anchors.len();
                (Just(anchors), 0..n)
            })
            .prop_map(|(anchors, i)| {
                let payload = anchors[i];
                (anchors, payload)
            }),
        flat_layout().prop_flat_map(|anchors| {
            let height = anchors[0].y;
            (Just(anchors), coord(), coord())
                .prop_map(move |(anchors, x, z)| (anchors, Vec3::new(x, height, z)))
        }),
    ]
}

proptest! {
    #[test]
    fn cable_length_is_euclidean_distance(anchor in point(), payload in point()) {
        let length = cable_length(&anchor, &payload).unwrap();
        let d = anchor - payload;
        let expected = (d.x * d.x + d.y * d.y + d.z * d.z).sqrt();

        prop_assert!(length >= 0.0);
        prop_assert!((length - expected).abs() <= 1e-3 * expected.max(1.0));
    }

    #[test]
    fn cable_direction_is_unit_or_zero(anchor in point(), payload in point()) {
        let direction = cable_direction(&anchor, &payload).unwrap();
        let norm = direction.norm();

        prop_assert!(norm == 0.0 || (norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn forward_kinematics_is_idempotent(payload in point()) {
        let anchors = reference_anchors();

        let first = forward_kinematics(&anchors, &payload).unwrap();
        let second = forward_kinematics(&anchors, &payload).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn tensions_stay_within_limits(
        (positions, payload) in layout_and_payload(),
        force in point(),
        max_tension in 0.0f32..100.0,
    ) {
        let anchors = AnchorSet::from_positions(&positions).unwrap();
        let cables = forward_kinematics(&anchors, &payload).unwrap();
        let allocator = TensionAllocator::new(max_tension, 1.0, 9.81, Axis::Y);

        let allocation = allocator.allocate(&cables, &force);

        prop_assert_eq!(allocation.tensions.len(), positions.len());
        for t in &allocation.tensions {
            prop_assert!((0.0..=max_tension).contains(t));
        }
        if allocation.status == AllocationStatus::Degraded {
            prop_assert!(allocation.tensions.iter().all(|t| *t == 0.0));
        }
        for (cable, t) in cables.iter().zip(&allocation.tensions) {
            if cable.is_degenerate() {
                prop_assert_eq!(*t, 0.0);
            }
        }
    }

    #[test]
    fn step_action_matches_length_change(from in point(), to in point()) {
        let anchors = reference_anchors();
        let spool = SpoolConfig::new(10.0, 200);

        let moves = plan_steps(&anchors, &spool, &from, &to).unwrap();

        for m in &moves {
            if m.delta_length < 0.0 {
                prop_assert_eq!(m.action, SpoolAction::Shorten);
            } else {
                prop_assert_eq!(m.action, SpoolAction::Release);
            }
        }
    }

    #[test]
    fn step_count_ignores_sign(delta in 0.0f32..1000.0) {
        prop_assert_eq!(
            length_delta_to_steps(delta, 10.0, 200),
            length_delta_to_steps(-delta, 10.0, 200)
        );
    }
}
