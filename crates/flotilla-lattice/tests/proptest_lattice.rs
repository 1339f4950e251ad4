//! Property tests for the lattice primitives.
//!
//! Vector arithmetic, cube-hull contact classification and fleet
//! serialization are checked over random inputs.

use flotilla_lattice::prelude::*;
use proptest::prelude::*;

fn vector_strategy(max: i32) -> impl Strategy<Value = Vector> {
    (-max..=max, -max..=max, -max..=max).prop_map(Vector::from)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    // -- Vector -------------------------------------------------------------

    #[test]
    fn chebyshev_distance_is_a_metric(
        a in vector_strategy(1_000),
        b in vector_strategy(1_000),
        c in vector_strategy(1_000),
    ) {
        prop_assert_eq!(a.chebyshev_distance(b), b.chebyshev_distance(a));
        prop_assert_eq!(a.chebyshev_distance(a), 0);
        prop_assert!(a.chebyshev_distance(c) <= a.chebyshev_distance(b) + b.chebyshev_distance(c));
        prop_assert_eq!(a.chebyshev_distance(b), (a - b).chebyshev_length());
    }

    #[test]
    fn normalize_keeps_signs(a in vector_strategy(1_000)) {
        let n = a.normalize();
        prop_assert!(n.chebyshev_length() <= 1);
        prop_assert_eq!(n.is_zero(), a.is_zero());
        prop_assert_eq!((n.x, n.y, n.z), (a.x.signum(), a.y.signum(), a.z.signum()));
        prop_assert_eq!((-a).normalize(), -n);
    }

    #[test]
    fn addition_and_subtraction_cancel(a in vector_strategy(1_000), b in vector_strategy(1_000)) {
        prop_assert_eq!(a + b - b, a);
        let mut c = a;
        c += b;
        c -= a;
        prop_assert_eq!(c, b);
    }

    // -- CubeHull -----------------------------------------------------------

    #[test]
    fn cube_contact_matches_chebyshev_distance(
        a in vector_strategy(50),
        offset in vector_strategy(3),
    ) {
        let ship = Ship::new(ShipId(0), Vector::ZERO, 1);
        let b = a + offset;
        let ra = CubeHull.region(&ship, a);
        let rb = CubeHull.region(&ship, b);
        let volume = ra.volume_of_intersection(&rb);

        prop_assert!([0, 1, 2, 4, 8].contains(&volume), "volume {}", volume);
        prop_assert_eq!(volume, rb.volume_of_intersection(&ra));
        prop_assert_eq!(volume > 0, a.chebyshev_distance(b) <= 1);
        prop_assert_eq!(volume == 8, a == b);
    }

    // -- Fleet --------------------------------------------------------------

    #[test]
    fn fleet_survives_json(
        ships in prop::collection::btree_map(0..500u32, (vector_strategy(100), vector_strategy(8), 1..100i32), 0..30),
    ) {
        let mut fleet = Fleet::new();
        for (id, (position, velocity, health)) in ships {
            let handle = fleet
                .insert(Ship::new(ShipId(id), position, health).with_velocity(velocity))
                .unwrap();
            if health % 7 == 0 {
                fleet[handle].kill();
            }
        }

        let json = serde_json::to_string(&fleet).unwrap();
        let back: Fleet = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back.alive_count(), fleet.alive_count());
        for ship in fleet.iter() {
            prop_assert_eq!(back.handle_of(ship.id()), fleet.handle_of(ship.id()));
        }
        prop_assert_eq!(back, fleet);
    }
}

#[test]
fn fleet_json_with_duplicate_ids_is_rejected() {
    let ships = vec![
        Ship::new(ShipId(3), Vector::new(1, 2, 3), 10),
        Ship::new(ShipId(3), Vector::new(4, 5, 6), 10),
    ];
    let json = serde_json::to_string(&ships).unwrap();
    let err = serde_json::from_str::<Fleet>(&json).unwrap_err();
    assert!(err.to_string().contains("#3"), "unexpected error: {err}");
}
