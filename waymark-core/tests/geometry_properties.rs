//! Property tests for the degree-space helpers.

use proptest::prelude::*;
use waymark_core::{DegreeBounds, Point, degrees_to_meters, meters_to_degrees};

#[expect(clippy::float_arithmetic, reason = "test derives a longer distance")]
fn lengthen(meters: f64, gap: f64) -> f64 {
    meters + gap
}

#[expect(
    clippy::float_arithmetic,
    reason = "test delta computation requires float maths"
)]
fn within_relative_tolerance(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= expected * 1e-12 + 1e-9
}

proptest! {
    #[test]
    fn meters_to_degrees_is_strictly_monotone(
        shorter in 0.0_f64..1.0e7,
        gap in 1.0e-3_f64..1.0e7,
    ) {
        let longer = lengthen(shorter, gap);
        prop_assert!(meters_to_degrees(shorter) < meters_to_degrees(longer));
    }

    #[test]
    fn conversion_round_trips(meters in 0.0_f64..2.0e7) {
        let back = degrees_to_meters(meters_to_degrees(meters));
        prop_assert!(within_relative_tolerance(back, meters));
    }

    #[test]
    fn legacy_bounds_contain_their_centre(
        latitude in -89.0_f64..89.0,
        longitude in -179.0_f64..179.0,
        meters in 0.0_f64..100_000.0,
    ) {
        let centre = Point::new("centre", latitude, longitude, 0);
        let bounds = DegreeBounds::legacy(&centre, meters_to_degrees(meters));
        prop_assert!(bounds.contains(latitude, longitude));
    }

    #[test]
    fn normalised_bounds_stay_on_the_globe(
        latitude in -90.0_f64..=90.0,
        longitude in -180.0_f64..=180.0,
        degrees in 0.0_f64..400.0,
        scale_longitude in any::<bool>(),
    ) {
        let centre = Point::new("centre", latitude, longitude, 0);
        let boxes = DegreeBounds::normalised(&centre, degrees, scale_longitude);

        prop_assert!(!boxes.is_empty() && boxes.len() <= 2);
        for bounds in &boxes {
            prop_assert!(bounds.lat_min >= -90.0 && bounds.lat_max <= 90.0);
            prop_assert!(bounds.lon_min >= -180.0 && bounds.lon_max <= 180.0);
        }
        prop_assert!(boxes.iter().any(|bounds| bounds.contains(latitude, longitude)));
    }
}

#[test]
fn zero_metres_is_zero_degrees() {
    assert_eq!(meters_to_degrees(0.0), 0.0);
}
