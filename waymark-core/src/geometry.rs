//! Degree-space helpers for approximate region queries.
//!
//! Distances are converted with a single linear factor derived from the mean
//! Earth radius and applied to both axes. The resulting square is an
//! approximation of a circle: it widens in longitude terms as latitude
//! grows, because a degree of longitude shrinks towards the poles.

use std::f64::consts::PI;

use crate::Point;

/// Mean Earth radius used for the meters/degrees conversion.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Ground distance covered by one degree along a great circle.
pub const METERS_PER_DEGREE: f64 = 2.0 * PI * EARTH_RADIUS_METERS / FULL_CIRCLE_DEGREES;

const FULL_CIRCLE_DEGREES: f64 = 360.0;
const HALF_CIRCLE_DEGREES: f64 = 180.0;
const MAX_LATITUDE: f64 = 90.0;

/// Convert a linear ground distance to an angular delta in degrees.
///
/// The conversion is linear along a great circle and is shared by the
/// latitude and longitude axes.
///
/// # Examples
/// ```
/// use waymark_core::{meters_to_degrees, METERS_PER_DEGREE};
///
/// assert_eq!(meters_to_degrees(0.0), 0.0);
/// assert!((meters_to_degrees(METERS_PER_DEGREE) - 1.0).abs() < 1e-12);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "unit conversion")]
pub const fn meters_to_degrees(distance_meters: f64) -> f64 {
    distance_meters / METERS_PER_DEGREE
}

/// Convert an angular delta in degrees back to a ground distance in metres.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "unit conversion")]
pub const fn degrees_to_meters(degrees: f64) -> f64 {
    degrees * METERS_PER_DEGREE
}

/// Strategy used to turn a centre and a distance into degree bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum BoundsMode {
    /// Offset each coordinate by the delta and take the remainder modulo 360.
    ///
    /// Ranges are neither clamped at the poles nor split at the antimeridian,
    /// so boxes touching those lines miss points on the far side.
    #[default]
    Legacy,
    /// Clamp latitude to `[-90, 90]` and split longitude ranges that cross
    /// the antimeridian into two boxes.
    Normalised {
        /// Widen the longitude delta by `1 / cos(latitude)`.
        scale_longitude: bool,
    },
}

impl BoundsMode {
    /// Compute the boxes covering `distance_meters` around `center`.
    #[must_use]
    pub fn bounds(self, center: &Point, distance_meters: f64) -> Vec<DegreeBounds> {
        let delta = meters_to_degrees(distance_meters);
        match self {
            Self::Legacy => vec![DegreeBounds::legacy(center, delta)],
            Self::Normalised { scale_longitude } => {
                DegreeBounds::normalised(center, delta, scale_longitude)
            }
        }
    }
}

/// Inclusive latitude/longitude bounds in degrees.
///
/// Bounds are kept exactly as computed: a minimum greater than its maximum
/// describes an empty range rather than being swapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeBounds {
    /// Smallest accepted latitude.
    pub lat_min: f64,
    /// Largest accepted latitude.
    pub lat_max: f64,
    /// Smallest accepted longitude.
    pub lon_min: f64,
    /// Largest accepted longitude.
    pub lon_max: f64,
}

impl DegreeBounds {
    /// Square of half-size `delta` degrees around `center`, each bound taken
    /// modulo 360 with the sign of the offset value.
    ///
    /// ```
    /// use waymark_core::{DegreeBounds, Point};
    ///
    /// let bounds = DegreeBounds::legacy(&Point::new("c", 10.0, 20.0, 0), 0.5);
    /// assert_eq!(bounds.lat_min, 9.5);
    /// assert_eq!(bounds.lon_max, 20.5);
    /// ```
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "degree offsets")]
    pub const fn legacy(center: &Point, delta: f64) -> Self {
        Self {
            lat_min: (center.latitude - delta) % FULL_CIRCLE_DEGREES,
            lat_max: (center.latitude + delta) % FULL_CIRCLE_DEGREES,
            lon_min: (center.longitude - delta) % FULL_CIRCLE_DEGREES,
            lon_max: (center.longitude + delta) % FULL_CIRCLE_DEGREES,
        }
    }

    /// Pole-clamped, antimeridian-aware boxes around `center`.
    ///
    /// Returns one box, or two when the longitude range crosses ±180°.
    /// A longitude delta of 180° or more covers every longitude.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "degree offsets")]
    pub fn normalised(center: &Point, delta: f64, scale_longitude: bool) -> Vec<Self> {
        let latitude = center.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let lat_min = (latitude - delta).max(-MAX_LATITUDE);
        let lat_max = (latitude + delta).min(MAX_LATITUDE);

        let lon_delta = if scale_longitude {
            scaled_longitude_delta(latitude, delta)
        } else {
            delta
        };
        let span = |lon_min: f64, lon_max: f64| Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        };

        if lon_delta >= HALF_CIRCLE_DEGREES {
            return vec![span(-HALF_CIRCLE_DEGREES, HALF_CIRCLE_DEGREES)];
        }

        let longitude = wrap_longitude(center.longitude);
        let west = longitude - lon_delta;
        let east = longitude + lon_delta;

        if west < -HALF_CIRCLE_DEGREES {
            vec![
                span(west + FULL_CIRCLE_DEGREES, HALF_CIRCLE_DEGREES),
                span(-HALF_CIRCLE_DEGREES, east),
            ]
        } else if east > HALF_CIRCLE_DEGREES {
            vec![
                span(west, HALF_CIRCLE_DEGREES),
                span(-HALF_CIRCLE_DEGREES, east - FULL_CIRCLE_DEGREES),
            ]
        } else {
            vec![span(west, east)]
        }
    }

    /// Whether the coordinate lies inside the bounds, edges included.
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&latitude)
            && (self.lon_min..=self.lon_max).contains(&longitude)
    }
}

#[expect(clippy::float_arithmetic, reason = "longitude scaling")]
fn scaled_longitude_delta(latitude: f64, delta: f64) -> f64 {
    let cos = latitude.to_radians().cos();
    if cos <= f64::EPSILON {
        HALF_CIRCLE_DEGREES
    } else {
        (delta / cos).min(HALF_CIRCLE_DEGREES)
    }
}

#[expect(clippy::float_arithmetic, reason = "longitude wrapping")]
fn wrap_longitude(longitude: f64) -> f64 {
    if (-HALF_CIRCLE_DEGREES..=HALF_CIRCLE_DEGREES).contains(&longitude) {
        longitude
    } else {
        (longitude + HALF_CIRCLE_DEGREES).rem_euclid(FULL_CIRCLE_DEGREES) - HALF_CIRCLE_DEGREES
    }
}
