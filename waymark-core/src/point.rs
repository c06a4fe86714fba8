use geo::Coord;

/// A named geographic point of interest.
///
/// Coordinates are WGS84 degrees. The `id` is assigned by the store when the
/// point is persisted; points built in memory carry `None` until then.
///
/// # Examples
/// ```
/// use waymark_core::Point;
///
/// let tower = Point::new("Eiffel Tower", 48.8584, 2.2945, 330);
///
/// assert_eq!(tower.id, None);
/// assert_eq!(tower.coord().x, 2.2945);
/// assert_eq!(tower.coord().y, 48.8584);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Row identifier assigned by the store, if persisted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<i64>,
    /// Free-form label. Not required to be unique.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Elevation in metres.
    pub elevation: i64,
}

impl Point {
    /// Construct an unpersisted point.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, elevation: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            latitude,
            longitude,
            elevation,
        }
    }

    /// Return a copy of the point carrying the given row identifier.
    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Position as a `geo` coordinate (`x = longitude`, `y = latitude`).
    #[must_use]
    pub const fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Compare every field except `id`.
    ///
    /// ```
    /// use waymark_core::Point;
    ///
    /// let stored = Point::new("Arc de Triomphe", 48.8738, 2.2950, 50).with_id(2);
    /// let draft = Point::new("Arc de Triomphe", 48.8738, 2.2950, 50);
    ///
    /// assert_ne!(stored, draft);
    /// assert!(stored.same_location_as(&draft));
    /// ```
    #[must_use]
    #[expect(clippy::float_cmp, reason = "persisted coordinates round-trip bit for bit")]
    pub fn same_location_as(&self, other: &Self) -> bool {
        self.name == other.name
            && self.latitude == other.latitude
            && self.longitude == other.longitude
            && self.elevation == other.elevation
    }

    pub(crate) fn first_non_finite(&self) -> Option<(&'static str, f64)> {
        [("latitude", self.latitude), ("longitude", self.longitude)]
            .into_iter()
            .find(|(_, value)| !value.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn new_points_are_unpersisted() {
        let point = Point::new("Tokyo Tower", 35.6586, 139.7454, 150);
        assert_eq!(point.id, None);
        assert_eq!(point.name, "Tokyo Tower");
        assert_eq!(point.elevation, 150);
    }

    #[rstest]
    fn empty_names_are_allowed() {
        let point = Point::new("", 0.0, 0.0, 0);
        assert!(point.name.is_empty());
    }

    #[rstest]
    fn same_location_ignores_id() {
        let draft = Point::new("A", 1.0, 2.0, 3);
        let stored = draft.clone().with_id(9);
        assert!(stored.same_location_as(&draft));
        assert!(!stored.same_location_as(&Point::new("A", 1.0, 2.0, 4)));
    }

    #[rstest]
    #[case(f64::NAN, 0.0, Some("latitude"))]
    #[case(0.0, f64::INFINITY, Some("longitude"))]
    #[case(f64::NEG_INFINITY, f64::NAN, Some("latitude"))]
    #[case(91.0, 200.0, None)]
    fn reports_first_non_finite_coordinate(
        #[case] latitude: f64,
        #[case] longitude: f64,
        #[case] expected: Option<&'static str>,
    ) {
        let point = Point::new("probe", latitude, longitude, 0);
        assert_eq!(point.first_non_finite().map(|(field, _)| field), expected);
    }
}
