use geo::Point;
use serde::{Deserialize, Serialize};

/// A user-placed map marker.
///
/// The position is stored as a `geo::Point` with `x` = longitude and
/// `y` = latitude, both in WGS84 degrees. The payload is carried through the
/// clustering engine untouched.
///
/// # Examples
///
/// ```
/// use spatio_cluster_types::GeoPoint;
///
/// let spot = GeoPoint::from_lat_lon("spot-7", 37.5665, 126.9780, "Han river bench");
/// assert_eq!(spot.latitude(), 37.5665);
/// assert_eq!(spot.longitude(), 126.9780);
/// assert_eq!(spot.payload, "Han river bench");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint<P = ()> {
    /// Stable identifier used to correlate results with application records.
    pub id: String,
    /// Longitude (x) and latitude (y) in degrees.
    pub position: Point<f64>,
    /// Opaque application data.
    pub payload: P,
}

impl<P> GeoPoint<P> {
    /// Create a marker from a `geo::Point` (x = longitude, y = latitude).
    pub fn new(id: impl Into<String>, position: Point<f64>, payload: P) -> Self {
        Self {
            id: id.into(),
            position,
            payload,
        }
    }

    /// Create a marker from latitude and longitude, in that order.
    pub fn from_lat_lon(id: impl Into<String>, latitude: f64, longitude: f64, payload: P) -> Self {
        Self::new(id, Point::new(longitude, latitude), payload)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> &Point<f64> {
        &self.position
    }

    pub fn latitude(&self) -> f64 {
        self.position.y()
    }

    pub fn longitude(&self) -> f64 {
        self.position.x()
    }

    /// Move the marker, keeping its id and payload.
    pub fn set_position(&mut self, latitude: f64, longitude: f64) {
        self.position = Point::new(longitude, latitude);
    }

    /// Replace the payload type, keeping id and position.
    pub fn map_payload<Q>(self, f: impl FnOnce(P) -> Q) -> GeoPoint<Q> {
        GeoPoint {
            id: self.id,
            position: self.position,
            payload: f(self.payload),
        }
    }
}
