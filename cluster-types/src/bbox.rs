use geo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A geographic rectangle in degrees, ordered the way map SDKs report it:
/// west, south, east, north.
///
/// `west > east` denotes a box that crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Create a bounding box from its four edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatio_cluster_types::BoundingBox;
    ///
    /// let seoul = BoundingBox::new(126.76, 37.41, 127.18, 37.70);
    /// assert!(!seoul.crosses_antimeridian());
    /// ```
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// The whole Web-Mercator world.
    pub fn world() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// Build from a `geo::Rect` (min = south-west, max = north-east).
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }

    /// Convert to a `geo::Rect`. Only meaningful when the box does not cross
    /// the antimeridian.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            geo::coord! { x: self.west, y: self.south },
            geo::coord! { x: self.east, y: self.north },
        )
    }

    pub fn is_finite(&self) -> bool {
        [self.west, self.south, self.east, self.north]
            .iter()
            .all(|v| v.is_finite())
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    pub fn center(&self) -> Point {
        let lon_span = self.longitude_span();
        let mut lon = self.west + lon_span / 2.0;
        if lon > 180.0 {
            lon -= 360.0;
        }
        Point::new(lon, (self.south + self.north) / 2.0)
    }

    /// East-west extent in degrees, accounting for antimeridian crossing.
    pub fn longitude_span(&self) -> f64 {
        if self.crosses_antimeridian() {
            self.east + 360.0 - self.west
        } else {
            self.east - self.west
        }
    }

    pub fn latitude_span(&self) -> f64 {
        self.north - self.south
    }

    /// Bring longitudes back into `[-180, 180]` and latitudes into `[-90, 90]`.
    ///
    /// A box at least 360° wide becomes the full longitude range. Longitudes
    /// already in range are kept as-is, so an east edge of exactly 180° stays 180°.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatio_cluster_types::BoundingBox;
    ///
    /// let wrapped = BoundingBox::new(170.0, -10.0, 190.0, 10.0).normalized();
    /// assert_eq!(wrapped.east, -170.0);
    /// assert!(wrapped.crosses_antimeridian());
    /// ```
    pub fn normalized(&self) -> Self {
        let (west, east) = if self.east - self.west >= 360.0 {
            (-180.0, 180.0)
        } else {
            (wrap_longitude(self.west), wrap_longitude(self.east))
        };
        Self::new(
            west,
            self.south.clamp(-90.0, 90.0),
            east,
            self.north.clamp(-90.0, 90.0),
        )
    }

    /// Split an antimeridian-crossing box into its eastern-hemisphere and
    /// western-hemisphere halves. Boxes that do not cross are returned whole.
    pub fn split_antimeridian(&self) -> (Self, Option<Self>) {
        if self.crosses_antimeridian() {
            (
                Self::new(self.west, self.south, 180.0, self.north),
                Some(Self::new(-180.0, self.south, self.east, self.north)),
            )
        } else {
            (*self, None)
        }
    }

    /// Inclusive containment test, honoring antimeridian crossing.
    pub fn contains(&self, point: &Point) -> bool {
        let (lon, lat) = (point.x(), point.y());
        if lat < self.south || lat > self.north {
            return false;
        }
        if self.crosses_antimeridian() {
            lon >= self.west || lon <= self.east
        } else {
            lon >= self.west && lon <= self.east
        }
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        ((lon + 180.0) % 360.0 + 360.0) % 360.0 - 180.0
    }
}
