use crate::bbox::BoundingBox;
use geo::Point;
use serde::{Deserialize, Serialize};

/// A map camera region: a center plus latitude and longitude spans in degrees.
///
/// This is the shape mobile map views report on every region change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Longitude (x) and latitude (y) of the view center.
    pub center: Point<f64>,
    pub latitude_span: f64,
    pub longitude_span: f64,
}

impl Viewport {
    pub fn new(center: Point<f64>, latitude_span: f64, longitude_span: f64) -> Self {
        Self {
            center,
            latitude_span,
            longitude_span,
        }
    }

    /// The viewport that exactly frames `bbox`.
    pub fn from_bbox(bbox: &BoundingBox) -> Self {
        Self::new(bbox.center(), bbox.latitude_span(), bbox.longitude_span())
    }

    /// Same spans, new center.
    pub fn centered_on(&self, center: Point<f64>) -> Self {
        Self { center, ..*self }
    }

    /// The visible rectangle, `center ± span / 2` on each axis.
    ///
    /// Latitudes are clamped to the poles and longitudes wrapped into
    /// `[-180, 180]`, so a view straddling the antimeridian yields a box with
    /// `west > east`.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatio_cluster_types::Viewport;
    /// use geo::Point;
    ///
    /// let view = Viewport::new(Point::new(179.0, 0.0), 2.0, 4.0);
    /// let bbox = view.bbox();
    /// assert_eq!(bbox.west, 177.0);
    /// assert_eq!(bbox.east, -179.0);
    /// ```
    pub fn bbox(&self) -> BoundingBox {
        let half_lat = self.latitude_span / 2.0;
        let half_lon = self.longitude_span / 2.0;
        BoundingBox::new(
            self.center.x() - half_lon,
            self.center.y() - half_lat,
            self.center.x() + half_lon,
            self.center.y() + half_lat,
        )
        .normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_from_center_and_spans() {
        let view = Viewport::new(Point::new(126.9780, 37.5665), 0.0922, 0.0421);
        let bbox = view.bbox();
        assert!((bbox.west - (126.9780 - 0.02105)).abs() < 1e-12);
        assert!((bbox.east - (126.9780 + 0.02105)).abs() < 1e-12);
        assert!((bbox.south - (37.5665 - 0.0461)).abs() < 1e-12);
        assert!((bbox.north - (37.5665 + 0.0461)).abs() < 1e-12);
    }

    #[test]
    fn test_bbox_clamps_poles() {
        let view = Viewport::new(Point::new(0.0, 80.0), 40.0, 10.0);
        let bbox = view.bbox();
        assert_eq!(bbox.north, 90.0);
        assert_eq!(bbox.south, 60.0);
    }

    #[test]
    fn test_world_span() {
        let view = Viewport::new(Point::new(30.0, 0.0), 180.0, 400.0);
        assert_eq!(view.bbox(), BoundingBox::world());
    }

    #[test]
    fn test_from_bbox_roundtrip() {
        let bbox = BoundingBox::new(-74.0, 40.0, -72.0, 41.0);
        let view = Viewport::from_bbox(&bbox);
        assert_eq!(view.center, Point::new(-73.0, 40.5));
        assert_eq!(view.bbox(), bbox);
    }

    #[test]
    fn test_centered_on() {
        let view = Viewport::new(Point::new(0.0, 0.0), 1.0, 2.0).centered_on(Point::new(5.0, 6.0));
        assert_eq!(view.center, Point::new(5.0, 6.0));
        assert_eq!(view.latitude_span, 1.0);
        assert_eq!(view.longitude_span, 2.0);
    }
}
