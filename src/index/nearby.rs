//! Distance-ranked lookups around a location.
//!
//! Candidates are pruned with a degree envelope around the center, fetched from
//! the leaf R-tree, then filtered by exact haversine distance.

use super::ClusterIndex;
use crate::compute::validation::validate_geographic_point;
use crate::error::{ClusterError, Result};
use geo::{Distance, Haversine, HaversineMeasure, Point};
use spatio_cluster_types::{BoundingBox, GeoPoint};
use std::cmp::Ordering;

impl<P> ClusterIndex<P> {
    /// Points within `radius_m` meters of `center`, nearest first.
    ///
    /// Ties are broken by id. At most `limit` results are returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatio_cluster::ClusterIndex;
    /// use spatio_cluster_types::GeoPoint;
    /// use geo::Point;
    ///
    /// let index = ClusterIndex::build(vec![
    ///     GeoPoint::from_lat_lon("gwanghwamun", 37.5759, 126.9769, ()),
    ///     GeoPoint::from_lat_lon("namsan", 37.5512, 126.9882, ()),
    ///     GeoPoint::from_lat_lon("busan", 35.1796, 129.0756, ()),
    /// ])?;
    ///
    /// let city_hall = Point::new(126.9780, 37.5665);
    /// let nearby = index.within_radius(&city_hall, 5_000.0, 10)?;
    /// let ids: Vec<_> = nearby.iter().map(|(p, _)| p.id()).collect();
    /// assert_eq!(ids, ["gwanghwamun", "namsan"]);
    /// # Ok::<(), spatio_cluster::ClusterError>(())
    /// ```
    pub fn within_radius(
        &self,
        center: &Point,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<(&GeoPoint<P>, f64)>> {
        validate_geographic_point("center", center)?;
        if !radius_m.is_finite() || radius_m < 0.0 {
            return Err(ClusterError::InvalidInput(format!(
                "Radius must be non-negative and finite, got: {}",
                radius_m
            )));
        }

        let envelope = radius_envelope(center, radius_m);
        let mut results: Vec<(&GeoPoint<P>, f64)> = self
            .leaves_in(&envelope, 0.0)
            .into_iter()
            .filter_map(|leaf| {
                let point = &self.points[leaf as usize];
                let distance = Haversine.distance(*center, point.position);
                (distance <= radius_m).then_some((point, distance))
            })
            .collect();

        results.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });
        results.truncate(limit);
        Ok(results)
    }
}

/// Degree rectangle covering a circle of `radius_m` around `center`.
fn radius_envelope(center: &Point, radius_m: f64) -> BoundingBox {
    let earth = HaversineMeasure::GRS80_MEAN_RADIUS.radius();
    let lat_degrees = (radius_m / earth).to_degrees();
    let lon_degrees = (radius_m / (earth * center.y().to_radians().cos())).to_degrees();

    let south = (center.y() - lat_degrees).max(-90.0);
    let north = (center.y() + lat_degrees).min(90.0);

    // Near the poles or for huge radii every longitude qualifies.
    if !lon_degrees.is_finite() || lon_degrees >= 180.0 || north >= 90.0 || south <= -90.0 {
        return BoundingBox::new(-180.0, south, 180.0, north);
    }

    BoundingBox::new(center.x() - lon_degrees, south, center.x() + lon_degrees, north).normalized()
}
