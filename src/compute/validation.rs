//! Validation for marker coordinates and query inputs.

use crate::error::{ClusterError, Result};
use geo::Point;
use rustc_hash::FxHashSet;
use spatio_cluster_types::{BoundingBox, GeoPoint};

/// Validates a position has finite, in-range longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use spatio_cluster::compute::validation::validate_geographic_point;
/// use geo::Point;
///
/// // Valid point
/// let seoul = Point::new(126.9780, 37.5665);
/// assert!(validate_geographic_point("seoul", &seoul).is_ok());
///
/// // Invalid latitude
/// let invalid = Point::new(0.0, 95.0);
/// assert!(validate_geographic_point("x", &invalid).is_err());
/// ```
pub fn validate_geographic_point(id: &str, point: &Point) -> Result<()> {
    let (x, y) = (point.x(), point.y());

    let reason = if !x.is_finite() {
        format!("Longitude must be finite, got: {}", x)
    } else if !y.is_finite() {
        format!("Latitude must be finite, got: {}", y)
    } else if !(-180.0..=180.0).contains(&x) {
        format!("Longitude out of range [-180.0, 180.0]: {}", x)
    } else if !(-90.0..=90.0).contains(&y) {
        format!("Latitude out of range [-90.0, 90.0]: {}", y)
    } else {
        return Ok(());
    };

    Err(ClusterError::InvalidCoordinate {
        id: id.to_string(),
        reason,
    })
}

/// Validates a single marker.
pub fn validate_geo_point<P>(point: &GeoPoint<P>) -> Result<()> {
    validate_geographic_point(&point.id, &point.position)
}

/// Validates a snapshot: every coordinate in range and every id unique.
///
/// Returns the first problem found, in input order.
///
/// # Examples
///
/// ```
/// use spatio_cluster::compute::validation::validate_points;
/// use spatio_cluster::ClusterError;
/// use spatio_cluster_types::GeoPoint;
///
/// let points = vec![
///     GeoPoint::from_lat_lon("a", 40.7, -74.0, ()),
///     GeoPoint::from_lat_lon("a", 40.8, -73.9, ()),
/// ];
///
/// let result = validate_points(&points);
/// assert!(matches!(result, Err(ClusterError::DuplicateId(_))));
/// ```
pub fn validate_points<P>(points: &[GeoPoint<P>]) -> Result<()> {
    let mut seen = FxHashSet::default();
    for point in points {
        validate_geo_point(point)?;
        if !seen.insert(point.id.as_str()) {
            return Err(ClusterError::DuplicateId(point.id.clone()));
        }
    }
    Ok(())
}

/// Validates a query rectangle has finite edges and `south <= north`.
pub fn validate_bbox(bbox: &BoundingBox) -> Result<()> {
    if !bbox.is_finite() {
        return Err(ClusterError::InvalidInput(format!(
            "Bounding box must have finite edges, got: {:?}",
            bbox
        )));
    }

    if bbox.south > bbox.north {
        return Err(ClusterError::InvalidInput(format!(
            "Bounding box south ({}) is above north ({})",
            bbox.south, bbox.north
        )));
    }

    Ok(())
}
