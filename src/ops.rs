//! Free-function entry points for callers that drive the index directly.
//!
//! These mirror the methods on [`ClusterIndex`] and the functions in
//! [`crate::compute::zoom`], grouped as the handful of calls a map screen makes:
//! build on data change, query on every settled viewport, and resolve a cluster
//! tap into a camera target.
//!
//! ```rust
//! use spatio_cluster::ops;
//! use spatio_cluster_types::{GeoPoint, Viewport};
//! use geo::Point;
//!
//! let index = ops::build_index(vec![
//!     GeoPoint::from_lat_lon("a", 37.5665, 126.9780, ()),
//!     GeoPoint::from_lat_lon("b", 37.5670, 126.9785, ()),
//! ])?;
//!
//! let view = Viewport::new(Point::new(126.9780, 37.5665), 4.0, 4.0);
//! let zoom = ops::zoom_for_viewport(view.longitude_span)?;
//! let items = ops::query_visible(&index, &view.bbox(), zoom);
//! let cluster = items[0].as_cluster().unwrap();
//!
//! let target = ops::expansion_zoom_for(&index, cluster.id)?;
//! let span = ops::scale_span(view.longitude_span, zoom, target);
//! assert!(span < view.longitude_span);
//! # Ok::<(), spatio_cluster::ClusterError>(())
//! ```

use crate::compute::zoom;
use crate::error::Result;
use crate::index::ClusterIndex;
use crate::types::{ClusterId, ClusterOrPoint};
use spatio_cluster_types::{BoundingBox, GeoPoint};

/// Build an index with the default configuration.
pub fn build_index<P>(points: impl IntoIterator<Item = GeoPoint<P>>) -> Result<ClusterIndex<P>> {
    ClusterIndex::build(points)
}

pub fn query_visible<P: Clone>(
    index: &ClusterIndex<P>,
    bbox: &BoundingBox,
    zoom: i32,
) -> Vec<ClusterOrPoint<P>> {
    index.query_visible(bbox, zoom)
}

pub fn zoom_for_viewport(longitude_span: f64) -> Result<i32> {
    zoom::zoom_for_viewport(longitude_span)
}

pub fn expansion_zoom_for<P>(index: &ClusterIndex<P>, id: ClusterId) -> Result<i32> {
    index.expansion_zoom(id)
}

pub fn scale_span(current_span: f64, from_zoom: i32, to_zoom: i32) -> f64 {
    zoom::scale_span(current_span, from_zoom, to_zoom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClusterError;

    #[test]
    fn test_five_meter_pair_across_zoom() {
        // About 5 m apart along the equator.
        let points = vec![
            GeoPoint::from_lat_lon("a", 0.0, 0.0, ()),
            GeoPoint::from_lat_lon("b", 0.0, 0.000045, ()),
        ];
        let index = build_index(points).unwrap();
        let world = BoundingBox::world();

        let near = query_visible(&index, &world, 20);
        assert_eq!(near.len(), 2);
        assert!(near.iter().all(|item| !item.is_cluster()));

        let far = query_visible(&index, &world, 0);
        assert_eq!(far.len(), 1);
        assert_eq!(far[0].point_count(), 2);

        let id = far[0].as_cluster().unwrap().id;
        assert_eq!(expansion_zoom_for(&index, id).unwrap(), 20);
    }

    #[test]
    fn test_stale_id_is_unknown() {
        let index = build_index(Vec::<GeoPoint>::new()).unwrap();
        let id = ClusterId::from_u64(0);
        assert_eq!(
            expansion_zoom_for(&index, id),
            Err(ClusterError::UnknownClusterId(id))
        );
    }

    #[test]
    fn test_zoom_span_identity() {
        let span = 0.0421;
        let zoom = zoom_for_viewport(span).unwrap();
        assert_eq!(scale_span(span, zoom, zoom), span);
    }
}
