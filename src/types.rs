//! Query result types.

use geo::Point;
use serde::{Deserialize, Serialize};
use spatio_cluster_types::GeoPoint;
use std::fmt;

/// Bits reserved for the zoom level inside a [`ClusterId`].
const ZOOM_BITS: u32 = 5;
const ZOOM_MASK: u64 = (1 << ZOOM_BITS) - 1;
const SLOT_BITS: u32 = 32;
const SLOT_MASK: u64 = (1 << SLOT_BITS) - 1;
const TAG_SHIFT: u32 = ZOOM_BITS + SLOT_BITS;

/// Bits of the build tag stored in the top of a [`ClusterId`].
pub(crate) const TAG_BITS: u32 = 64 - TAG_SHIFT;

/// Opaque cluster handle that resolves only against builds over the same
/// markers and clustering settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(u64);

impl ClusterId {
    /// `tag` must fit in [`TAG_BITS`].
    pub(crate) fn new(tag: u32, zoom: u8, slot: u32) -> Self {
        Self(
            (u64::from(tag) << TAG_SHIFT)
                | (u64::from(slot) << ZOOM_BITS)
                | (u64::from(zoom) & ZOOM_MASK),
        )
    }

    /// Rebuild an id from its raw value, e.g. after a round trip through a UI layer.
    pub fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Zoom level of the cluster node the id refers to.
    pub fn zoom(&self) -> u8 {
        // Masked to five bits.
        (self.0 & ZOOM_MASK) as u8
    }

    pub(crate) fn slot(&self) -> u32 {
        ((self.0 >> ZOOM_BITS) & SLOT_MASK) as u32
    }

    pub(crate) fn tag(&self) -> u32 {
        (self.0 >> TAG_SHIFT) as u32
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An aggregate marker standing in for two or more points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,
    /// Mean position of the represented points (x = longitude, y = latitude).
    pub centroid: Point<f64>,
    /// Number of points the marker represents. Always at least 2.
    pub point_count: usize,
}

impl Cluster {
    pub fn latitude(&self) -> f64 {
        self.centroid.y()
    }

    pub fn longitude(&self) -> f64 {
        self.centroid.x()
    }

    /// Zoom level of the finest cluster node holding every represented point.
    pub fn zoom(&self) -> u8 {
        self.id.zoom()
    }
}

/// One renderable item: either a cluster badge or an individual marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClusterOrPoint<P> {
    Cluster(Cluster),
    Leaf(GeoPoint<P>),
}

impl<P> ClusterOrPoint<P> {
    pub fn is_cluster(&self) -> bool {
        matches!(self, Self::Cluster(_))
    }

    /// Number of points behind this item; 1 for a leaf.
    pub fn point_count(&self) -> usize {
        match self {
            Self::Cluster(cluster) => cluster.point_count,
            Self::Leaf(_) => 1,
        }
    }

    /// Where the item should be drawn.
    pub fn position(&self) -> Point<f64> {
        match self {
            Self::Cluster(cluster) => cluster.centroid,
            Self::Leaf(point) => point.position,
        }
    }

    pub fn as_cluster(&self) -> Option<&Cluster> {
        match self {
            Self::Cluster(cluster) => Some(cluster),
            Self::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&GeoPoint<P>> {
        match self {
            Self::Cluster(_) => None,
            Self::Leaf(point) => Some(point),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_id_encoding() {
        let id = ClusterId::new(0x55_5555, 17, 12_345);
        assert_eq!(id.zoom(), 17);
        assert_eq!(id.slot(), 12_345);
        assert_eq!(id.tag(), 0x55_5555);
        assert_eq!(ClusterId::from_u64(id.as_u64()), id);
    }

    #[test]
    fn test_cluster_id_distinct_per_part() {
        assert_ne!(ClusterId::new(1, 3, 0), ClusterId::new(1, 4, 0));
        assert_ne!(ClusterId::new(1, 3, 0), ClusterId::new(1, 3, 1));
        assert_ne!(ClusterId::new(1, 3, 0), ClusterId::new(2, 3, 0));
    }

    #[test]
    fn test_largest_parts_do_not_overlap() {
        let tag = (1 << TAG_BITS) - 1;
        let id = ClusterId::new(tag, 31, u32::MAX);
        assert_eq!(id.as_u64(), u64::MAX);
        assert_eq!(id.tag(), tag);
        assert_eq!(id.slot(), u32::MAX);
        assert_eq!(id.zoom(), 31);
    }

    #[test]
    fn test_item_accessors() {
        let leaf: ClusterOrPoint<()> = ClusterOrPoint::Leaf(GeoPoint::from_lat_lon("a", 1.0, 2.0, ()));
        assert!(!leaf.is_cluster());
        assert_eq!(leaf.point_count(), 1);
        assert_eq!(leaf.position(), Point::new(2.0, 1.0));
        assert!(leaf.as_leaf().is_some());

        let cluster: ClusterOrPoint<()> = ClusterOrPoint::Cluster(Cluster {
            id: ClusterId::new(0, 0, 1),
            centroid: Point::new(5.0, 6.0),
            point_count: 4,
        });
        assert!(cluster.is_cluster());
        assert_eq!(cluster.point_count(), 4);
        assert_eq!(cluster.as_cluster().map(|c| c.latitude()), Some(6.0));
    }

    #[test]
    fn test_item_serializes_with_tag() {
        let leaf: ClusterOrPoint<u8> = ClusterOrPoint::Leaf(GeoPoint::from_lat_lon("a", 1.0, 2.0, 9));
        let json = serde_json::to_value(&leaf).unwrap();
        assert_eq!(json["type"], "leaf");
        assert_eq!(json["id"], "a");
        assert_eq!(json["payload"], 9);
    }
}
