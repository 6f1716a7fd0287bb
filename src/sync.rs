//! Thread-safe handle for sharing the current index.
//!
//! This module provides `SharedClusterIndex`, a cloneable handle around
//! `Arc<RwLock<Arc<ClusterIndex>>>`. Readers grab the current build and query
//! it without holding the lock; writers build a replacement off to the side
//! and swap it in, so a query never observes a half-built index.
//!
//! # Features
//!
//! Enable the `sync` feature to use this module:
//!
//! ```toml
//! [dependencies]
//! spatio-cluster = { version = "0.1", features = ["sync"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use spatio_cluster::{ClusterConfig, SharedClusterIndex};
//! use spatio_cluster_types::{BoundingBox, GeoPoint};
//! use std::thread;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let shared = SharedClusterIndex::empty(ClusterConfig::default())?;
//!
//! let writer = shared.clone();
//! let handle = thread::spawn(move || {
//!     writer.rebuild(vec![GeoPoint::from_lat_lon("a", 37.5665, 126.9780, ())])
//! });
//! handle.join().unwrap()?;
//!
//! assert_eq!(shared.query_visible(&BoundingBox::world(), 4).len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::config::ClusterConfig;
use crate::error::Result;
use crate::index::ClusterIndex;
use crate::types::{ClusterId, ClusterOrPoint};
use parking_lot::RwLock;
use spatio_cluster_types::{BoundingBox, GeoPoint};
use std::sync::Arc;

/// Cloneable handle to the most recently published index.
pub struct SharedClusterIndex<P = ()> {
    inner: Arc<RwLock<Arc<ClusterIndex<P>>>>,
}

impl<P> Clone for SharedClusterIndex<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> SharedClusterIndex<P> {
    pub fn new(index: ClusterIndex<P>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(index))),
        }
    }

    pub fn empty(config: ClusterConfig) -> Result<Self> {
        Ok(Self::new(ClusterIndex::empty(config)?))
    }

    /// The build currently being served.
    pub fn current(&self) -> Arc<ClusterIndex<P>> {
        Arc::clone(&*self.inner.read())
    }

    /// Publish a new build. Queries already running keep their old build.
    pub fn publish(&self, index: ClusterIndex<P>) {
        *self.inner.write() = Arc::new(index);
    }

    /// Build from `points` with the current configuration and publish it.
    ///
    /// The lock is only taken to swap; on error the old build stays in place.
    pub fn rebuild(&self, points: impl IntoIterator<Item = GeoPoint<P>>) -> Result<()> {
        let config = self.current().config().clone();
        let index = ClusterIndex::build_with_config(points, config)?;
        self.publish(index);
        Ok(())
    }

    pub fn query_visible(&self, bbox: &BoundingBox, zoom: i32) -> Vec<ClusterOrPoint<P>>
    where
        P: Clone,
    {
        self.current().query_visible(bbox, zoom)
    }

    pub fn expansion_zoom(&self, id: ClusterId) -> Result<i32> {
        self.current().expansion_zoom(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClusterError;
    use std::thread;

    fn points(n: usize) -> Vec<GeoPoint> {
        (0..n)
            .map(|i| GeoPoint::from_lat_lon(format!("p{i}"), 0.0, i as f64 * 10.0, ()))
            .collect()
    }

    #[test]
    fn test_publish_swaps_build() {
        let shared = SharedClusterIndex::new(ClusterIndex::build(points(2)).unwrap());
        let before = shared.current();
        shared.rebuild(points(5)).unwrap();

        assert_eq!(before.len(), 2);
        assert_eq!(shared.current().len(), 5);
    }

    #[test]
    fn test_failed_rebuild_keeps_old_build() {
        let shared = SharedClusterIndex::new(ClusterIndex::build(points(2)).unwrap());
        let bad = vec![GeoPoint::from_lat_lon("x", 0.0, 500.0, ())];
        assert!(matches!(
            shared.rebuild(bad),
            Err(ClusterError::InvalidCoordinate { .. })
        ));
        assert_eq!(shared.current().len(), 2);
    }

    #[test]
    fn test_concurrent_readers_and_writer() {
        let shared = SharedClusterIndex::new(ClusterIndex::build(points(4)).unwrap());
        let world = BoundingBox::world();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        let total: usize = shared
                            .query_visible(&world, 10)
                            .iter()
                            .map(|i| i.point_count())
                            .sum();
                        assert!(total == 4 || total == 8);
                    }
                })
            })
            .collect();

        shared.rebuild(points(8)).unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(shared.current().len(), 8);
    }
}
