//! Mutable marker collection with a lazily rebuilt cluster index.
//!
//! The store owns the markers the user has placed. Every mutation bumps a
//! version counter; the next query rebuilds the index once if the version moved
//! since the last build, so bursts of edits only ever index the final state.

use crate::compute::validation::{validate_geo_point, validate_geographic_point};
use crate::config::ClusterConfig;
use crate::error::{ClusterError, Result};
use crate::index::ClusterIndex;
use crate::types::{ClusterId, ClusterOrPoint};
use geo::Point;
use rustc_hash::FxHashMap;
use spatio_cluster_types::{BoundingBox, GeoPoint};
use std::sync::Arc;

/// Marker collection keyed by id.
///
/// # Examples
///
/// ```
/// use spatio_cluster::PointStore;
/// use spatio_cluster_types::{BoundingBox, GeoPoint};
///
/// let mut store = PointStore::default();
/// store.insert(GeoPoint::from_lat_lon("home", 37.5665, 126.9780, "Home"))?;
/// store.insert(GeoPoint::from_lat_lon("work", 37.5700, 126.9800, "Work"))?;
///
/// let items = store.query_visible(&BoundingBox::world(), 10)?;
/// assert_eq!(items.len(), 1);
///
/// store.move_point("work", 35.1796, 129.0756)?;
/// assert_eq!(store.query_visible(&BoundingBox::world(), 10)?.len(), 2);
/// # Ok::<(), spatio_cluster::ClusterError>(())
/// ```
#[derive(Debug)]
pub struct PointStore<P = ()> {
    config: ClusterConfig,
    points: FxHashMap<String, GeoPoint<P>>,
    version: u64,
    cached: Option<(u64, Arc<ClusterIndex<P>>)>,
}

impl<P> PointStore<P> {
    pub fn new(config: ClusterConfig) -> Result<Self> {
        config.validate().map_err(ClusterError::InvalidConfig)?;
        Ok(Self {
            config,
            points: FxHashMap::default(),
            version: 0,
            cached: None,
        })
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Add a marker, replacing any marker with the same id.
    ///
    /// Returns the replaced marker. Invalid coordinates are rejected and leave
    /// the store untouched.
    pub fn insert(&mut self, point: GeoPoint<P>) -> Result<Option<GeoPoint<P>>> {
        validate_geo_point(&point)?;
        self.version += 1;
        Ok(self.points.insert(point.id.clone(), point))
    }

    /// Move an existing marker.
    pub fn move_point(&mut self, id: &str, latitude: f64, longitude: f64) -> Result<()> {
        validate_geographic_point(id, &Point::new(longitude, latitude))?;
        let point = self
            .points
            .get_mut(id)
            .ok_or_else(|| ClusterError::UnknownPointId(id.to_string()))?;
        point.set_position(latitude, longitude);
        self.version += 1;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Option<GeoPoint<P>> {
        let removed = self.points.remove(id);
        if removed.is_some() {
            self.version += 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        if !self.points.is_empty() {
            self.points.clear();
            self.version += 1;
        }
    }

    pub fn get(&self, id: &str) -> Option<&GeoPoint<P>> {
        self.points.get(id)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mutation counter. Two equal versions mean an identical snapshot.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether the next query will rebuild the index.
    pub fn is_stale(&self) -> bool {
        !matches!(self.cached, Some((version, _)) if version == self.version)
    }

    /// Current markers ordered by id.
    pub fn snapshot(&self) -> Vec<GeoPoint<P>>
    where
        P: Clone,
    {
        let mut points: Vec<_> = self.points.values().cloned().collect();
        points.sort_by(|a, b| a.id.cmp(&b.id));
        points
    }

    /// Index over the current markers, rebuilt only if they changed.
    pub fn index(&mut self) -> Result<Arc<ClusterIndex<P>>>
    where
        P: Clone,
    {
        if let Some((version, index)) = &self.cached
            && *version == self.version
        {
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(ClusterIndex::build_with_config(
            self.points.values().cloned(),
            self.config.clone(),
        )?);
        log::debug!(
            "Rebuilt cluster index at version {} ({} points)",
            self.version,
            index.len()
        );
        self.cached = Some((self.version, Arc::clone(&index)));
        Ok(index)
    }

    pub fn query_visible(&mut self, bbox: &BoundingBox, zoom: i32) -> Result<Vec<ClusterOrPoint<P>>>
    where
        P: Clone,
    {
        Ok(self.index()?.query_visible(bbox, zoom))
    }

    pub fn expansion_zoom(&mut self, id: ClusterId) -> Result<i32>
    where
        P: Clone,
    {
        self.index()?.expansion_zoom(id)
    }
}

impl<P> Default for PointStore<P> {
    fn default() -> Self {
        Self {
            config: ClusterConfig::default(),
            points: FxHashMap::default(),
            version: 0,
            cached: None,
        }
    }
}
