//! Hierarchical marker clustering index.
//!
//! A [`ClusterIndex`] is built once per snapshot of markers and then answers,
//! without further allocation-heavy work:
//!
//! - what to draw for a bounding box at a zoom level ([`ClusterIndex::query_visible`]),
//! - at which zoom a tapped cluster falls apart ([`ClusterIndex::expansion_zoom`]),
//! - which markers sit behind a cluster ([`ClusterIndex::cluster_leaves`]).
//!
//! ## Structure
//!
//! Points are projected into the Web-Mercator unit square and stored in an
//! R-tree for viewport range queries. On top of that sits one aggregation level
//! per zoom, each merging nodes of the next finer level that lie within
//! `radius` pixels at that zoom. A query finds the points inside the (padded)
//! box and groups them by the node that holds them at the requested zoom, so
//! every visible point lands in exactly one result item.
//!
//! An index is immutable. When markers change, build a new one and swap it in.
//!
//! ## Example
//!
//! ```rust
//! use spatio_cluster::{ClusterIndex, ClusterOrPoint};
//! use spatio_cluster_types::{BoundingBox, GeoPoint};
//!
//! let index = ClusterIndex::build(vec![
//!     GeoPoint::from_lat_lon("a", 37.5665, 126.9780, ()),
//!     GeoPoint::from_lat_lon("b", 37.5666, 126.9781, ()),
//!     GeoPoint::from_lat_lon("c", 35.1796, 129.0756, ()),
//! ])?;
//!
//! let items = index.query_visible(&BoundingBox::world(), 3);
//! assert_eq!(items.iter().map(|i| i.point_count()).sum::<usize>(), 3);
//!
//! if let Some(ClusterOrPoint::Cluster(cluster)) = items.iter().find(|i| i.is_cluster()) {
//!     let zoom = index.expansion_zoom(cluster.id)?;
//!     assert!(zoom > 3);
//! }
//! # Ok::<(), spatio_cluster::ClusterError>(())
//! ```

mod hierarchy;
pub(crate) mod levels;
mod nearby;
mod query;

use crate::compute::projection::{Projected, project};
use crate::compute::validation::{validate_geo_point, validate_points};
use crate::config::ClusterConfig;
use crate::error::{ClusterError, Result};
use crate::types::{ClusterId, TAG_BITS};
use levels::{Level, SlotTree, ancestor_table, build_levels, slot_tree};
use rustc_hash::{FxHashMap, FxHashSet, FxHasher};
use spatio_cluster_types::GeoPoint;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Instant;

pub use levels::ClusterTreeParams;

/// Immutable clustering index over one snapshot of markers.
pub struct ClusterIndex<P = ()> {
    config: ClusterConfig,
    /// Snapshot sorted by id; a point's position here is its leaf slot.
    points: Vec<GeoPoint<P>>,
    projected: Vec<Projected>,
    leaf_tree: SlotTree,
    /// `levels[0]` is `min_zoom`, the last entry is the leaf level.
    levels: Vec<Level>,
    ancestors: Vec<u32>,
    slots_by_id: FxHashMap<String, u32>,
    /// Fingerprint of the snapshot and settings, stamped into every cluster id.
    tag: u32,
}

/// A point left out of an index, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedPoint<P> {
    pub point: GeoPoint<P>,
    pub error: ClusterError,
}

/// Result of a lenient build: the index over the valid points plus every
/// point that was excluded.
#[derive(Debug)]
pub struct BuildReport<P> {
    pub index: ClusterIndex<P>,
    pub rejected: Vec<RejectedPoint<P>>,
}

impl<P> BuildReport<P> {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Fail with the first rejection, or hand back the index.
    pub fn into_result(self) -> Result<ClusterIndex<P>> {
        match self.rejected.into_iter().next() {
            Some(rejected) => Err(rejected.error),
            None => Ok(self.index),
        }
    }
}

impl<P> ClusterIndex<P> {
    /// Build with the default [`ClusterConfig`].
    ///
    /// Fails with `InvalidCoordinate` or `DuplicateId` on the first bad point;
    /// no index is produced in that case.
    pub fn build(points: impl IntoIterator<Item = GeoPoint<P>>) -> Result<Self> {
        Self::build_with_config(points, ClusterConfig::default())
    }

    pub fn build_with_config(
        points: impl IntoIterator<Item = GeoPoint<P>>,
        config: ClusterConfig,
    ) -> Result<Self> {
        config.validate().map_err(ClusterError::InvalidConfig)?;
        let points: Vec<GeoPoint<P>> = points.into_iter().collect();
        validate_points(&points)?;
        Ok(Self::from_valid(points, config))
    }

    /// Build from the valid subset of `points`.
    ///
    /// Invalid coordinates and repeated ids (after the first occurrence) are
    /// excluded and reported in [`BuildReport::rejected`] instead of aborting.
    pub fn build_partial(
        points: impl IntoIterator<Item = GeoPoint<P>>,
        config: ClusterConfig,
    ) -> Result<BuildReport<P>> {
        config.validate().map_err(ClusterError::InvalidConfig)?;

        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for point in points {
            if let Err(error) = validate_geo_point(&point) {
                rejected.push(RejectedPoint { point, error });
            } else if !seen.insert(point.id.clone()) {
                let error = ClusterError::DuplicateId(point.id.clone());
                rejected.push(RejectedPoint { point, error });
            } else {
                accepted.push(point);
            }
        }

        Ok(BuildReport {
            index: Self::from_valid(accepted, config),
            rejected,
        })
    }

    /// An index with no points. Every query returns an empty result.
    pub fn empty(config: ClusterConfig) -> Result<Self> {
        Self::build_with_config(Vec::new(), config)
    }

    fn from_valid(mut points: Vec<GeoPoint<P>>, config: ClusterConfig) -> Self {
        let started = Instant::now();

        points.sort_by(|a, b| a.id.cmp(&b.id));
        let projected: Vec<Projected> = points.iter().map(|p| project(&p.position)).collect();
        let levels = build_levels(&projected, &config);
        let ancestors = ancestor_table(&levels, points.len());
        let leaf_tree = slot_tree(projected.iter().copied());
        let tag = snapshot_tag(&points, &config);
        let slots_by_id = points
            .iter()
            .enumerate()
            .map(|(slot, p)| (p.id.clone(), slot as u32))
            .collect();

        log::debug!(
            "Built cluster index: {} points, zoom {}..={}, {} clusters at min zoom, {:?}",
            points.len(),
            config.min_zoom,
            config.max_zoom,
            levels.first().map_or(0, |level| level.nodes.len()),
            started.elapsed()
        );

        Self {
            config,
            points,
            projected,
            leaf_tree,
            levels,
            ancestors,
            slots_by_id,
            tag,
        }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All indexed points, ordered by id.
    pub fn points(&self) -> &[GeoPoint<P>] {
        &self.points
    }

    pub fn get(&self, id: &str) -> Option<&GeoPoint<P>> {
        self.slots_by_id
            .get(id)
            .map(|&slot| &self.points[slot as usize])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.slots_by_id.contains_key(id)
    }

    fn cluster_id(&self, zoom: u8, slot: u32) -> ClusterId {
        ClusterId::new(self.tag, zoom, slot)
    }

    fn level_index(&self, zoom: u8) -> usize {
        usize::from(zoom - self.config.min_zoom)
    }

    fn leaf_level(&self) -> usize {
        self.levels.len() - 1
    }

    /// Slot holding `leaf` on `level`.
    fn ancestor(&self, leaf: u32, level: usize) -> u32 {
        self.ancestors[leaf as usize * self.levels.len() + level]
    }
}

/// Deterministic fingerprint of everything that shapes the hierarchy.
fn snapshot_tag<P>(points: &[GeoPoint<P>], config: &ClusterConfig) -> u32 {
    let mut hasher = FxHasher::default();
    for point in points {
        point.id.hash(&mut hasher);
        point.longitude().to_bits().hash(&mut hasher);
        point.latitude().to_bits().hash(&mut hasher);
    }
    config.radius.to_bits().hash(&mut hasher);
    config.extent.to_bits().hash(&mut hasher);
    config.min_zoom.hash(&mut hasher);
    config.max_zoom.hash(&mut hasher);
    config.min_points.hash(&mut hasher);
    (hasher.finish() >> (64 - TAG_BITS)) as u32
}

impl<P> fmt::Debug for ClusterIndex<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterIndex")
            .field("points", &self.points.len())
            .field("levels", &self.levels.len())
            .field("config", &self.config)
            .finish()
    }
}
