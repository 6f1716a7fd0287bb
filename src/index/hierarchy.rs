//! Cluster lookups: resolving ids, walking the hierarchy, and expansion zoom.

use super::ClusterIndex;
use crate::compute::projection::unproject;
use crate::error::{ClusterError, Result};
use crate::types::{Cluster, ClusterId, ClusterOrPoint};
use geo::{BoundingRect, MultiPoint};
use spatio_cluster_types::{BoundingBox, GeoPoint};

impl<P> ClusterIndex<P> {
    /// Map a cluster id from this build to its `(level, slot)`.
    ///
    /// Ids handed out by a build over other markers or settings are unknown.
    pub(super) fn resolve(&self, id: ClusterId) -> Result<(usize, u32)> {
        let zoom = id.zoom();
        if id.tag() != self.tag || zoom < self.config.min_zoom || zoom > self.config.max_zoom {
            return Err(ClusterError::UnknownClusterId(id));
        }

        let level = self.level_index(zoom);
        let slot = id.slot();
        match self.levels[level].nodes.get(slot as usize) {
            Some(node) if node.count >= 2 => Ok((level, slot)),
            _ => Err(ClusterError::UnknownClusterId(id)),
        }
    }

    /// The whole cluster behind `id`, regardless of any viewport.
    pub fn cluster(&self, id: ClusterId) -> Result<Cluster> {
        let (level, slot) = self.resolve(id)?;
        let node = &self.levels[level].nodes[slot as usize];
        Ok(Cluster {
            id,
            centroid: unproject(node.position),
            point_count: node.count as usize,
        })
    }

    /// The items `id` splits into one zoom level further in.
    ///
    /// A cluster that is carried over unchanged to the next level yields a
    /// single child cluster with the same members.
    pub fn cluster_children(&self, id: ClusterId) -> Result<Vec<ClusterOrPoint<P>>>
    where
        P: Clone,
    {
        let (level, slot) = self.resolve(id)?;
        let child_level = level + 1;
        let child_zoom = self.levels[child_level].zoom;

        let children = self.levels[level].nodes[slot as usize]
            .children
            .iter()
            .map(|&child| {
                let node = &self.levels[child_level].nodes[child as usize];
                if node.count >= 2 {
                    ClusterOrPoint::Cluster(Cluster {
                        id: self.cluster_id(child_zoom, child),
                        centroid: unproject(node.position),
                        point_count: node.count as usize,
                    })
                } else {
                    let leaf = self.single_leaf(child_level, child);
                    ClusterOrPoint::Leaf(self.points[leaf as usize].clone())
                }
            })
            .collect();

        Ok(children)
    }

    /// Points behind `id`, ordered by id, paged with `offset` and `limit`.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatio_cluster::ClusterIndex;
    /// use spatio_cluster_types::{BoundingBox, GeoPoint};
    ///
    /// let points = (0..5).map(|i| GeoPoint::from_lat_lon(format!("p{i}"), 0.0, i as f64 * 0.01, ()));
    /// let index = ClusterIndex::build(points)?;
    /// let cluster = index.query_visible(&BoundingBox::world(), 0)[0].as_cluster().cloned().unwrap();
    ///
    /// let page = index.cluster_leaves(cluster.id, 2, 1)?;
    /// let ids: Vec<_> = page.iter().map(|p| p.id()).collect();
    /// assert_eq!(ids, ["p1", "p2"]);
    /// # Ok::<(), spatio_cluster::ClusterError>(())
    /// ```
    pub fn cluster_leaves(
        &self,
        id: ClusterId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<&GeoPoint<P>>> {
        let (level, slot) = self.resolve(id)?;
        let mut leaves = Vec::new();
        self.collect_leaves(level, slot, &mut leaves);
        leaves.sort_unstable();

        Ok(leaves
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|leaf| &self.points[leaf as usize])
            .collect())
    }

    /// Smallest zoom at which the members of `id` are no longer drawn as one
    /// cluster, clamped to `max_zoom`.
    ///
    /// Zooming to the returned level or beyond never merges those members back
    /// into a single item.
    pub fn expansion_zoom(&self, id: ClusterId) -> Result<i32> {
        let (mut level, mut slot) = self.resolve(id)?;
        let leaf_level = self.leaf_level();

        // Follow clusters carried over unchanged until one actually splits.
        loop {
            let node = &self.levels[level].nodes[slot as usize];
            level += 1;
            if node.children.len() != 1 || level == leaf_level {
                break;
            }
            slot = node.children[0];
        }

        let zoom = self.levels[level].zoom.min(self.config.max_zoom);
        Ok(i32::from(zoom))
    }

    /// Bounding box of every point behind `id`.
    pub fn cluster_bounds(&self, id: ClusterId) -> Result<BoundingBox> {
        let (level, slot) = self.resolve(id)?;
        let mut leaves = Vec::new();
        self.collect_leaves(level, slot, &mut leaves);

        let points: MultiPoint = leaves
            .iter()
            .map(|&leaf| self.points[leaf as usize].position)
            .collect();
        points
            .bounding_rect()
            .map(BoundingBox::from_rect)
            .ok_or(ClusterError::UnknownClusterId(id))
    }

    fn collect_leaves(&self, level: usize, slot: u32, out: &mut Vec<u32>) {
        if level == self.leaf_level() {
            out.push(slot);
            return;
        }
        for &child in &self.levels[level].nodes[slot as usize].children {
            self.collect_leaves(level + 1, child, out);
        }
    }

    /// Leaf under a node of count one.
    fn single_leaf(&self, mut level: usize, mut slot: u32) -> u32 {
        while level < self.leaf_level() {
            slot = self.levels[level].nodes[slot as usize].children[0];
            level += 1;
        }
        slot
    }
}
