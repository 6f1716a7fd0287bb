//! Viewport queries.

use super::ClusterIndex;
use crate::compute::projection::{MAX_LATITUDE, Projected, lat_y, lng_x, pixel_size, unproject};
use crate::compute::validation::validate_bbox;
use crate::error::Result;
use crate::types::{Cluster, ClusterId, ClusterOrPoint};
use rstar::AABB;
use rustc_hash::FxHashMap;
use spatio_cluster_types::{BoundingBox, GeoPoint};

impl<P> ClusterIndex<P> {
    /// Everything to draw for `bbox` at `zoom`.
    ///
    /// `zoom` is clamped into `[min_zoom, max_zoom]`. A point is visible when it
    /// lies inside `bbox` widened by `padding` pixels at that zoom. Visible
    /// points that share a cluster at `zoom` are returned together as one
    /// [`Cluster`] counting only the visible members; a point alone in its
    /// group is returned as a leaf. Items are ordered by their first member id.
    ///
    /// A cluster's id names the finest cluster node that still holds all of
    /// its visible members, so [`ClusterIndex::expansion_zoom`] splits exactly
    /// what was drawn. Its zoom can therefore be deeper than `zoom`.
    ///
    /// Boxes with `west > east` are treated as crossing the antimeridian.
    /// Points beyond the Mercator latitude limit are matched on their
    /// geographic latitude, without padding. Non-finite or inverted
    /// (`south > north`) boxes yield an empty result.
    pub fn query_visible(&self, bbox: &BoundingBox, zoom: i32) -> Vec<ClusterOrPoint<P>>
    where
        P: Clone,
    {
        if self.is_empty() {
            return Vec::new();
        }
        if let Err(e) = validate_bbox(bbox) {
            log::warn!("Rejecting viewport query: {}", e);
            return Vec::new();
        }

        let zoom = self.config.clamp_zoom(zoom);
        let level = self.level_index(zoom);
        let leaves = self.leaves_in(bbox, self.padding_at(zoom));

        let mut group_of: FxHashMap<u32, usize> = FxHashMap::default();
        let mut groups: Vec<(u32, Vec<u32>)> = Vec::new();
        for leaf in leaves {
            let node = self.ancestor(leaf, level);
            let group = *group_of.entry(node).or_insert_with(|| {
                groups.push((node, Vec::new()));
                groups.len() - 1
            });
            groups[group].1.push(leaf);
        }

        let items: Vec<ClusterOrPoint<P>> = groups
            .into_iter()
            .map(|(node, members)| match members.as_slice() {
                [leaf] => ClusterOrPoint::Leaf(self.points[*leaf as usize].clone()),
                _ => {
                    let (level, slot) = self.common_ancestor(&members, level, node);
                    ClusterOrPoint::Cluster(Cluster {
                        id: self.cluster_id(self.levels[level].zoom, slot),
                        centroid: unproject(self.mean_position(&members)),
                        point_count: members.len(),
                    })
                }
            })
            .collect();

        log::trace!("Viewport query at zoom {} returned {} items", zoom, items.len());
        items
    }

    /// Points inside `bbox` widened by the padding at `zoom`, ordered by id.
    pub fn visible_points(&self, bbox: &BoundingBox, zoom: i32) -> Vec<&GeoPoint<P>> {
        if validate_bbox(bbox).is_err() {
            return Vec::new();
        }
        let zoom = self.config.clamp_zoom(zoom);
        self.leaves_in(bbox, self.padding_at(zoom))
            .into_iter()
            .map(|leaf| &self.points[leaf as usize])
            .collect()
    }

    /// The members of cluster `id` visible inside `bbox`, as
    /// [`ClusterIndex::query_visible`] counted them for `bbox` at `zoom`.
    pub fn cluster_members_in(
        &self,
        id: ClusterId,
        bbox: &BoundingBox,
        zoom: i32,
    ) -> Result<Vec<&GeoPoint<P>>> {
        let (level, slot) = self.resolve(id)?;
        validate_bbox(bbox)?;
        let zoom = self.config.clamp_zoom(zoom);

        Ok(self
            .leaves_in(bbox, self.padding_at(zoom))
            .into_iter()
            .filter(|&leaf| self.ancestor(leaf, level) == slot)
            .map(|leaf| &self.points[leaf as usize])
            .collect())
    }

    /// Finest `(level, slot)` below `(level, slot)` holding every leaf in `members`.
    fn common_ancestor(&self, members: &[u32], mut level: usize, mut slot: u32) -> (usize, u32) {
        let Some((&first, rest)) = members.split_first() else {
            return (level, slot);
        };
        while level + 1 < self.leaf_level() {
            let next = self.ancestor(first, level + 1);
            if rest.iter().any(|&leaf| self.ancestor(leaf, level + 1) != next) {
                break;
            }
            level += 1;
            slot = next;
        }
        (level, slot)
    }

    fn padding_at(&self, zoom: u8) -> f64 {
        self.config.padding * pixel_size(self.config.extent, zoom)
    }

    /// Leaf slots inside `bbox` grown by `pad` projected units, sorted and unique.
    pub(super) fn leaves_in(&self, bbox: &BoundingBox, pad: f64) -> Vec<u32> {
        let (first, second) = bbox.normalized().split_antimeridian();

        let mut leaves: Vec<u32> = Vec::new();
        for part in std::iter::once(first).chain(second) {
            // North maps to the smaller y.
            let min = [lng_x(part.west) - pad, lat_y(part.north) - pad];
            let max = [lng_x(part.east) + pad, lat_y(part.south) + pad];
            // Latitudes past the Mercator limit all project onto the edge.
            leaves.extend(
                self.leaf_tree
                    .locate_in_envelope(&AABB::from_corners(min, max))
                    .map(|entry| entry.data)
                    .filter(|&leaf| {
                        let lat = self.points[leaf as usize].latitude();
                        lat.abs() <= MAX_LATITUDE || (lat >= part.south && lat <= part.north)
                    }),
            );
        }

        leaves.sort_unstable();
        leaves.dedup();
        leaves
    }

    /// Flat mean of the projected positions of `leaves`.
    pub(super) fn mean_position(&self, leaves: &[u32]) -> Projected {
        let (sx, sy) = leaves.iter().fold((0.0, 0.0), |(sx, sy), &leaf| {
            let [x, y] = self.projected[leaf as usize];
            (sx + x, sy + y)
        });
        let n = leaves.len().max(1) as f64;
        [sx / n, sy / n]
    }
}
