//! Per-zoom aggregation.
//!
//! Levels are built from the finest (one node per point, at `max_zoom + 1`)
//! up to `min_zoom`. Each coarser level greedily merges the finer level's
//! nodes that lie within the cluster radius of a seed node, visiting seeds in
//! slot order so the result depends only on the (sorted) input.
//!
//! Every finer node records the slot of the coarser node that absorbed it,
//! which makes "which cluster holds this point at zoom z" a table lookup.

use crate::compute::projection::{Projected, pixel_size};
use crate::config::ClusterConfig;
use rstar::primitives::GeomWithData;
use rstar::{RStarInsertionStrategy, RTree, RTreeParams};
use smallvec::{SmallVec, smallvec};

/// Parent slot of nodes on the coarsest level.
pub(crate) const NO_PARENT: u32 = u32::MAX;

/// R-tree node sizing for cluster levels and the leaf index.
///
/// Node capacity only changes performance, never query results.
#[derive(Debug, Clone, Copy)]
pub struct ClusterTreeParams;

impl RTreeParams for ClusterTreeParams {
    const MIN_SIZE: usize = 16;
    const MAX_SIZE: usize = 64;
    const REINSERTION_COUNT: usize = 16;
    type DefaultInsertionStrategy = RStarInsertionStrategy;
}

/// Projected position tagged with a slot.
pub(crate) type TreeEntry = GeomWithData<Projected, u32>;

pub(crate) type SlotTree = RTree<TreeEntry, ClusterTreeParams>;

pub(crate) fn slot_tree(positions: impl Iterator<Item = Projected>) -> SlotTree {
    let entries = positions
        .enumerate()
        .map(|(slot, position)| TreeEntry::new(position, slot as u32))
        .collect();
    RTree::bulk_load_with_params(entries)
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// Count-weighted mean of the children, i.e. the mean of all leaves below.
    pub(crate) position: Projected,
    pub(crate) count: u32,
    pub(crate) parent: u32,
    /// Slots on the next finer level. Empty on the leaf level.
    pub(crate) children: SmallVec<[u32; 4]>,
}

impl Node {
    fn leaf(position: Projected) -> Self {
        Self {
            position,
            count: 1,
            parent: NO_PARENT,
            children: SmallVec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Level {
    pub(crate) zoom: u8,
    pub(crate) nodes: Vec<Node>,
}

/// Build every level, coarsest first. The last entry is the leaf level.
pub(crate) fn build_levels(projected: &[Projected], config: &ClusterConfig) -> Vec<Level> {
    let mut finer = Level {
        zoom: config.max_zoom + 1,
        nodes: projected.iter().map(|&p| Node::leaf(p)).collect(),
    };

    let mut levels = Vec::with_capacity(usize::from(config.max_zoom - config.min_zoom) + 2);
    for zoom in (config.min_zoom..=config.max_zoom).rev() {
        let coarser = cluster_level(&mut finer, zoom, config);
        levels.push(finer);
        finer = coarser;
    }
    levels.push(finer);
    levels.reverse();
    levels
}

fn cluster_level(finer: &mut Level, zoom: u8, config: &ClusterConfig) -> Level {
    let tree = slot_tree(finer.nodes.iter().map(|n| n.position));
    let radius = config.radius * pixel_size(config.extent, zoom);
    let radius_sq = radius * radius;

    let mut processed = vec![false; finer.nodes.len()];
    let mut nodes: Vec<Node> = Vec::with_capacity(finer.nodes.len());
    let mut neighbors: Vec<u32> = Vec::new();

    for seed in 0..finer.nodes.len() {
        if processed[seed] {
            continue;
        }
        processed[seed] = true;

        neighbors.clear();
        neighbors.extend(
            tree.locate_within_distance(finer.nodes[seed].position, radius_sq)
                .map(|entry| entry.data)
                .filter(|&slot| !processed[slot as usize]),
        );
        neighbors.sort_unstable();

        let total = finer.nodes[seed].count
            + neighbors
                .iter()
                .map(|&slot| finer.nodes[slot as usize].count)
                .sum::<u32>();

        if neighbors.is_empty() || (total as usize) < config.min_points {
            carry(&mut finer.nodes, &mut nodes, seed as u32);
            for &slot in &neighbors {
                processed[slot as usize] = true;
                carry(&mut finer.nodes, &mut nodes, slot);
            }
            continue;
        }

        let parent = nodes.len() as u32;
        let (mut wx, mut wy) = (0.0, 0.0);
        let mut children = SmallVec::with_capacity(neighbors.len() + 1);
        for slot in std::iter::once(seed as u32).chain(neighbors.iter().copied()) {
            processed[slot as usize] = true;
            let child = &mut finer.nodes[slot as usize];
            let weight = f64::from(child.count);
            wx += child.position[0] * weight;
            wy += child.position[1] * weight;
            child.parent = parent;
            children.push(slot);
        }

        let weight = f64::from(total);
        nodes.push(Node {
            position: [wx / weight, wy / weight],
            count: total,
            parent: NO_PARENT,
            children,
        });
    }

    log::trace!(
        "zoom {}: {} items aggregated into {}",
        zoom,
        finer.nodes.len(),
        nodes.len()
    );

    Level { zoom, nodes }
}

/// Copy a finer node unchanged onto the coarser level.
fn carry(finer: &mut [Node], coarser: &mut Vec<Node>, slot: u32) {
    let parent = coarser.len() as u32;
    let node = &mut finer[slot as usize];
    node.parent = parent;
    coarser.push(Node {
        position: node.position,
        count: node.count,
        parent: NO_PARENT,
        children: smallvec![slot],
    });
}

/// Flattened `[leaf][level]` table of the slot holding each leaf on each level.
pub(crate) fn ancestor_table(levels: &[Level], leaf_count: usize) -> Vec<u32> {
    let depth = levels.len();
    let mut table = vec![0u32; leaf_count * depth];

    for (leaf, row) in table.chunks_exact_mut(depth).enumerate() {
        let mut slot = leaf as u32;
        row[depth - 1] = slot;
        for level in (0..depth - 1).rev() {
            slot = levels[level + 1].nodes[slot as usize].parent;
            row[level] = slot;
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::projection::project;
    use geo::Point;

    fn project_all(coords: &[(f64, f64)]) -> Vec<Projected> {
        coords
            .iter()
            .map(|&(lon, lat)| project(&Point::new(lon, lat)))
            .collect()
    }

    fn small_config() -> ClusterConfig {
        ClusterConfig::default().with_max_zoom(4)
    }

    #[test]
    fn test_level_layout() {
        let projected = project_all(&[(0.0, 0.0), (10.0, 10.0)]);
        let levels = build_levels(&projected, &small_config());
        assert_eq!(levels.len(), 6);
        assert_eq!(levels[0].zoom, 0);
        assert_eq!(levels[5].zoom, 5);
        assert_eq!(levels[5].nodes.len(), 2);
    }

    #[test]
    fn test_counts_are_conserved_on_every_level() {
        let projected = project_all(&[
            (0.0, 0.0),
            (0.1, 0.1),
            (0.2, 0.0),
            (50.0, 50.0),
            (-120.0, -30.0),
        ]);
        let levels = build_levels(&projected, &small_config());
        for level in &levels {
            let total: u32 = level.nodes.iter().map(|n| n.count).sum();
            assert_eq!(total, 5, "zoom {}", level.zoom);
        }
    }

    #[test]
    fn test_close_points_merge_at_low_zoom() {
        let projected = project_all(&[(0.0, 0.0), (0.1, 0.1)]);
        let levels = build_levels(&projected, &small_config());
        assert_eq!(levels[0].nodes.len(), 1);
        assert_eq!(levels[0].nodes[0].count, 2);
        assert_eq!(levels[0].nodes[0].children.len(), 1);
    }

    #[test]
    fn test_centroid_is_mean_of_leaves() {
        let projected = project_all(&[(0.0, 0.0), (0.2, 0.0), (0.4, 0.0)]);
        let levels = build_levels(&projected, &small_config());
        let root = &levels[0].nodes[0];
        assert_eq!(root.count, 3);
        let mean_x = projected.iter().map(|p| p[0]).sum::<f64>() / 3.0;
        assert!((root.position[0] - mean_x).abs() < 1e-12);
    }

    #[test]
    fn test_min_points_keeps_small_groups_apart() {
        let projected = project_all(&[(0.0, 0.0), (0.1, 0.1)]);
        let config = small_config().with_min_points(3);
        let levels = build_levels(&projected, &config);
        assert!(levels.iter().all(|level| level.nodes.iter().all(|n| n.count == 1)));
    }

    #[test]
    fn test_ancestor_table_matches_parents() {
        let projected = project_all(&[(0.0, 0.0), (0.1, 0.1), (90.0, 45.0)]);
        let levels = build_levels(&projected, &small_config());
        let table = ancestor_table(&levels, projected.len());
        let depth = levels.len();

        for leaf in 0..projected.len() {
            let row = &table[leaf * depth..(leaf + 1) * depth];
            assert_eq!(row[depth - 1], leaf as u32);
            for level in 0..depth - 1 {
                let child = &levels[level + 1].nodes[row[level + 1] as usize];
                assert_eq!(child.parent, row[level]);
                assert!(
                    levels[level].nodes[row[level] as usize]
                        .children
                        .contains(&row[level + 1])
                );
            }
            assert_eq!(levels[0].nodes[row[0] as usize].parent, NO_PARENT);
        }
    }
}
