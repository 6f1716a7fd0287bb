//! Index builder for flexible configuration
//!
//! This module provides a builder pattern for creating cluster indexes with
//! tuned radius, zoom range and padding.

use crate::config::ClusterConfig;
use crate::error::Result;
use crate::index::{BuildReport, ClusterIndex};
use spatio_cluster_types::GeoPoint;

/// Builder for index configuration.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    config: ClusterConfig,
}

impl IndexBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: ClusterConfig::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ClusterConfig) -> Self {
        self.config = config;
        self
    }

    /// Cluster radius in pixels.
    pub fn radius(mut self, radius: f64) -> Self {
        self.config.radius = radius;
        self
    }

    /// Tile extent in pixels the radius is measured against.
    pub fn extent(mut self, extent: f64) -> Self {
        self.config.extent = extent;
        self
    }

    pub fn min_zoom(mut self, min_zoom: u8) -> Self {
        self.config.min_zoom = min_zoom;
        self
    }

    pub fn max_zoom(mut self, max_zoom: u8) -> Self {
        self.config.max_zoom = max_zoom;
        self
    }

    /// Smallest group that becomes a cluster.
    pub fn min_points(mut self, min_points: usize) -> Self {
        self.config.min_points = min_points;
        self
    }

    /// Query padding in pixels at the query zoom.
    pub fn padding(mut self, padding: f64) -> Self {
        self.config.padding = padding;
        self
    }

    /// Build the index, failing on the first invalid point or setting.
    pub fn build<P>(self, points: impl IntoIterator<Item = GeoPoint<P>>) -> Result<ClusterIndex<P>> {
        ClusterIndex::build_with_config(points, self.config)
    }

    /// Build from the valid points and report the rest.
    pub fn build_partial<P>(
        self,
        points: impl IntoIterator<Item = GeoPoint<P>>,
    ) -> Result<BuildReport<P>> {
        ClusterIndex::build_partial(points, self.config)
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}
