//! Clustering configuration.
//!
//! [`ClusterConfig`] is small and serializable so the same settings can be
//! shipped with an app bundle as JSON or TOML.
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Highest zoom level an index can be built for.
pub const MAX_SUPPORTED_ZOOM: u8 = 30;

/// Clustering parameters.
///
/// Distances are expressed in pixels of a tile that is `extent` pixels wide,
/// so results do not depend on the device's screen size.
///
/// # Example
///
/// ```rust
/// use spatio_cluster::ClusterConfig;
///
/// let config = ClusterConfig::default().with_radius(60.0).with_max_zoom(18);
/// assert!(config.validate().is_ok());
///
/// let json = r#"{ "radius": 50.0, "max_zoom": 16 }"#;
/// let config = ClusterConfig::from_json(json).unwrap();
/// assert_eq!(config.extent, 512.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    /// Cluster radius in pixels at tile extent.
    #[serde(default = "ClusterConfig::default_radius")]
    pub radius: f64,

    /// Tile extent the radius is measured against.
    #[serde(default = "ClusterConfig::default_extent")]
    pub extent: f64,

    /// Lowest zoom level clusters are generated for.
    #[serde(default)]
    pub min_zoom: u8,

    /// Highest zoom level clusters are generated for.
    #[serde(default = "ClusterConfig::default_max_zoom")]
    pub max_zoom: u8,

    /// Minimum number of points that form a cluster.
    #[serde(default = "ClusterConfig::default_min_points")]
    pub min_points: usize,

    /// Extra margin around a query box, in pixels at the query zoom, so
    /// markers straddling the edge do not pop in and out.
    #[serde(default = "ClusterConfig::default_padding")]
    pub padding: f64,
}

impl ClusterConfig {
    const fn default_radius() -> f64 {
        40.0
    }

    const fn default_extent() -> f64 {
        512.0
    }

    const fn default_max_zoom() -> u8 {
        20
    }

    const fn default_min_points() -> usize {
        2
    }

    const fn default_padding() -> f64 {
        16.0
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_extent(mut self, extent: f64) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_min_zoom(mut self, min_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self
    }

    pub fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Clamp an arbitrary zoom into `[min_zoom, max_zoom]`.
    pub fn clamp_zoom(&self, zoom: i32) -> u8 {
        let clamped = zoom.clamp(i32::from(self.min_zoom), i32::from(self.max_zoom));
        // In range of u8 after the clamp above.
        clamped as u8
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err("Radius must be a positive finite number".to_string());
        }

        if !self.extent.is_finite() || self.extent <= 0.0 {
            return Err("Extent must be a positive finite number".to_string());
        }

        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err("Padding must be finite and non-negative".to_string());
        }

        if self.min_zoom > self.max_zoom {
            return Err(format!(
                "min_zoom ({}) must not exceed max_zoom ({})",
                self.min_zoom, self.max_zoom
            ));
        }

        if self.max_zoom > MAX_SUPPORTED_ZOOM {
            return Err(format!(
                "max_zoom must be at most {}, got {}",
                MAX_SUPPORTED_ZOOM, self.max_zoom
            ));
        }

        if self.min_points < 2 {
            return Err("min_points must be at least 2".to_string());
        }

        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: ClusterConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: ClusterConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            radius: Self::default_radius(),
            extent: Self::default_extent(),
            min_zoom: 0,
            max_zoom: Self::default_max_zoom(),
            min_points: Self::default_min_points(),
            padding: Self::default_padding(),
        }
    }
}
