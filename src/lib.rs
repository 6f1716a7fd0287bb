//! Hierarchical map-marker clustering with viewport queries.
//!
//! ```rust
//! use spatio_cluster::{ClusterIndex, ClusterOrPoint};
//! use spatio_cluster_types::{GeoPoint, Viewport};
//! use geo::Point;
//!
//! let index = ClusterIndex::build(vec![
//!     GeoPoint::from_lat_lon("city-hall", 37.5665, 126.9780, "City Hall"),
//!     GeoPoint::from_lat_lon("deoksugung", 37.5658, 126.9751, "Deoksugung"),
//!     GeoPoint::from_lat_lon("haeundae", 35.1587, 129.1604, "Haeundae"),
//! ])?;
//!
//! let view = Viewport::new(Point::new(127.5, 36.5), 6.0, 6.0);
//! let zoom = spatio_cluster::zoom_for_viewport(view.longitude_span)?;
//! for item in index.query_visible(&view.bbox(), zoom) {
//!     match item {
//!         ClusterOrPoint::Cluster(c) => println!("{} markers near {:?}", c.point_count, c.centroid),
//!         ClusterOrPoint::Leaf(p) => println!("{}", p.payload),
//!     }
//! }
//! # Ok::<(), spatio_cluster::ClusterError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod controller;
pub mod error;
pub mod index;
pub mod ops;
pub mod store;
pub mod types;

#[cfg(feature = "geojson")]
pub mod geojson;

#[cfg(feature = "sync")]
pub mod sync;

pub use builder::IndexBuilder;
pub use config::ClusterConfig;
pub use controller::{CameraCommand, Reaction, ViewportController, ViewportEvent};
pub use error::{ClusterError, Result};
pub use index::{BuildReport, ClusterIndex, ClusterTreeParams, RejectedPoint};
pub use store::PointStore;
pub use types::{Cluster, ClusterId, ClusterOrPoint};

pub use compute::zoom::{scale_span, zoom_for_viewport};

#[cfg(feature = "sync")]
pub use sync::SharedClusterIndex;

pub use geo::Point;
pub use spatio_cluster_types::{BoundingBox, GeoPoint, Viewport};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ClusterConfig, ClusterError, ClusterIndex, IndexBuilder, Result};

    pub use crate::{Cluster, ClusterId, ClusterOrPoint};

    pub use crate::{BoundingBox, GeoPoint, Point, Viewport};

    pub use crate::{PointStore, Reaction, ViewportController, ViewportEvent};

    pub use crate::{scale_span, zoom_for_viewport};

    #[cfg(feature = "sync")]
    pub use crate::SharedClusterIndex;
}
