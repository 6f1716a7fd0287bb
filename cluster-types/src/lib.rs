//! # spatio-cluster-types
//!
//! Plain data types shared by the clustering engine and the code that drives it:
//!
//! - **Markers**: [`GeoPoint`], an identified WGS84 position carrying an opaque payload
//! - **Bounds**: [`BoundingBox`], a west/south/east/north rectangle in degrees
//! - **Viewports**: [`Viewport`], a map camera expressed as center plus spans
//!
//! All types are serializable with Serde and built on the `geo` crate's primitives.
//!
//! ## Examples
//!
//! ```rust
//! use spatio_cluster_types::{GeoPoint, Viewport};
//! use geo::Point;
//!
//! let cafe = GeoPoint::from_lat_lon("cafe-1", 37.5665, 126.9780, "Coffee");
//! let viewport = Viewport::new(Point::new(126.9780, 37.5665), 0.0922, 0.0421);
//! assert!(viewport.bbox().contains(cafe.position()));
//! ```

pub mod bbox;
pub mod point;
pub mod viewport;

pub use bbox::BoundingBox;
pub use point::GeoPoint;
pub use viewport::Viewport;
