//! Pure computations shared by the index and its callers.
//!
//! - `projection`: Web-Mercator projection into the unit square
//! - `validation`: coordinate and query input checks
//! - `zoom`: conversions between viewport spans and zoom levels
//!
//! Nothing here holds state; every function is safe to call from any thread.

pub mod projection;
pub mod validation;
pub mod zoom;
