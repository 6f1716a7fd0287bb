//! Error types for index building and cluster navigation.

use crate::types::ClusterId;
use thiserror::Error;

/// Errors surfaced by the clustering engine.
///
/// Empty indexes and out-of-range zoom levels are not errors: the
/// former yields an empty result and the latter is clamped.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClusterError {
    /// A point's latitude/longitude is non-finite or outside the WGS84 range.
    #[error("invalid coordinate for point '{id}': {reason}")]
    InvalidCoordinate { id: String, reason: String },

    /// Two points in one snapshot share an id.
    #[error("duplicate point id '{0}'")]
    DuplicateId(String),

    /// The cluster id does not name a cluster in this index build.
    #[error("unknown cluster id {0}")]
    UnknownClusterId(ClusterId),

    /// No point with this id exists in the store.
    #[error("unknown point id '{0}'")]
    UnknownPointId(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("serialization error: {0}")]
    SerializationErrorWithContext(String),
}

impl ClusterError {
    /// Id of the offending point, for errors tied to a single point.
    pub fn point_id(&self) -> Option<&str> {
        match self {
            Self::InvalidCoordinate { id, .. } => Some(id),
            Self::DuplicateId(id) | Self::UnknownPointId(id) => Some(id),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClusterError>;
