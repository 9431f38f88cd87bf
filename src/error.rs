use thiserror::Error;

use crate::topology::VertexId;

/// Top-level error type for the polygon editing core.
#[derive(Debug, Error, PartialEq)]
pub enum PolyEditError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Handle(#[from] HandleError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to the vertex sequence.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("unknown vertex {0}")]
    UnknownVertex(VertexId),

    #[error("insert references vertex {0}, which is not in the polygon")]
    InvalidReference(VertexId),
}

/// Errors related to handle bookkeeping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandleError {
    #[error("marker is not owned by this polygon")]
    UnknownHandle,

    #[error("vertex {0} has no midpoint handles")]
    MissingMidpoint(VertexId),
}

/// Errors raised when a screen point cannot be resolved on the scene.
#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    #[error("screen point ({x}, {y}) is outside the mapped surface")]
    OutsideSurface { x: f64, y: f64 },
}

/// Errors related to editor configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Convenience type alias for results using [`PolyEditError`].
pub type Result<T> = std::result::Result<T, PolyEditError>;
