/// Error types for the structural viewer
use thiserror::Error;

use crate::model::{Axis, NodeId};

/// Main error type for viewer operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Node {node}: {axis} coordinate {text:?} is not a finite number")]
    InvalidCoordinate {
        node: NodeId,
        axis: Axis,
        text: String,
    },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Frame scheduling error: {0}")]
    Schedule(String),
}

/// Result type alias for viewer operations
pub type Result<T> = std::result::Result<T, Error>;
