//! Engine error type.

use thiserror::Error;

use crate::graph::VertexId;

/// Failures reported synchronously to the caller.
///
/// Cancellation is not an error; see [`crate::Detection::Cancelled`].
#[derive(Debug, Error)]
pub enum MotifError {
    #[error("invalid {bound} bounds: min {min} is greater than max {max}")]
    InvalidBounds {
        bound: &'static str,
        min: usize,
        max: usize,
    },

    #[error("empty {bound} bounds: max {max} is below the structural minimum {floor}")]
    EmptyBounds {
        bound: &'static str,
        max: usize,
        floor: usize,
    },

    #[error("progress interval must be at least 1")]
    InvalidProgressInterval,

    #[error("unknown vertex {0:?}")]
    UnknownVertex(VertexId),

    #[error("unknown motif family `{0}` (expected fan, d-connector, clique or all)")]
    UnknownFamily(String),

    #[error("invalid motif config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read motif config: {0}")]
    Io(#[from] std::io::Error),
}
