//! Error types for the MindGuard engine

use thiserror::Error;

use crate::entry::ValidationError;
use crate::history::OrderingViolation;

/// Errors surfaced by the engine facade.
///
/// All variants are recoverable, local conditions; none leaves the history
/// store partially mutated.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("append out of order: {0}")]
    OutOfOrder(#[from] OrderingViolation),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
