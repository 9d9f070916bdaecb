//! Error types for the reply pipeline.

use thiserror::Error;

/// Errors that abort processing of an inbound message.
///
/// Model failures are not represented here: the reply path always falls
/// back to a deterministic canned reply instead of surfacing them.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Persistence failure. Nothing downstream is attempted.
    #[error("database error: {0}")]
    Database(#[from] database::DatabaseError),

    /// The outbound gateway rejected or failed the dispatch.
    #[error("gateway dispatch failed: {0}")]
    Gateway(String),
}
