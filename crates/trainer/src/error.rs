//! Error types for training runs.

use thiserror::Error;

/// Errors surfaced by a training run. Unlike the reply path, training is
/// an explicit operation, so failures are reported raw instead of being
/// papered over.
#[derive(Debug, Error)]
pub enum TrainerError {
    /// Too few usable self-authored messages to learn anything.
    #[error("not enough messages to train on ({message_count} usable)")]
    InsufficientData { message_count: i64 },

    /// The tenant has no model credential configured.
    #[error("no model API key configured for this tenant")]
    MissingCredential,

    #[error("database error: {0}")]
    Database(#[from] database::DatabaseError),

    #[error("failed to serialize learned style: {0}")]
    Serialization(#[from] serde_json::Error),
}
