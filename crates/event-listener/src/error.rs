//! Error types for event handling.

use thiserror::Error;

/// Errors that abort handling of a whole webhook event. Per-tenant
/// failures never land here; they are isolated into the event summary.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("database error: {0}")]
    Database(#[from] database::DatabaseError),
}
