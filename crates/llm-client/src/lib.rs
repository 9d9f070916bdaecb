//! HTTP client for the generative text model.
//!
//! Owns the resilience contract around model calls: a hard per-request
//! timeout enforced by cancellation, bounded retries with increasing
//! backoff for transient failures, and best-effort repair of near-valid
//! JSON output. Callers see a typed [`LlmError`] so they can decide
//! between tenant-visible messaging and silent fallback.
//!
//! The [`TextGenerator`] trait is the seam used by the orchestrator and
//! the trainer; tests inject fakes instead of a live [`LlmClient`].

mod api_types;
mod client;
mod config;
mod error;
pub mod repair;

pub use client::{LlmClient, TextGenerator};
pub use config::LlmConfig;
pub use error::LlmError;

// Re-export async_trait for implementors of TextGenerator.
pub use async_trait::async_trait;
