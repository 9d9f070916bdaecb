//! Keyword-rule classification for incoming chat messages.
//!
//! This crate contains the pure, deterministic text-analysis pieces of the
//! auto-reply pipeline:
//!
//! - [`classify`] - intent, sentiment, language detection, and the
//!   needs-reply decision for one message
//! - [`detect_urgency`] - normal/important/emergency flag for inbound text
//! - [`infer_relationship`] - relationship category from the contact name
//!   and the tenant's own message history
//!
//! All rule families are immutable keyword tables (see [`keywords`]), so
//! adding a language or a phrase is a data change, not a code change. Every
//! function here is total over strings - no I/O, no failure modes.

mod classify;
pub mod keywords;
mod language;
mod matching;
mod relationship;
mod urgency;

pub use classify::{classify, ClassificationResult, Intent, Sentiment};
pub use language::{detect_language, Language};
pub use relationship::{infer_relationship, Relationship};
pub use urgency::{detect_urgency, Urgency};
