//! Personality model and prompt construction for the auto-reply pipeline.
//!
//! A tenant's personality has two layers: manually configured traits
//! (tone, length, formality) and a [`LearnedStyle`] produced by the style
//! trainer from their real message history. [`build_reply_prompt`] folds
//! both layers - plus relationship, intent, sentiment, and conversation
//! history - into the single prompt sent to the language model.

mod model;
mod prompt;

pub use model::{contact_key, ContactStyle, LearnedStyle, PersonalityProfile};
pub use prompt::{build_reply_prompt, HistoryTurn};
