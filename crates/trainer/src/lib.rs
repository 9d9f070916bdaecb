//! Offline style trainer.
//!
//! Learns how a tenant actually texts from their own outgoing messages,
//! in two phases: a global analysis over recent history, then per-contact
//! analysis of the busiest conversations. The learned style is stored on
//! the personality profile and replaces any earlier training run.

mod error;
mod prompts;
mod stats;
mod trainer;

pub use error::TrainerError;
pub use trainer::{StyleTrainer, TrainerConfig, TrainingReport};
