//! Reply pipeline for inbound contact messages.
//!
//! Drives the per-message state machine: store the message, run the skip
//! rules (media, disabled tenant, no reply needed, emergency escalation,
//! cooldown), then classify, build the personality prompt, call the
//! model (or fall back to a deterministic canned reply), dispatch through
//! the gateway, and persist the bot reply.
//!
//! The two seams are [`ReplyGateway`] (outbound transport) and
//! `llm_client::TextGenerator` (model client); both are trait objects in
//! production and fakes in tests.

mod error;
mod fallback;
mod gateway;
mod locks;
mod orchestrator;
mod outcome;

pub use error::OrchestratorError;
pub use fallback::{fallback_reply, DEFAULT_FALLBACK};
pub use gateway::{LoggingGateway, NoOpGateway, ReplyGateway};
pub use orchestrator::{
    InboundMessage, MessageKind, OrchestratorConfig, ReplyOrchestrator,
};
pub use outcome::{ReplyOutcome, SkipReason};
