//! Webhook event handling and tenant fan-out.
//!
//! Parses the chat platform's `messages.upsert` payloads, decides whether
//! an event is a contact message (reply pipeline), an own message
//! (learning material), or noise, and processes it for every registered
//! tenant with per-tenant isolation and deadlines.

mod error;
mod listener;
pub mod payload;

pub use error::ListenerError;
pub use listener::{EventListener, EventSummary, ListenerConfig, TenantOutcome, TenantResult};
pub use payload::{parse_event, ParsedEvent, WebhookEvent};
