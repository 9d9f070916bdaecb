//! Terminal outcomes of the per-message state machine.

use serde::Serialize;

/// Why an inbound message was stored but not replied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Media-only message with no usable text.
    Media,
    /// The tenant has auto-reply switched off.
    Disabled,
    /// Acknowledgement or farewell; replying would be noise.
    NoReplyNeeded,
    /// Emergency escalated to the tenant instead of an automated reply.
    Emergency,
    /// A reply already went out to this conversation within the window.
    Cooldown,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Media => "media",
            SkipReason::Disabled => "disabled",
            SkipReason::NoReplyNeeded => "no_reply_needed",
            SkipReason::Emergency => "emergency",
            SkipReason::Cooldown => "cooldown",
        }
    }
}

/// How processing of one inbound message ended.
///
/// The message itself is stored in every case; this only describes what
/// happened after storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ReplyOutcome {
    /// Stored, no reply attempted.
    Skipped { reason: SkipReason },
    /// Reply generated and dispatched successfully.
    Sent { reply: String },
    /// Reply generated but the gateway dispatch failed. The reply text is
    /// not persisted as a bot message.
    SendFailed { reason: String },
}

impl ReplyOutcome {
    pub fn skipped(reason: SkipReason) -> Self {
        ReplyOutcome::Skipped { reason }
    }
}
