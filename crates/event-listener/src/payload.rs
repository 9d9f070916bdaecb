//! Webhook payload types and message extraction.
//!
//! The gateway posts `messages.upsert` events in the WhatsApp wire shape:
//! nested `data.key` routing fields plus a `data.message` body whose text
//! can live in several places depending on the message kind.

use orchestrator::{InboundMessage, MessageKind};
use serde::Deserialize;

/// The only event kind that carries chat messages.
pub const MESSAGE_EVENT: &str = "messages.upsert";

const GROUP_JID_SUFFIX: &str = "@g.us";
const USER_JID_SUFFIX: &str = "@s.whatsapp.net";

/// Top-level webhook body.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub instance: Option<String>,
    #[serde(default)]
    pub data: Option<EventData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventData {
    #[serde(default)]
    pub key: Option<MessageKey>,
    /// Sender's display name. For own messages this is the tenant's own
    /// name, not the contact's.
    #[serde(default)]
    pub push_name: Option<String>,
    #[serde(default)]
    pub message: Option<MessageContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageKey {
    #[serde(default)]
    pub remote_jid: String,
    #[serde(default)]
    pub from_me: bool,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageContent {
    #[serde(default)]
    pub conversation: Option<String>,
    #[serde(default)]
    pub extended_text_message: Option<ExtendedText>,
    #[serde(default)]
    pub image_message: Option<MediaMessage>,
    #[serde(default)]
    pub video_message: Option<MediaMessage>,
    #[serde(default)]
    pub audio_message: Option<MediaMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtendedText {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaMessage {
    #[serde(default)]
    pub caption: Option<String>,
}

impl MessageContent {
    /// Usable text, wherever the wire format put it: plain body, extended
    /// text, or a media caption.
    pub fn text(&self) -> Option<String> {
        let candidates = [
            self.conversation.as_deref(),
            self.extended_text_message.as_ref().and_then(|e| e.text.as_deref()),
            self.image_message.as_ref().and_then(|m| m.caption.as_deref()),
            self.video_message.as_ref().and_then(|m| m.caption.as_deref()),
        ];
        candidates
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_string)
    }

    /// Voice notes are their own kind; video is treated as image since
    /// neither gets transcribed.
    pub fn kind(&self) -> MessageKind {
        if self.image_message.is_some() || self.video_message.is_some() {
            MessageKind::Image
        } else if self.audio_message.is_some() {
            MessageKind::Voice
        } else {
            MessageKind::Text
        }
    }

    pub fn has_media(&self) -> bool {
        self.image_message.is_some()
            || self.video_message.is_some()
            || self.audio_message.is_some()
    }
}

/// Routing decision for one webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedEvent {
    /// Nothing to do; carries a stable reason string for the response.
    Ignored(&'static str),
    /// A contact wrote to the tenant's number.
    FromContact(InboundMessage),
    /// The tenant wrote from their own device: learning material.
    FromTenant {
        contact_id: String,
        text: String,
        kind: MessageKind,
    },
}

/// Decide what an event is and extract the message from it.
///
/// Group chats, non-message events, numberless JIDs, and empty non-media
/// payloads are ignored. Own media-only messages are ignored too; there
/// is no style to learn from a bare photo.
pub fn parse_event(event: &WebhookEvent) -> ParsedEvent {
    if event.event != MESSAGE_EVENT {
        return ParsedEvent::Ignored("unsupported_event");
    }
    let Some(data) = &event.data else {
        return ParsedEvent::Ignored("no_data");
    };
    let Some(key) = &data.key else {
        return ParsedEvent::Ignored("no_key");
    };
    if key.remote_jid.ends_with(GROUP_JID_SUFFIX) {
        return ParsedEvent::Ignored("group");
    }
    let contact_id = key.remote_jid.trim_end_matches(USER_JID_SUFFIX).to_string();
    if contact_id.is_empty() {
        return ParsedEvent::Ignored("no_number");
    }

    let content = data.message.clone().unwrap_or_default();
    let text = content.text();
    if text.is_none() && !content.has_media() {
        return ParsedEvent::Ignored("empty");
    }

    if key.from_me {
        return match text {
            Some(text) => ParsedEvent::FromTenant {
                contact_id,
                text,
                kind: content.kind(),
            },
            None => ParsedEvent::Ignored("own_media"),
        };
    }

    let media_only = text.is_none();
    ParsedEvent::FromContact(InboundMessage {
        contact_id,
        contact_name: data.push_name.clone().filter(|n| !n.trim().is_empty()),
        text: text.unwrap_or_default(),
        kind: content.kind(),
        media_only,
    })
}
