//! LINE webhook payload types

use serde::Deserialize;

use crate::types::ChatEvent;

/// Body of a webhook delivery
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    /// Bot user id the delivery is addressed to
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One event in a delivery
///
/// Only the fields the bot reads are modelled; the rest are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub message: Option<EventMessage>,
    #[serde(default)]
    pub webhook_event_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Dispatch key for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TextMessage,
    /// Stickers, images, audio, location, ...
    OtherMessage,
    Follow,
    Unfollow,
    Join,
    Leave,
    Postback,
    Other,
}

impl WebhookEvent {
    pub fn kind(&self) -> EventKind {
        match self.event_type.as_str() {
            "message" => match &self.message {
                Some(m) if m.message_type == "text" => EventKind::TextMessage,
                _ => EventKind::OtherMessage,
            },
            "follow" => EventKind::Follow,
            "unfollow" => EventKind::Unfollow,
            "join" => EventKind::Join,
            "leave" => EventKind::Leave,
            "postback" => EventKind::Postback,
            _ => EventKind::Other,
        }
    }

    /// The chat event for a text message that can be replied to
    pub fn to_chat_event(&self) -> Option<ChatEvent> {
        if self.kind() != EventKind::TextMessage {
            return None;
        }
        let reply_token = self.reply_token.clone().filter(|t| !t.is_empty())?;
        let text = self.message.as_ref()?.text.clone()?;

        Some(ChatEvent {
            reply_token,
            text,
            user_id: self.source.as_ref().and_then(|s| s.user_id.clone()),
        })
    }
}
