//! Event dispatch table

use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;

use super::client::ReplySender;
use super::events::{EventKind, WebhookEvent};
use crate::error::Result;
use crate::manager::RagStateManager;

/// Handles one kind of webhook event
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &WebhookEvent) -> Result<()>;
}

/// Routes events to the handler registered for their kind
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: HashMap<EventKind, Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The production table: text messages are answered, everything else is
    /// ignored
    pub fn with_defaults(manager: Arc<RagStateManager>, sender: Arc<dyn ReplySender>) -> Self {
        Self::new().register(
            EventKind::TextMessage,
            Arc::new(TextMessageHandler::new(manager, sender)),
        )
    }

    pub fn register(mut self, kind: EventKind, handler: Arc<dyn EventHandler>) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    pub fn handles(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Handle all events concurrently and wait for every one
    ///
    /// Handler errors are logged, never returned. Returns how many events
    /// had a handler.
    pub async fn dispatch(&self, events: &[WebhookEvent]) -> usize {
        let tasks: Vec<_> = events
            .iter()
            .filter_map(|event| {
                let kind = event.kind();
                match self.handlers.get(&kind) {
                    Some(handler) => Some(async move {
                        if let Err(e) = handler.handle(event).await {
                            tracing::error!(kind = e.kind(), "{:?} handler failed: {}", kind, e);
                        }
                    }),
                    None => {
                        tracing::debug!("No handler for {:?} event ({})", kind, event.event_type);
                        None
                    }
                }
            })
            .collect();

        let handled = tasks.len();
        join_all(tasks).await;
        handled
    }
}

/// Answers a text message from the document index and replies with it
pub struct TextMessageHandler {
    manager: Arc<RagStateManager>,
    sender: Arc<dyn ReplySender>,
}

impl TextMessageHandler {
    pub fn new(manager: Arc<RagStateManager>, sender: Arc<dyn ReplySender>) -> Self {
        Self { manager, sender }
    }
}

#[async_trait]
impl EventHandler for TextMessageHandler {
    async fn handle(&self, event: &WebhookEvent) -> Result<()> {
        let Some(chat) = event.to_chat_event() else {
            tracing::debug!("Text event without reply token or text; skipping");
            return Ok(());
        };

        tracing::info!(
            user = chat.user_id.as_deref().unwrap_or("unknown"),
            "Question received ({} chars)",
            chat.text.chars().count()
        );

        let answer = self.manager.answer(&chat.text).await;
        tracing::debug!(origin = ?answer.origin, "Replying");
        self.sender.reply(&chat.reply_token, &answer.text).await
    }
}
