//! LINE webhook handling: signature checks, event parsing and dispatch

mod client;
mod dispatch;
mod events;
mod signature;

pub use client::{truncate_reply, LineMessagingClient, ReplySender, MAX_REPLY_CHARS};
pub use dispatch::{EventDispatcher, EventHandler, TextMessageHandler};
pub use events::{EventKind, EventMessage, EventSource, WebhookEvent, WebhookPayload};
pub use signature::SignatureVerifier;
