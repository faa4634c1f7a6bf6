//! Reply delivery to the LINE Messaging API

use async_trait::async_trait;
use std::time::Duration;

use crate::config::{LineConfig, Secret};
use crate::error::{Error, Result};

/// LINE rejects text messages longer than this many characters
pub const MAX_REPLY_CHARS: usize = 5000;

/// Trait for sending a reply to a chat event
///
/// Implementations:
/// - `LineMessagingClient`: LINE reply API
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<()>;
}

/// LINE Messaging API client
pub struct LineMessagingClient {
    client: reqwest::Client,
    endpoint: String,
    access_token: Secret,
}

impl LineMessagingClient {
    pub fn new(config: &LineConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/v2/bot/message/reply",
                config.api_base_url.trim_end_matches('/')
            ),
            access_token: config.channel_access_token.clone(),
        })
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: Vec<TextMessage>,
}

#[derive(serde::Serialize)]
struct TextMessage {
    #[serde(rename = "type")]
    message_type: &'static str,
    text: String,
}

/// Cut text to the platform limit on a character boundary
pub fn truncate_reply(text: &str) -> String {
    match text.char_indices().nth(MAX_REPLY_CHARS) {
        Some((byte, _)) => text[..byte].to_string(),
        None => text.to_string(),
    }
}

#[async_trait]
impl ReplySender for LineMessagingClient {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<()> {
        let request = ReplyRequest {
            reply_token,
            messages: vec![TextMessage {
                message_type: "text",
                text: truncate_reply(text),
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.access_token.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Messaging(format!("Reply request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Messaging(format!("Reply rejected ({}): {}", status, body)));
        }
        Ok(())
    }
}
