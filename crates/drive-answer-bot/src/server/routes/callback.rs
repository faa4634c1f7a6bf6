//! LINE webhook endpoint

use axum::{body::Bytes, extract::State, http::HeaderMap};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::webhook::WebhookPayload;

/// Verify, parse and dispatch one webhook delivery
///
/// Signature failure is the only non-200 outcome. Every accepted event is
/// handled before the response is sent.
pub async fn callback(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Result<&'static str> {
    let header = state.config().line.signature_header.as_str();
    let signature = headers
        .get(header)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::SignatureValidation(format!("missing {} header", header)))?;

    if let Err(e) = state.verifier().verify(&body, signature) {
        tracing::warn!("Rejected webhook delivery: {}", e);
        return Err(e);
    }

    let span = tracing::info_span!("delivery", id = %Uuid::new_v4());
    async {
        let payload: WebhookPayload = match serde_json::from_slice(&body) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Ignoring signed but malformed payload: {}", e);
                return;
            }
        };

        let handled = state.dispatcher().dispatch(&payload.events).await;
        tracing::info!("Handled {} of {} events", handled, payload.events.len());
    }
    .instrument(span)
    .await;

    Ok("OK")
}
