//! Application state for the webhook server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::manager::RagStateManager;
use crate::webhook::{EventDispatcher, ReplySender, SignatureVerifier};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Document index lifecycle, initialized before the server starts
    manager: Arc<RagStateManager>,
    /// Webhook signature verifier (channel secret)
    verifier: SignatureVerifier,
    /// Event handlers by kind
    dispatcher: EventDispatcher,
}

impl AppState {
    /// Create state with the default dispatch table
    pub fn new(config: RagConfig, manager: Arc<RagStateManager>, sender: Arc<dyn ReplySender>) -> Self {
        let dispatcher = EventDispatcher::with_defaults(Arc::clone(&manager), sender);
        Self::with_dispatcher(config, manager, dispatcher)
    }

    /// Create state with a custom dispatch table
    pub fn with_dispatcher(config: RagConfig, manager: Arc<RagStateManager>, dispatcher: EventDispatcher) -> Self {
        let verifier = SignatureVerifier::new(config.line.channel_secret.expose());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                manager,
                verifier,
                dispatcher,
            }),
        }
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn manager(&self) -> &RagStateManager {
        &self.inner.manager
    }

    pub fn verifier(&self) -> &SignatureVerifier {
        &self.inner.verifier
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.inner.dispatcher
    }

    /// Check if the document index is ready
    pub fn is_ready(&self) -> bool {
        self.inner.manager.is_ready()
    }
}
