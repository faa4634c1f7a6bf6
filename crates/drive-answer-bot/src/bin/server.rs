//! Webhook server binary
//!
//! Run with: cargo run -p drive-answer-bot --bin drive-answer-bot-server

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

use drive_answer_bot::{
    config::RagConfig,
    providers::gcp::{GeminiClient, GoogleDriveSource},
    server::{state::AppState, RagServer},
    webhook::LineMessagingClient,
    RagComponents, RagSettings, RagState, RagStateManager,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Local development only; deployments set real environment variables
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drive_answer_bot=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var_os("RAG_CONFIG").map(PathBuf::from);
    let config = RagConfig::load(config_path.as_deref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Drive folder: {}", config.drive.folder_id.as_deref().unwrap_or("<unset>"));
    tracing::info!("  - Embedding model: {}", config.gemini.embedding_model);
    tracing::info!("  - Generation model: {}", config.gemini.generation_model);
    tracing::info!(
        "  - Chunking: {} / {} overlap, top {}",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap,
        config.retrieval.top_k
    );

    let gemini = Arc::new(GeminiClient::new(&config.gemini)?);
    let components = RagComponents {
        source: Arc::new(GoogleDriveSource::new(&config.drive)?),
        embedder: gemini.clone(),
        llm: gemini,
    };
    let manager = Arc::new(RagStateManager::new(RagSettings::from_config(&config), components)?);

    if let RagState::NotReady(reason) = manager.initialize().await {
        if config.startup.exit_on_failure {
            anyhow::bail!("Document index not ready: {}", reason);
        }
        tracing::warn!("Serving fallback replies until restarted");
    }

    let sender = Arc::new(LineMessagingClient::new(&config.line)?);
    let server = RagServer::new(AppState::new(config, manager, sender));

    println!("\nServer starting...");
    println!("  Webhook: http://{}/callback", server.address());
    println!("  Health:  http://{}/health", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
