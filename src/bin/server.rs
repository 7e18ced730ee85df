//! Document Q&A server binary
//!
//! Run with: cargo run --bin docchat-server

use docchat_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docchat_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; a missing MISTRAL_API_KEY is fatal here
    let config = RagConfig::from_env();
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Chat model: {}", config.llm.chat_model);
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Document store: {}", config.documents.storage_dir.display());
    tracing::info!("  - Default document: {}", config.documents.default_document);

    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /upload-document            - Upload a .txt/.md document");
    println!("  GET  /documents                  - List documents");
    println!("  POST /activate-document/:name    - Switch the active document");
    println!("  POST /ask                        - Ask a question");
    println!("  GET  /history                    - Conversation memory");
    println!("  POST /reset-memory               - Clear conversation memory");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
