//! Contract RAG server binary
//!
//! Run with: cargo run -p contract-rag --bin contract-rag-server
//! Set CONTRACT_RAG_CONFIG to a TOML file to override the defaults.

use contract_rag::{config::RagConfig, providers::EmbeddingProvider, server::RagServer};
use contract_rag::providers::OllamaEmbedder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contract_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RagConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!("  - Summary model: {}", config.llm.summarize_model());
    tracing::info!(
        "  - Chunk size: {} (overlap {})",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Chunk store: {}", config.storage.database_path.display());

    // Check Ollama
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    if OllamaEmbedder::new(&config.llm)?.health_check().await? {
        tracing::info!("Ollama is running");
    } else {
        tracing::warn!("Ollama not available at {}", config.llm.base_url);
        tracing::warn!(
            "Start it with `ollama serve` and pull {} and {}",
            config.llm.embed_model,
            config.llm.generate_model
        );
    }

    let server = RagServer::new(config)?;
    tracing::info!("Health: http://{}/health", server.address());

    server.start().await?;

    Ok(())
}
