mod analysis;
mod config;
mod errors;
mod llm_client;
mod routes;
mod similarity;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::normalizer::NormalizerConfig;
use crate::analysis::orchestrator::AnalysisEngine;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::similarity::{EmbeddingSimilarity, SimilarityProvider, TokenOverlapSimilarity};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resumatch API v{}", env!("CARGO_PKG_VERSION"));

    // Pick the similarity backend (embedding endpoint if configured,
    // deterministic token overlap otherwise)
    let similarity: Arc<dyn SimilarityProvider> = match &config.embeddings_url {
        Some(url) => {
            info!("Similarity backend: embedding endpoint at {url}");
            Arc::new(EmbeddingSimilarity::new(
                url.clone(),
                Duration::from_secs(config.similarity_timeout_secs),
            ))
        }
        None => {
            info!("Similarity backend: token overlap (no EMBEDDINGS_URL set)");
            Arc::new(TokenOverlapSimilarity)
        }
    };

    // Initialize the LLM client when an API key is present; enrichment is
    // skipped entirely otherwise
    let llm = config.anthropic_api_key.clone().map(LlmClient::new);
    match &llm {
        Some(_) => info!("LLM client initialized (model: {})", llm_client::MODEL),
        None => info!("No ANTHROPIC_API_KEY set — AI enrichment disabled"),
    }

    // Build the matching engine
    let engine = Arc::new(AnalysisEngine::new(
        NormalizerConfig::default(),
        similarity,
        llm,
        Duration::from_secs(config.enrichment_timeout_secs),
    ));

    // Build app state
    let state = AppState {
        config: config.clone(),
        engine,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
