mod config;
mod errors;
mod evaluation;
mod llm_client;
mod marketplace;
mod models;
mod profiles;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::evaluation::session::SessionRegistry;
use crate::evaluation::summarizer::LlmBidSummarizer;
use crate::llm_client::LlmClient;
use crate::profiles::InMemoryProfileDirectory;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::MarketStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("atelier_api={}", &config.rust_log))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Atelier API v{}", env!("CARGO_PKG_VERSION"));

    // In-memory marketplace store and the profile collaborator over it
    let store = Arc::new(MarketStore::new());
    let profiles = Arc::new(InMemoryProfileDirectory::new(store.clone()));

    // LLM client and the summarization backend built on it
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let summarizer = Arc::new(LlmBidSummarizer::new(llm));

    // One evaluation session per job, opened lazily
    let sessions = Arc::new(SessionRegistry::new(
        summarizer,
        profiles.clone(),
        config.match_policy(),
        config.summarize_max_in_flight,
    ));
    info!(
        "Evaluation sessions ready (fallback prefix: {} chars, max in-flight: {})",
        config.cover_prefix_chars, config.summarize_max_in_flight
    );

    // Build app state
    let state = AppState {
        store,
        profiles,
        sessions,
        config,
    };

    let addr: SocketAddr = format!("0.0.0.0:{}", state.config.port).parse()?;

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
