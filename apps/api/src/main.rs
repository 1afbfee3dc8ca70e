mod ai_client;
mod assistant;
mod catalog;
mod config;
mod errors;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai_client::completion::CompletionClient;
use crate::ai_client::speech::SpeechClient;
use crate::ai_client::voice::VoiceSessionClient;
use crate::ai_client::{AiCapabilities, ProviderAi};
use crate::assistant::classifier::IntentClassifier;
use crate::assistant::extractor::build_extractor;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::routes::build_router;
use crate::session::controller::ChatController;
use crate::session::redis_store::RedisSessionStore;
use crate::session::store::{InMemorySessionStore, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Admissions API v{}", env!("CARGO_PKG_VERSION"));

    // Load the cutoff catalog (read-only for the life of the process)
    let catalog = Arc::new(load_catalog(&config)?);
    info!(
        "Catalog loaded: {} colleges, {} branches",
        catalog.colleges().len(),
        catalog.branch_count()
    );
    if catalog.is_empty() {
        warn!("Catalog has no branches; every score query will report no match");
    }

    // Build the classifier with the configured extraction strategy
    let classifier = Arc::new(IntentClassifier::new(
        Arc::clone(&catalog),
        build_extractor(config.extraction_strategy),
    ));
    info!("Score extraction strategy: {}", classifier.extractor_name());

    // Session store: Redis when configured, in-memory otherwise
    let store: Arc<dyn SessionStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisSessionStore::open(url, config.session_ttl_secs)?),
        None => {
            info!("REDIS_URL not set, sessions are kept in memory");
            Arc::new(
                InMemorySessionStore::new()
                    .with_session_ttl(Duration::from_secs(config.session_ttl_secs)),
            )
        }
    };
    let chat = ChatController::new(store, classifier, config.reply_delay);

    // Optional AI providers (never consulted by the chat pipeline)
    let ai = build_ai(&config)?;
    info!("AI capabilities: {:?}", ai.available());

    let state = AppState {
        catalog,
        chat,
        ai: Arc::new(ai),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_catalog(config: &Config) -> Result<Catalog> {
    match &config.catalog_path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display())),
        None => Catalog::builtin().context("Bundled catalog is invalid"),
    }
}

fn build_ai(config: &Config) -> Result<ProviderAi> {
    let mut ai = ProviderAi::disabled();
    if let Some(c) = &config.completion {
        ai = ai.with_completion(CompletionClient::new(c.clone())?);
    }
    if let Some(c) = &config.speech {
        ai = ai.with_speech(SpeechClient::new(c.clone())?);
    }
    if let Some(c) = &config.voice {
        ai = ai.with_voice(VoiceSessionClient::new(c.clone())?);
    }
    Ok(ai)
}
