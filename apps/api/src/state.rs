use std::sync::Arc;

use crate::ai_client::AiCapabilities;
use crate::catalog::Catalog;
use crate::session::controller::ChatController;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only for the life of the process.
    pub catalog: Arc<Catalog>,
    pub chat: ChatController,
    /// Dormant provider layer. Never consulted by the chat pipeline.
    pub ai: Arc<dyn AiCapabilities>,
}
