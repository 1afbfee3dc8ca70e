pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ai_client::handlers as ai;
use crate::catalog::handlers as catalog;
use crate::session::handlers as chat;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog API
        .route("/api/v1/catalog", get(catalog::handle_get_catalog))
        .route("/api/v1/match", post(catalog::handle_match))
        // Chat API
        .route("/api/v1/sessions", post(chat::handle_create_session))
        .route("/api/v1/sessions/:id", get(chat::handle_get_session))
        .route(
            "/api/v1/sessions/:id/messages",
            post(chat::handle_submit_message),
        )
        .route(
            "/api/v1/sessions/:id/reset",
            post(chat::handle_reset_session),
        )
        .route("/api/v1/history", get(chat::handle_history))
        // AI pass-through API
        .route("/api/v1/capabilities", get(ai::handle_capabilities))
        .route("/api/v1/ai/complete", post(ai::handle_complete))
        .route("/api/v1/ai/speech", post(ai::handle_speech))
        .route("/api/v1/ai/voice-sessions", post(ai::handle_voice_session))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use bytes::Bytes;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::ai_client::{
        AiCapabilities, AiError, CapabilitySet, Completion, ProviderAi, SpeechAudio,
        VoiceSession, VoiceSessionRequest,
    };
    use crate::assistant::classifier::IntentClassifier;
    use crate::assistant::extractor::FirstMatchExtractor;
    use crate::catalog::Catalog;
    use crate::session::controller::ChatController;
    use crate::session::store::InMemorySessionStore;

    struct FakeAi;

    #[async_trait]
    impl AiCapabilities for FakeAi {
        fn available(&self) -> CapabilitySet {
            CapabilitySet {
                text_completion: true,
                speech_synthesis: true,
                voice_session: true,
            }
        }

        async fn complete(&self, prompt: &str, _system: &str) -> Result<Completion, AiError> {
            Ok(Completion {
                text: format!("echo: {prompt}"),
                input_tokens: 1,
                output_tokens: 2,
            })
        }

        async fn synthesize_speech(&self, _text: &str) -> Result<SpeechAudio, AiError> {
            Ok(SpeechAudio {
                content_type: "audio/mpeg".to_string(),
                bytes: Bytes::from_static(b"ID3"),
            })
        }

        async fn start_voice_session(
            &self,
            _request: &VoiceSessionRequest,
        ) -> Result<VoiceSession, AiError> {
            Ok(VoiceSession {
                id: "call_1".to_string(),
                status: "queued".to_string(),
            })
        }
    }

    fn app_with(ai: Arc<dyn AiCapabilities>) -> Router {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let classifier = Arc::new(IntentClassifier::new(
            Arc::clone(&catalog),
            Arc::new(FirstMatchExtractor),
        ));
        let chat = ChatController::new(
            Arc::new(InMemorySessionStore::new()),
            classifier,
            Duration::ZERO,
        );
        build_router(AppState { catalog, chat, ai })
    }

    fn app() -> Router {
        app_with(Arc::new(ProviderAi::disabled()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health_reports_catalog_and_store() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["session_store"], "memory");
        assert!(body["catalog"]["branches"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_match_endpoint() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/match",
            Some(json!({"score": 185, "category": "bc"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "BC");
        let suggestions = body["suggestions"].as_array().unwrap();
        assert!(!suggestions.is_empty() && suggestions.len() <= 10);
        assert!(suggestions
            .iter()
            .all(|s| s["cutoff"].as_f64().unwrap() <= 185.0));
    }

    #[tokio::test]
    async fn test_match_rejects_unknown_category_and_negative_score() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/match",
            Some(json!({"score": 185, "category": "GEN"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/match",
            Some(json!({"score": -3, "category": "OC"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_flow_submit_reset_history() {
        let app = app();
        let (status, session) = send(&app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = session["id"].as_str().unwrap().to_string();

        let (status, exchange) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/messages"),
            Some(json!({"text": "I scored 185 marks in BC category"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(exchange["user"]["role"], "user");
        assert_eq!(exchange["assistant"]["role"], "assistant");
        assert_eq!(exchange["assistant"]["intent"], "score_query");
        assert!(!exchange["assistant"]["suggestions"]
            .as_array()
            .unwrap()
            .is_empty());

        let (_, stored) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(stored["turns"].as_array().unwrap().len(), 2);

        let (status, reset) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/reset"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reset["archived"]["title"], "I scored 185 marks in BC category");
        assert_ne!(reset["session"]["id"], json!(id));

        let (status, history) = send(&app, Method::GET, "/api/v1/history?limit=5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_greeting_reply_has_no_suggestions() {
        let app = app();
        let (_, session) = send(&app, Method::POST, "/api/v1/sessions", None).await;
        let id = session["id"].as_str().unwrap();
        let (_, exchange) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/messages"),
            Some(json!({"text": "hello 190 BC"})),
        )
        .await;
        assert_eq!(exchange["assistant"]["intent"], "greeting");
        assert!(exchange["assistant"].get("suggestions").is_none());
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let (status, body) = send(
            &app(),
            Method::POST,
            &format!("/api/v1/sessions/{}/messages", uuid::Uuid::new_v4()),
            Some(json!({"text": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_ai_endpoints_unavailable_without_providers() {
        let app = app();
        let (_, caps) = send(&app, Method::GET, "/api/v1/capabilities", None).await;
        assert_eq!(
            caps,
            json!({"text_completion": false, "speech_synthesis": false, "voice_session": false})
        );

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/ai/complete",
            Some(json!({"prompt": "Which branch is best?"})),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "CAPABILITY_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_ai_endpoints_forward_to_adapter() {
        let app = app_with(Arc::new(FakeAi));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/ai/complete",
            Some(json!({"prompt": "hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "echo: hi");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/ai/voice-sessions",
            Some(json!({"phone_number": "+914400000000"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "call_1");

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/ai/speech")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"text": "Welcome"}).to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "audio/mpeg"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ID3");
    }
}
