/// AI Client: the single point of entry for third-party AI/voice providers.
///
/// ARCHITECTURAL RULE: the assistant and catalog modules never import this module.
/// Handlers reach providers only through `Arc<dyn AiCapabilities>`, so the core
/// runs fully offline.
///
/// Each provider call is a single attempt. Failures surface as `AiError`.
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub mod completion;
pub mod handlers;
pub mod prompts;
pub mod speech;
pub mod voice;

use completion::CompletionClient;
use speech::SpeechClient;
use voice::VoiceSessionClient;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    TextCompletion,
    SpeechSynthesis,
    VoiceSession,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Capability::TextCompletion => "Text completion",
            Capability::SpeechSynthesis => "Speech synthesis",
            Capability::VoiceSession => "Voice session",
        })
    }
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Provider returned empty content")]
    EmptyContent,

    #[error("{0} is not configured")]
    Unavailable(Capability),
}

/// Which capabilities have a provider configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CapabilitySet {
    pub text_completion: bool,
    pub speech_synthesis: bool,
    pub voice_session: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoiceSessionRequest {
    /// E.164 number to dial.
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSession {
    pub id: String,
    pub status: String,
}

#[async_trait]
pub trait AiCapabilities: Send + Sync {
    fn available(&self) -> CapabilitySet;

    async fn complete(&self, prompt: &str, system: &str) -> Result<Completion, AiError>;

    async fn synthesize_speech(&self, text: &str) -> Result<SpeechAudio, AiError>;

    async fn start_voice_session(
        &self,
        request: &VoiceSessionRequest,
    ) -> Result<VoiceSession, AiError>;
}

/// Composes whichever provider adapters are configured. Missing ones report
/// `AiError::Unavailable`.
#[derive(Clone, Default)]
pub struct ProviderAi {
    completion: Option<CompletionClient>,
    speech: Option<SpeechClient>,
    voice: Option<VoiceSessionClient>,
}

impl ProviderAi {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_completion(mut self, client: CompletionClient) -> Self {
        self.completion = Some(client);
        self
    }

    pub fn with_speech(mut self, client: SpeechClient) -> Self {
        self.speech = Some(client);
        self
    }

    pub fn with_voice(mut self, client: VoiceSessionClient) -> Self {
        self.voice = Some(client);
        self
    }
}

#[async_trait]
impl AiCapabilities for ProviderAi {
    fn available(&self) -> CapabilitySet {
        CapabilitySet {
            text_completion: self.completion.is_some(),
            speech_synthesis: self.speech.is_some(),
            voice_session: self.voice.is_some(),
        }
    }

    async fn complete(&self, prompt: &str, system: &str) -> Result<Completion, AiError> {
        self.completion
            .as_ref()
            .ok_or(AiError::Unavailable(Capability::TextCompletion))?
            .complete(prompt, system)
            .await
    }

    async fn synthesize_speech(&self, text: &str) -> Result<SpeechAudio, AiError> {
        self.speech
            .as_ref()
            .ok_or(AiError::Unavailable(Capability::SpeechSynthesis))?
            .synthesize(text)
            .await
    }

    async fn start_voice_session(
        &self,
        request: &VoiceSessionRequest,
    ) -> Result<VoiceSession, AiError> {
        self.voice
            .as_ref()
            .ok_or(AiError::Unavailable(Capability::VoiceSession))?
            .start(request)
            .await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared HTTP helpers
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn http_client() -> Result<Client, AiError> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Pulls a human-readable message out of a provider error body. Providers
/// disagree on the shape, so several common locations are tried.
pub(crate) fn provider_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    ["/error/message", "/detail/message", "/message", "/detail", "/error"]
        .iter()
        .find_map(|pointer| value.pointer(pointer).and_then(|v| v.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

/// Converts a non-2xx response into `AiError::Api`; passes successes through.
pub(crate) async fn check_status(response: Response, provider: &str) -> Result<Response, AiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = provider_error_message(&body);
    warn!("{provider} returned {status}: {message}");
    Err(AiError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Reads a success body and decodes it. Malformed JSON is `AiError::Parse`,
/// not a transport error.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    provider: &str,
) -> Result<T, AiError> {
    let body = response.text().await?;
    parse_json(&body, provider)
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &str, provider: &str) -> Result<T, AiError> {
    serde_json::from_str(body).map_err(|e| {
        warn!("{provider} returned an unreadable body: {e}");
        AiError::Parse(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_reports_nothing_available() {
        assert_eq!(ProviderAi::disabled().available(), CapabilitySet::default());
    }

    #[tokio::test]
    async fn test_disabled_calls_are_unavailable() {
        let ai = ProviderAi::disabled();
        assert!(matches!(
            ai.complete("hi", "sys").await,
            Err(AiError::Unavailable(Capability::TextCompletion))
        ));
        assert!(matches!(
            ai.synthesize_speech("hi").await,
            Err(AiError::Unavailable(Capability::SpeechSynthesis))
        ));
        let request = VoiceSessionRequest {
            phone_number: "+910000000000".to_string(),
        };
        assert!(matches!(
            ai.start_voice_session(&request).await,
            Err(AiError::Unavailable(Capability::VoiceSession))
        ));
    }

    #[test]
    fn test_available_reflects_configured_adapters() {
        let speech = SpeechClient::new(speech::SpeechConfig {
            api_key: "k".to_string(),
            voice_id: "v".to_string(),
            base_url: speech::DEFAULT_BASE_URL.to_string(),
        })
        .unwrap();
        let ai = ProviderAi::disabled().with_speech(speech);
        assert_eq!(
            ai.available(),
            CapabilitySet {
                text_completion: false,
                speech_synthesis: true,
                voice_session: false,
            }
        );
    }

    #[test]
    fn test_provider_error_message_shapes() {
        assert_eq!(
            provider_error_message(r#"{"error": {"message": "bad key"}}"#),
            "bad key"
        );
        assert_eq!(
            provider_error_message(r#"{"detail": {"status": "x", "message": "quota"}}"#),
            "quota"
        );
        assert_eq!(provider_error_message(r#"{"message": "nope"}"#), "nope");
        assert_eq!(provider_error_message("plain text"), "plain text");
        assert_eq!(provider_error_message(r#"{"other": 1}"#), r#"{"other": 1}"#);
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let result = parse_json::<VoiceSession>("<html>502 Bad Gateway</html>", "voice provider");
        assert!(matches!(result, Err(AiError::Parse(_))));

        let session: VoiceSession =
            parse_json(r#"{"id": "call_2", "status": "ringing"}"#, "voice provider").unwrap();
        assert_eq!(session.status, "ringing");
    }

    #[test]
    fn test_unavailable_message_names_capability() {
        let err = AiError::Unavailable(Capability::VoiceSession);
        assert_eq!(err.to_string(), "Voice session is not configured");
    }
}
