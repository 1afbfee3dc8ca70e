//! Speech synthesis adapter for ElevenLabs-style `text-to-speech/{voice_id}` endpoints.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::ai_client::{check_status, http_client, AiError, SpeechAudio};

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io/v1";
const MODEL_ID: &str = "eleven_multilingual_v2";
const AUDIO_MPEG: &str = "audio/mpeg";

#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub api_key: String,
    pub voice_id: String,
    pub base_url: String,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

#[derive(Clone)]
pub struct SpeechClient {
    client: Client,
    config: SpeechConfig,
}

impl SpeechClient {
    pub fn new(config: SpeechConfig) -> Result<Self, AiError> {
        Ok(Self {
            client: http_client()?,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.voice_id
        )
    }

    pub async fn synthesize(&self, text: &str) -> Result<SpeechAudio, AiError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("xi-api-key", &self.config.api_key)
            .header(ACCEPT, AUDIO_MPEG)
            .json(&SpeechRequest {
                text,
                model_id: MODEL_ID,
            })
            .send()
            .await?;
        let response = check_status(response, "speech provider").await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(AUDIO_MPEG)
            .to_string();
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(AiError::EmptyContent);
        }

        debug!("Speech synthesized: {} bytes ({content_type})", bytes.len());
        Ok(SpeechAudio {
            content_type,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_includes_voice_id() {
        let client = SpeechClient::new(SpeechConfig {
            api_key: "k".to_string(),
            voice_id: "voice123".to_string(),
            base_url: format!("{DEFAULT_BASE_URL}/"),
        })
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://api.elevenlabs.io/v1/text-to-speech/voice123"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let json = serde_json::to_value(SpeechRequest {
            text: "Hello",
            model_id: MODEL_ID,
        })
        .unwrap();
        assert_eq!(json["text"], "Hello");
        assert_eq!(json["model_id"], MODEL_ID);
    }
}
