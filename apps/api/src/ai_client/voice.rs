//! Voice session adapter for Vapi-style telephony (`POST /call`).

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai_client::{
    check_status, http_client, read_json, AiError, VoiceSession, VoiceSessionRequest,
};

pub const DEFAULT_BASE_URL: &str = "https://api.vapi.ai";

#[derive(Debug, Clone)]
pub struct VoiceConfig {
    pub api_key: String,
    pub assistant_id: String,
    pub base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CallRequest<'a> {
    assistant_id: &'a str,
    customer: Customer<'a>,
}

#[derive(Debug, Serialize)]
struct Customer<'a> {
    number: &'a str,
}

#[derive(Debug, Deserialize)]
struct CallResponse {
    id: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Clone)]
pub struct VoiceSessionClient {
    client: Client,
    config: VoiceConfig,
}

impl VoiceSessionClient {
    pub fn new(config: VoiceConfig) -> Result<Self, AiError> {
        Ok(Self {
            client: http_client()?,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/call", self.config.base_url.trim_end_matches('/'))
    }

    pub async fn start(&self, request: &VoiceSessionRequest) -> Result<VoiceSession, AiError> {
        let body = CallRequest {
            assistant_id: &self.config.assistant_id,
            customer: Customer {
                number: &request.phone_number,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response, "voice provider").await?;

        let call: CallResponse = read_json(response, "voice provider").await?;
        info!(call_id = %call.id, "Voice session started");
        Ok(VoiceSession {
            id: call.id,
            status: call.status.unwrap_or_else(|| "queued".to_string()),
        })
    }
}
