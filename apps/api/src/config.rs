use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::ai_client::completion::{self, CompletionConfig};
use crate::ai_client::speech::{self, SpeechConfig};
use crate::ai_client::voice::{self, VoiceConfig};
use crate::assistant::extractor::ExtractionStrategy;

const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60 * 24;

/// Application configuration loaded from environment variables.
/// Everything has a default; AI providers are enabled only when their key is set.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Catalog JSON to load instead of the bundled one.
    pub catalog_path: Option<PathBuf>,
    pub extraction_strategy: ExtractionStrategy,
    pub reply_delay: Duration,
    /// Redis-backed sessions when set; in-memory otherwise.
    pub redis_url: Option<String>,
    pub session_ttl_secs: u64,
    pub completion: Option<CompletionConfig>,
    pub speech: Option<SpeechConfig>,
    pub voice: Option<VoiceConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let completion = var("OPENAI_API_KEY").map(|api_key| CompletionConfig {
            api_key,
            base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| completion::DEFAULT_BASE_URL.to_string()),
            model: var("OPENAI_MODEL").unwrap_or_else(|| completion::DEFAULT_MODEL.to_string()),
        });

        let speech = match (var("ELEVENLABS_API_KEY"), var("ELEVENLABS_VOICE_ID")) {
            (Some(api_key), Some(voice_id)) => Some(SpeechConfig {
                api_key,
                voice_id,
                base_url: var("ELEVENLABS_BASE_URL")
                    .unwrap_or_else(|| speech::DEFAULT_BASE_URL.to_string()),
            }),
            (Some(_), None) => {
                return Err(anyhow!(
                    "ELEVENLABS_VOICE_ID must be set when ELEVENLABS_API_KEY is set"
                ))
            }
            _ => None,
        };

        let voice = match (var("VAPI_API_KEY"), var("VAPI_ASSISTANT_ID")) {
            (Some(api_key), Some(assistant_id)) => Some(VoiceConfig {
                api_key,
                assistant_id,
                base_url: var("VAPI_BASE_URL").unwrap_or_else(|| voice::DEFAULT_BASE_URL.to_string()),
            }),
            (Some(_), None) => {
                return Err(anyhow!(
                    "VAPI_ASSISTANT_ID must be set when VAPI_API_KEY is set"
                ))
            }
            _ => None,
        };

        Ok(Config {
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            catalog_path: var("CATALOG_PATH").map(PathBuf::from),
            extraction_strategy: var("EXTRACTION_STRATEGY")
                .map(|s| s.parse::<ExtractionStrategy>())
                .transpose()
                .map_err(|e| anyhow!("EXTRACTION_STRATEGY is invalid: {e}"))?
                .unwrap_or_default(),
            reply_delay: Duration::from_millis(
                var("REPLY_DELAY_MS")
                    .unwrap_or_else(|| "0".to_string())
                    .parse::<u64>()
                    .context("REPLY_DELAY_MS must be a non-negative integer")?,
            ),
            redis_url: var("REDIS_URL"),
            session_ttl_secs: var("SESSION_TTL_SECS")
                .map(|s| s.parse::<u64>())
                .transpose()
                .context("SESSION_TTL_SECS must be a non-negative integer")?
                .unwrap_or(DEFAULT_SESSION_TTL_SECS),
            completion,
            speech,
            voice,
        })
    }
}
