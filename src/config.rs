use crate::error::{DiaryError, Result};
use crate::session::SessionConfig;
use serde::Deserialize;

/// Environment variable supplying the capability-provider credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub diary: DiaryConfig,
}

/// Endpoint and model selection for the capability provider. The credential
/// itself never lives in the file; see [`Config::api_key`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub chat_model: String,
    pub transcription_model: String,
    pub speech_model: String,
    /// TTS voice name
    pub voice: String,
    /// Language hint for transcription
    pub language: String,
    pub max_tokens: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            transcription_model: "whisper-1".to_string(),
            speech_model: "tts-1".to_string(),
            voice: "nova".to_string(),
            language: "en".to_string(),
            max_tokens: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiaryConfig {
    /// Directory for persisted diary records
    pub output_dir: String,
}

impl Default for DiaryConfig {
    fn default() -> Self {
        Self {
            output_dir: "diary".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `<path>.toml` (optional; defaults apply when
    /// absent) with `VOICE_DIARY__*` environment overrides.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("VOICE_DIARY").separator("__"))
            .build()
            .map_err(|e| DiaryError::Configuration(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| DiaryError::Configuration(e.to_string()))
    }

    /// Read the provider credential from the environment. Absence fails
    /// fast, before any session state is created.
    pub fn api_key() -> Result<String> {
        match std::env::var(API_KEY_VAR) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(DiaryError::Configuration(format!(
                "{API_KEY_VAR} is not set; export your provider API key before starting a session"
            ))),
        }
    }
}
