use super::{CapabilityProvider, GenerateRequest};
use crate::audio::AudioClip;
use crate::config::ProviderConfig;
use crate::error::{DiaryError, Result};
use crate::session::Speaker;
use tracing::debug;

/// OpenAI-compatible capability provider.
///
/// Works with any endpoint that implements the OpenAI chat completions,
/// audio transcription, and speech APIs.
pub struct OpenAiProvider {
    config: ProviderConfig,
    api_key: String,
    http: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig, api_key: String) -> Self {
        Self {
            config,
            api_key,
            http: reqwest::Client::new(),
        }
    }

    fn build_messages(&self, request: &GenerateRequest) -> Vec<serde_json::Value> {
        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": request.system,
        })];

        for m in &request.history {
            messages.push(serde_json::json!({
                "role": match m.speaker {
                    Speaker::User => "user",
                    Speaker::Assistant => "assistant",
                },
                "content": m.content,
            }));
        }

        messages.push(serde_json::json!({
            "role": "user",
            "content": request.user_message,
        }));

        messages
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<reqwest::Response> {
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| DiaryError::Service(e.to_string()))?;

        check_status(resp).await
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(DiaryError::Service(format!("API error {}: {}", status, body)))
}

#[async_trait::async_trait]
impl CapabilityProvider for OpenAiProvider {
    async fn generate_reply(&self, request: &GenerateRequest) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let body = serde_json::json!({
            "model": self.config.chat_model,
            "max_tokens": self.config.max_tokens,
            "temperature": 0.7,
            "messages": self.build_messages(request),
        });

        debug!(model = %self.config.chat_model, "requesting reply");

        let resp_body: serde_json::Value = self
            .post_json(&url, &body)
            .await?
            .json()
            .await
            .map_err(|e| DiaryError::Service(e.to_string()))?;

        let content = resp_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                DiaryError::Service("chat response carried no message content".to_string())
            })?;

        Ok(content.trim().to_string())
    }

    async fn transcribe(&self, clip: &AudioClip) -> Result<String> {
        let url = format!("{}/v1/audio/transcriptions", self.config.base_url);
        let wav = clip.encode_wav()?;

        let part = reqwest::multipart::Part::bytes(wav)
            .file_name("utterance.wav")
            .mime_str("audio/wav")
            .map_err(|e| DiaryError::Service(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .text("model", self.config.transcription_model.clone())
            .text("language", self.config.language.clone())
            .part("file", part);

        debug!(
            model = %self.config.transcription_model,
            seconds = clip.duration_seconds(),
            "requesting transcription"
        );

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| DiaryError::Service(e.to_string()))?;

        let resp_body: serde_json::Value = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| DiaryError::Service(e.to_string()))?;

        let text = resp_body["text"].as_str().ok_or_else(|| {
            DiaryError::Service("transcription response carried no text".to_string())
        })?;

        Ok(text.trim().to_string())
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let url = format!("{}/v1/audio/speech", self.config.base_url);

        let body = serde_json::json!({
            "model": self.config.speech_model,
            "voice": self.config.voice,
            "input": text,
        });

        debug!(model = %self.config.speech_model, "requesting speech synthesis");

        let bytes = self
            .post_json(&url, &body)
            .await?
            .bytes()
            .await
            .map_err(|e| DiaryError::Service(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    fn name(&self) -> &str {
        "openai"
    }
}
