//! Capability gateway
//!
//! Wraps the external text-generation, transcription, and speech-synthesis
//! capabilities behind one provider trait and enforces the per-session call
//! budget: a call at the limit is rejected before any external interaction,
//! and every completed call increments the shared counter by exactly one.

mod openai;

pub use openai::OpenAiProvider;

use crate::audio::AudioClip;
use crate::error::{DiaryError, Result};
use crate::session::{Speaker, Turn};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// One prior message in the rolling reply context.
#[derive(Debug, Clone)]
pub struct HistoryMessage {
    pub speaker: Speaker,
    pub content: String,
}

impl From<&Turn> for HistoryMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            speaker: turn.speaker,
            content: turn.message.clone(),
        }
    }
}

/// Request for one generation call. Each call site supplies its own system
/// instruction (interview guidance vs. summarization guidance).
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub system: String,
    pub history: Vec<HistoryMessage>,
    pub user_message: String,
}

/// The external capabilities, treated as black boxes.
///
/// Implementations report failures as [`DiaryError::Service`]; retry and
/// budget policy live in the [`Gateway`], not here.
#[async_trait::async_trait]
pub trait CapabilityProvider: Send + Sync {
    /// Generate a reply for the given context.
    async fn generate_reply(&self, request: &GenerateRequest) -> Result<String>;

    /// Transcribe mono PCM audio to text.
    async fn transcribe(&self, clip: &AudioClip) -> Result<String>;

    /// Synthesize speech for the given text, returning playable audio bytes.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Budget-enforcing front to a [`CapabilityProvider`].
///
/// The call counter is the only mutable state shared between the driver and
/// the gateway; it is updated exactly once per completed call and never
/// decremented.
pub struct Gateway {
    provider: Box<dyn CapabilityProvider>,
    max_calls: usize,
    calls_used: AtomicUsize,
}

impl Gateway {
    pub fn new(provider: Box<dyn CapabilityProvider>, max_calls: usize) -> Self {
        Self {
            provider,
            max_calls,
            calls_used: AtomicUsize::new(0),
        }
    }

    /// Number of completed capability calls so far.
    pub fn calls_used(&self) -> usize {
        self.calls_used.load(Ordering::SeqCst)
    }

    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    fn check_budget(&self) -> Result<()> {
        if self.calls_used() >= self.max_calls {
            return Err(DiaryError::BudgetExceeded {
                limit: self.max_calls,
            });
        }
        Ok(())
    }

    fn record_call(&self) {
        let used = self.calls_used.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(calls_used = used, max_calls = self.max_calls, "capability call completed");
    }

    /// One generation call. No retry; service errors surface to the call
    /// site, which substitutes its own fallback text.
    pub async fn generate_reply(&self, request: &GenerateRequest) -> Result<String> {
        self.check_budget()?;

        let reply = self.provider.generate_reply(request).await?;
        self.record_call();
        Ok(reply)
    }

    /// One transcription call, retried exactly once on service error before
    /// the failure surfaces (the driver then falls back to manual entry).
    pub async fn transcribe(&self, clip: &AudioClip) -> Result<String> {
        self.check_budget()?;

        let text = match self.provider.transcribe(clip).await {
            Ok(text) => text,
            Err(DiaryError::Service(e)) => {
                warn!(error = %e, "transcription failed, retrying once");
                self.provider.transcribe(clip).await?
            }
            Err(e) => return Err(e),
        };

        self.record_call();
        Ok(text)
    }

    /// One synthesis call. No retry; on failure the caller falls back to
    /// displaying text instead of audio.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        self.check_budget()?;

        let audio = self.provider.synthesize(text).await?;
        self.record_call();
        Ok(audio)
    }
}
