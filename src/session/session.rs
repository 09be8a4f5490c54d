use super::config::SessionConfig;
use super::driver::ConversationDriver;
use super::io::UserIo;
use super::prompts::PromptStrategy;
use crate::audio::VoiceInput;
use crate::gateway::{CapabilityProvider, Gateway};
use crate::persist::DiaryRecord;
use crate::summary;
use chrono::Utc;
use tracing::info;

/// One diary session: owns the gateway (and with it the call budget) and
/// runs the interview -> summarize -> record pipeline. Created at program
/// start, destroyed at program end; only its derived record is persisted.
pub struct DiarySession {
    config: SessionConfig,
    gateway: Gateway,
}

impl DiarySession {
    pub fn new(provider: Box<dyn CapabilityProvider>, config: SessionConfig) -> Self {
        let gateway = Gateway::new(provider, config.max_calls);
        Self { config, gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Drive the conversation to termination, summarize whatever transcript
    /// exists (budget exhaustion included), and build the day's record.
    pub async fn run(
        self,
        io: Box<dyn UserIo>,
        prompts: Box<dyn PromptStrategy>,
        voice: Option<VoiceInput>,
    ) -> DiaryRecord {
        info!(max_calls = self.config.max_calls, "starting diary session");

        let driver =
            ConversationDriver::new(&self.gateway, self.config.clone(), io, prompts, voice);
        let transcript = driver.run().await;

        let summary = summary::summarize(&self.gateway, &transcript).await;

        DiaryRecord::build(
            Utc::now().date_naive(),
            transcript,
            summary,
            self.gateway.calls_used(),
        )
    }
}
