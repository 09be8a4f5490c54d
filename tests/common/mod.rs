// Shared test doubles: a scriptable capability provider, a scripted
// interactive surface, and a synthetic capture backend.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use voice_diary::audio::{AudioCapture, AudioClip, AudioFrame};
use voice_diary::gateway::{CapabilityProvider, GenerateRequest};
use voice_diary::session::UserIo;
use voice_diary::{DiaryError, Result};

pub const DEFAULT_REPLY: &str = "Okay, tell me more. EMOTION_ANALYSIS: calm 0.5";

/// Capability provider with scripted outcomes per capability. When a script
/// runs out, `generate_reply` falls back to [`DEFAULT_REPLY`] and the other
/// capabilities succeed with fixed values.
pub struct MockProvider {
    replies: Mutex<VecDeque<Result<String>>>,
    transcriptions: Mutex<VecDeque<Result<String>>>,
    pub attempts: Attempts,
}

/// Raw provider attempt counters, cloneable so tests can keep a handle
/// after the provider moves into a gateway.
#[derive(Clone, Default)]
pub struct Attempts {
    pub generate: Arc<AtomicUsize>,
    pub transcribe: Arc<AtomicUsize>,
    pub synthesize: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            transcriptions: Mutex::new(VecDeque::new()),
            attempts: Attempts::default(),
        }
    }

    pub fn with_replies(replies: Vec<Result<String>>) -> Self {
        let provider = Self::new();
        *provider.replies.lock().unwrap() = replies.into();
        provider
    }

    pub fn with_transcriptions(self, transcriptions: Vec<Result<String>>) -> Self {
        *self.transcriptions.lock().unwrap() = transcriptions.into();
        self
    }

    pub fn service_error() -> DiaryError {
        DiaryError::Service("mock capability failure".to_string())
    }
}

#[async_trait::async_trait]
impl CapabilityProvider for MockProvider {
    async fn generate_reply(&self, _request: &GenerateRequest) -> Result<String> {
        self.attempts.generate.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_REPLY.to_string()))
    }

    async fn transcribe(&self, _clip: &AudioClip) -> Result<String> {
        self.attempts.transcribe.fetch_add(1, Ordering::SeqCst);
        self.transcriptions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("transcribed speech".to_string()))
    }

    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        self.attempts.synthesize.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0u8; 16])
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Interactive surface fed from a fixed input script. Everything shown to
/// the user is collected for assertions; the stop signal fires immediately.
pub struct ScriptedIo {
    inputs: VecDeque<String>,
    shown: Arc<Mutex<Vec<String>>>,
}

impl ScriptedIo {
    pub fn new(inputs: &[&str]) -> (Self, Arc<Mutex<Vec<String>>>) {
        let shown = Arc::new(Mutex::new(Vec::new()));
        let io = Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            shown: Arc::clone(&shown),
        };
        (io, shown)
    }
}

#[async_trait::async_trait]
impl UserIo for ScriptedIo {
    async fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.shown.lock().unwrap().push(prompt.to_string());
        self.inputs.pop_front()
    }

    fn say(&mut self, line: &str) {
        self.shown.lock().unwrap().push(line.to_string());
    }

    fn arm_stop_signal(&mut self, stop: Arc<AtomicBool>) {
        stop.store(true, Ordering::SeqCst);
    }
}

/// Capture backend that emits a fixed number of synthetic frames and then
/// closes its stream.
pub struct MockCapture {
    pub frames: usize,
}

#[async_trait::async_trait]
impl AudioCapture for MockCapture {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        let (tx, rx) = mpsc::channel(4);
        let frames = self.frames;
        tokio::spawn(async move {
            for _ in 0..frames {
                let frame = AudioFrame {
                    samples: vec![100i16; 160],
                    sample_rate: 16000,
                };
                if tx.send(frame).await.is_err() {
                    break;
                }
            }
        });
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "mock"
    }
}
