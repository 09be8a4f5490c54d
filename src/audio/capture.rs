use crate::error::{DiaryError, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

/// A short buffer of mono 16-bit PCM samples from a capture backend.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

/// One complete captured utterance, ready for transcription.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Audio capture backend trait
///
/// Microphone access is an external collaborator; the built-in backend
/// reads from a WAV file (for testing and batch replay).
#[async_trait::async_trait]
pub trait AudioCapture: Send {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing audio
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Where voice input comes from.
#[derive(Debug, Clone)]
pub enum CaptureSource {
    /// Microphone input (requires a platform backend)
    Microphone,
    /// WAV file input (for testing/batch replay)
    File(PathBuf),
}

impl CaptureSource {
    pub fn create(self) -> Result<Box<dyn AudioCapture>> {
        match self {
            CaptureSource::Microphone => Err(DiaryError::AudioCapture(
                "no microphone backend is built in; use a file-based capture source".to_string(),
            )),
            CaptureSource::File(path) => Ok(Box::new(FileCapture::new(path))),
        }
    }
}

/// Capture backend that replays a WAV file as a stream of frames.
pub struct FileCapture {
    path: PathBuf,
    task: Option<JoinHandle<()>>,
    capturing: bool,
}

impl FileCapture {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            task: None,
            capturing: false,
        }
    }
}

// ~100ms of audio per frame at 16kHz
const FRAME_SAMPLES: usize = 1600;

#[async_trait::async_trait]
impl AudioCapture for FileCapture {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        let reader = hound::WavReader::open(&self.path)
            .map_err(|e| DiaryError::AudioCapture(format!("{}: {e}", self.path.display())))?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| DiaryError::AudioCapture(e.to_string()))?;

        // Mix stereo down to mono; transcription expects a single channel
        let mono: Vec<i16> = if spec.channels == 2 {
            samples
                .chunks_exact(2)
                .map(|pair| {
                    let sum = pair[0] as i32 + pair[1] as i32;
                    (sum / 2) as i16
                })
                .collect()
        } else {
            samples
        };

        info!(
            path = %self.path.display(),
            sample_rate = spec.sample_rate,
            samples = mono.len(),
            "replaying audio file as capture stream"
        );

        let sample_rate = spec.sample_rate;
        let (tx, rx) = mpsc::channel(16);

        self.task = Some(tokio::spawn(async move {
            for chunk in mono.chunks(FRAME_SAMPLES) {
                let frame = AudioFrame {
                    samples: chunk.to_vec(),
                    sample_rate,
                };
                if tx.send(frame).await.is_err() {
                    break;
                }
            }
        }));
        self.capturing = true;

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Voice input: gates capture between an explicit start (the caller invoking
/// [`VoiceInput::capture`]) and an explicit stop signal (the shared flag
/// flipped by a background listener).
pub struct VoiceInput {
    backend: Box<dyn AudioCapture>,
}

impl VoiceInput {
    pub fn new(backend: Box<dyn AudioCapture>) -> Self {
        Self { backend }
    }

    /// Capture one utterance, draining frames until the stop flag flips or
    /// the backend closes its stream. Returns `None` when nothing was
    /// captured (silence yields no transcript turn).
    pub async fn capture(&mut self, stop: Arc<AtomicBool>) -> Result<Option<AudioClip>> {
        let mut rx = self.backend.start().await?;

        let mut samples = Vec::new();
        let mut sample_rate = 16000;

        while let Some(frame) = rx.recv().await {
            sample_rate = frame.sample_rate;
            samples.extend(frame.samples);

            if stop.load(Ordering::SeqCst) {
                break;
            }
        }

        self.backend.stop().await?;

        if samples.is_empty() {
            Ok(None)
        } else {
            Ok(Some(AudioClip {
                samples,
                sample_rate,
            }))
        }
    }
}
