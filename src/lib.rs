pub mod audio;
pub mod config;
pub mod emotion;
pub mod error;
pub mod gateway;
pub mod persist;
pub mod session;
pub mod summary;

pub use audio::{AudioCapture, AudioClip, AudioFrame, CaptureSource, FileCapture, VoiceInput};
pub use config::{Config, DiaryConfig, ProviderConfig};
pub use error::{DiaryError, Result};
pub use gateway::{CapabilityProvider, Gateway, GenerateRequest, HistoryMessage, OpenAiProvider};
pub use persist::DiaryRecord;
pub use session::{
    ConsoleIo, ConversationDriver, DiarySession, Emotion, OpenEnded, PromptStrategy,
    ScriptedPrompts, SessionConfig, Speaker, Transcript, Turn, UserIo,
};
pub use summary::summarize;
