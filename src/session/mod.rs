//! Diary session management
//!
//! This module provides the conversation side of the pipeline:
//! - The append-only session transcript and its emotion aggregate
//! - The turn-taking conversation driver and its prompt strategies
//! - The interactive I/O surface (console or scripted for tests)
//! - The owning `DiarySession` that runs interview -> summary -> record

mod config;
mod driver;
mod io;
mod prompts;
mod session;
mod transcript;

pub use config::SessionConfig;
pub use driver::{is_termination, ConversationDriver};
pub use io::{ConsoleIo, UserIo};
pub use prompts::{
    default_questions, NextPrompt, OpenEnded, PromptStrategy, ScriptedPrompts,
    INTERVIEW_INSTRUCTION, OPENING_INVITATION, SUMMARY_INSTRUCTION,
};
pub use session::DiarySession;
pub use transcript::{Emotion, Speaker, Transcript, Turn};
