//! Transcript summarization: one generation call turns the session into a
//! first-person diary paragraph. Failure here must never prevent the raw
//! transcript from being persisted, so this returns fixed text instead of
//! an error.

use crate::gateway::{Gateway, GenerateRequest};
use crate::session::{Speaker, Transcript, SUMMARY_INSTRUCTION};
use std::fmt::Write as _;
use tracing::warn;

/// Returned for an empty transcript, without spending a call.
pub const NO_CONVERSATION_MESSAGE: &str = "No conversation to summarize today.";

/// Returned when the summarization call fails.
pub const SUMMARY_FAILURE_MESSAGE: &str = "Could not generate a diary entry due to an error.";

/// Render each turn as `<label>: <message>` in transcript order.
fn render(transcript: &Transcript) -> String {
    let mut text = String::new();
    for turn in transcript.turns() {
        let label = match turn.speaker {
            Speaker::User => "I said",
            Speaker::Assistant => "The AI asked",
        };
        let _ = writeln!(text, "{label}: {}", turn.message);
    }
    text
}

/// Summarize the session into one first-person narrative paragraph.
pub async fn summarize(gateway: &Gateway, transcript: &Transcript) -> String {
    if transcript.is_empty() {
        return NO_CONVERSATION_MESSAGE.to_string();
    }

    let request = GenerateRequest {
        system: SUMMARY_INSTRUCTION.to_string(),
        history: Vec::new(),
        user_message: format!(
            "Create a diary entry from this conversation:\n\n{}",
            render(transcript)
        ),
    };

    match gateway.generate_reply(&request).await {
        Ok(entry) => entry.trim().to_string(),
        Err(e) => {
            warn!(error = %e, "summarization failed, persisting transcript without it");
            SUMMARY_FAILURE_MESSAGE.to_string()
        }
    }
}
