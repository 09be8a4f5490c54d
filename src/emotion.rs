//! Emotion side-channel parsing.
//!
//! The interview instruction asks the generation capability to append a
//! structured tag after its conversational reply:
//!
//! ```text
//! That sounds really challenging. EMOTION_ANALYSIS: frustrated 0.7
//! ```
//!
//! Text before the marker is the displayed reply; the tail parses as
//! `<word> <float>`. A malformed tail is logged and dropped, never fatal.

use crate::error::{DiaryError, Result};
use crate::session::Emotion;
use tracing::warn;

/// Delimiter between the conversational reply and the emotion tag.
pub const EMOTION_MARKER: &str = "EMOTION_ANALYSIS:";

/// A generated reply split into its display text and optional emotion tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReply {
    pub text: String,
    pub emotion: Option<Emotion>,
}

/// Split a raw reply on the marker. Returns the trimmed display text and,
/// when the marker is present, the raw tail for [`parse_emotion`].
pub fn split_reply(raw: &str) -> (String, Option<&str>) {
    match raw.split_once(EMOTION_MARKER) {
        Some((head, tail)) => (head.trim().to_string(), Some(tail)),
        None => (raw.trim().to_string(), None),
    }
}

/// Parse the marker tail as `<dominant-word> <intensity-float>`.
/// Tokens past the first two are ignored.
pub fn parse_emotion(tail: &str) -> Result<Emotion> {
    let mut tokens = tail.split_whitespace();

    let dominant = tokens
        .next()
        .ok_or_else(|| DiaryError::MalformedReply(tail.to_string()))?;
    let intensity: f32 = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| DiaryError::MalformedReply(tail.to_string()))?;

    Ok(Emotion::new(dominant, intensity))
}

/// Split and parse a raw generated reply. A malformed tag degrades to
/// "no emotion recorded" with a warning.
pub fn parse_reply(raw: &str) -> ParsedReply {
    let (text, tail) = split_reply(raw);

    let emotion = tail.and_then(|tail| match parse_emotion(tail) {
        Ok(emotion) => Some(emotion),
        Err(e) => {
            warn!(error = %e, "dropping unparseable emotion tag");
            None
        }
    });

    ParsedReply { text, emotion }
}
