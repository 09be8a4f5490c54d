use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// Emotion tag attached to a user turn, or the per-session aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emotion {
    /// Dominant emotion word (e.g. "frustrated")
    pub dominant: String,

    /// Intensity in [0, 1]
    pub intensity: f32,
}

impl Emotion {
    pub fn new(dominant: impl Into<String>, intensity: f32) -> Self {
        Self {
            dominant: dominant.into(),
            intensity: intensity.clamp(0.0, 1.0),
        }
    }

    /// Aggregate used when no user turn carried an emotion tag.
    pub fn neutral() -> Self {
        Self::new("neutral", 0.5)
    }
}

/// One utterance in a session. Immutable once appended to a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,

    pub message: String,

    /// Creation instant; monotone within a session
    pub timestamp: DateTime<Utc>,

    /// Present only on user turns whose reply included a tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
}

impl Turn {
    pub fn user(message: impl Into<String>, emotion: Option<Emotion>) -> Self {
        Self {
            speaker: Speaker::User,
            message: message.into(),
            timestamp: Utc::now(),
            emotion,
        }
    }

    pub fn assistant(message: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            message: message.into(),
            timestamp: Utc::now(),
            emotion: None,
        }
    }
}

/// Append-only ordered log of turns, owned by one session.
///
/// Transcript order equals conversation order; turns are never reordered
/// or mutated after append.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The most recent `n` turns, used as rolling context for reply calls.
    pub fn last_turns(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Derive the session's aggregate emotion: mode of `dominant` over all
    /// tagged user turns and mean of `intensity`, rounded to two decimals.
    /// Ties on the mode break by earliest first appearance, so the result
    /// is deterministic for a given transcript.
    pub fn aggregate_emotion(&self) -> Emotion {
        let tagged: Vec<&Emotion> = self
            .turns
            .iter()
            .filter(|t| t.speaker == Speaker::User)
            .filter_map(|t| t.emotion.as_ref())
            .collect();

        if tagged.is_empty() {
            return Emotion::neutral();
        }

        // (label, count, first index) per dominant word
        let mut counts: Vec<(&str, usize, usize)> = Vec::new();
        for (idx, emotion) in tagged.iter().enumerate() {
            match counts.iter_mut().find(|(label, _, _)| *label == emotion.dominant) {
                Some(entry) => entry.1 += 1,
                None => counts.push((&emotion.dominant, 1, idx)),
            }
        }

        let dominant = counts
            .iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.2.cmp(&a.2)))
            .map(|(label, _, _)| label.to_string())
            .unwrap_or_else(|| "neutral".to_string());

        let mean = tagged.iter().map(|e| e.intensity).sum::<f32>() / tagged.len() as f32;
        let rounded = (mean * 100.0).round() / 100.0;

        Emotion::new(dominant, rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_of_untagged_transcript_is_neutral() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::user("hello", None));
        transcript.push(Turn::assistant("hi there"));

        assert_eq!(transcript.aggregate_emotion(), Emotion::neutral());
    }

    #[test]
    fn aggregate_ignores_assistant_turns() {
        let mut transcript = Transcript::new();
        let mut assistant = Turn::assistant("hi");
        // Transcripts loaded from disk could theoretically carry this; the
        // aggregate only ever counts user turns.
        assistant.emotion = Some(Emotion::new("happy", 1.0));
        transcript.push(Turn::user("hey", Some(Emotion::new("calm", 0.4))));
        transcript.push(assistant);

        let aggregate = transcript.aggregate_emotion();
        assert_eq!(aggregate.dominant, "calm");
        assert_eq!(aggregate.intensity, 0.4);
    }

    #[test]
    fn last_turns_clamps_to_available() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::user("one", None));
        transcript.push(Turn::assistant("two"));

        assert_eq!(transcript.last_turns(10).len(), 2);
        assert_eq!(transcript.last_turns(1)[0].message, "two");
    }

    #[test]
    fn intensity_is_clamped_to_unit_interval() {
        assert_eq!(Emotion::new("elated", 1.7).intensity, 1.0);
        assert_eq!(Emotion::new("flat", -0.2).intensity, 0.0);
    }
}
