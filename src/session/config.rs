use serde::{Deserialize, Serialize};

/// Configuration for a diary session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum external capability calls per session
    /// Default: 100
    pub max_calls: usize,

    /// How many prior turns ride along as rolling context on reply calls
    pub context_turns: usize,

    /// Speak assistant replies aloud in voice mode
    pub speak_replies: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_calls: 100,
            context_turns: 6,
            speak_replies: true,
        }
    }
}
