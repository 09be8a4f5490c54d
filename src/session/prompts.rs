//! Prompt strategies and instruction templates.
//!
//! One turn-taking driver serves both interview styles; the strategy only
//! decides what the assistant asks next.

/// System instruction for interview reply calls. Asks the capability to
/// append the emotion tag the driver parses back out.
pub const INTERVIEW_INSTRUCTION: &str = "\
You are a supportive friend helping someone reflect on their day through a diary conversation.

Guidelines:
- Be warm, empathetic, and encouraging
- Ask thoughtful follow-up questions to help them express emotions
- Guide conversation naturally without being pushy
- Keep responses conversational and under 50 words
- At the end, also provide a brief emotion analysis in this format: EMOTION_ANALYSIS: [dominant_emotion] [intensity_0_to_1]

Example: \"That sounds really challenging. How did that make you feel in the moment? EMOTION_ANALYSIS: frustrated 0.7\"";

/// System instruction for the summarization call.
pub const SUMMARY_INSTRUCTION: &str = "\
Create a personal diary entry in first-person narrative style from this conversation.

Requirements:
- Write as if the user is personally writing their diary
- Include emotional highlights and key events
- Use 'I' statements throughout
- Keep it natural and reflective
- Write as one cohesive paragraph
- Capture the essence of their day and feelings";

/// Opening line of the free-form interview.
pub const OPENING_INVITATION: &str =
    "Hi! I'm here to help you reflect on your day. How are you feeling right now?";

/// Gentle re-prompt for empty input.
pub const REPROMPT: &str = "I'm listening... please share your thoughts.";

/// Shown in place of a reply when the generation capability fails.
pub const FALLBACK_REPLY: &str = "I'm having trouble responding right now. Could you try again?";

/// The fixed scripted interview questions.
pub fn default_questions() -> Vec<String> {
    [
        "Hi! How are you feeling today?",
        "What was the most memorable moment of your day?",
        "Is there anything that made you particularly happy or sad today?",
        "What thoughts have been on your mind lately?",
        "How did you spend most of your time today?",
        "Was there anything challenging you faced today?",
        "What are you grateful for today?",
        "Is there anything you're looking forward to?",
        "How would you describe your energy level today?",
        "What would you like to remember about today?",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// What the driver should present after an exchange completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPrompt {
    /// Present this scripted question next
    Ask(String),
    /// The generated reply already carries the conversation forward
    FollowGenerated,
    /// The script is exhausted; terminate the session
    Exhausted,
}

/// Decides what the assistant asks next; the transition rules are shared by
/// every strategy.
pub trait PromptStrategy: Send {
    /// Opening line of the session.
    fn begin(&mut self) -> String;

    /// Called after each completed exchange.
    fn advance(&mut self) -> NextPrompt;
}

/// Walks a fixed ordered list of diary prompts, one per exchange, and
/// terminates when the list is exhausted.
pub struct ScriptedPrompts {
    questions: Vec<String>,
    next: usize,
}

impl ScriptedPrompts {
    pub fn new(questions: Vec<String>) -> Self {
        Self { questions, next: 0 }
    }
}

impl Default for ScriptedPrompts {
    fn default() -> Self {
        Self::new(default_questions())
    }
}

impl PromptStrategy for ScriptedPrompts {
    fn begin(&mut self) -> String {
        self.next = 1;
        self.questions
            .first()
            .cloned()
            .unwrap_or_else(|| OPENING_INVITATION.to_string())
    }

    fn advance(&mut self) -> NextPrompt {
        match self.questions.get(self.next) {
            Some(question) => {
                self.next += 1;
                NextPrompt::Ask(question.clone())
            }
            None => NextPrompt::Exhausted,
        }
    }
}

/// Single open invitation with unscripted continuation.
#[derive(Debug, Default)]
pub struct OpenEnded;

impl PromptStrategy for OpenEnded {
    fn begin(&mut self) -> String {
        OPENING_INVITATION.to_string()
    }

    fn advance(&mut self) -> NextPrompt {
        NextPrompt::FollowGenerated
    }
}
