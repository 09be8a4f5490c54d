use super::config::SessionConfig;
use super::io::UserIo;
use super::prompts::{self, NextPrompt, PromptStrategy};
use super::transcript::{Transcript, Turn};
use crate::audio::{self, VoiceInput};
use crate::emotion::{self, ParsedReply};
use crate::error::{DiaryError, Result};
use crate::gateway::{Gateway, GenerateRequest, HistoryMessage};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

/// Inputs that always end the session, regardless of prompt position.
const TERMINATION_KEYWORDS: &[&str] = &["quit", "exit", "done", "q"];

pub fn is_termination(input: &str) -> bool {
    TERMINATION_KEYWORDS
        .iter()
        .any(|keyword| input.eq_ignore_ascii_case(keyword))
}

enum Input {
    Message(String),
    Terminate,
}

/// The turn-taking state machine: prompts the user, obtains input (text or
/// voice), requests a reply, parses the emotion side channel out of it, and
/// appends both turns to the transcript.
///
/// States: AwaitingInput -> RequestingReply -> PresentingReply ->
/// (AwaitingInput | Terminated). Empty input stays in AwaitingInput and
/// consumes no budget; termination keywords, an exhausted script, or a
/// budget rejection terminate.
pub struct ConversationDriver<'a> {
    gateway: &'a Gateway,
    config: SessionConfig,
    io: Box<dyn UserIo>,
    prompts: Box<dyn PromptStrategy>,
    voice: Option<VoiceInput>,
    transcript: Transcript,
}

impl<'a> ConversationDriver<'a> {
    pub fn new(
        gateway: &'a Gateway,
        config: SessionConfig,
        io: Box<dyn UserIo>,
        prompts: Box<dyn PromptStrategy>,
        voice: Option<VoiceInput>,
    ) -> Self {
        Self {
            gateway,
            config,
            io,
            prompts,
            voice,
            transcript: Transcript::new(),
        }
    }

    /// Run the interview to termination and yield the transcript. Transient
    /// capability failures never escape this loop.
    pub async fn run(mut self) -> Transcript {
        let opening = self.prompts.begin();
        if self.present(&opening).await.is_err() {
            self.budget_notice();
            return self.transcript;
        }

        loop {
            let message = match self.obtain_input().await {
                Input::Message(message) => message,
                Input::Terminate => break,
            };

            let reply = match self.exchange(message).await {
                Ok(reply) => reply,
                Err(_) => {
                    self.budget_notice();
                    break;
                }
            };

            if self.present(&reply).await.is_err() {
                self.budget_notice();
                break;
            }

            match self.prompts.advance() {
                NextPrompt::FollowGenerated => {}
                NextPrompt::Ask(question) => {
                    if self.present(&question).await.is_err() {
                        self.budget_notice();
                        break;
                    }
                }
                NextPrompt::Exhausted => {
                    self.io.say("\nAI: Thank you for sharing with me today.");
                    break;
                }
            }
        }

        info!(
            turns = self.transcript.len(),
            calls_used = self.gateway.calls_used(),
            "conversation finished"
        );
        self.transcript
    }

    fn budget_notice(&mut self) {
        self.io.say(&format!(
            "We've reached this session's call budget ({} calls). Let's wrap up here.",
            self.gateway.max_calls()
        ));
    }

    /// AwaitingInput: loop until a usable message or a termination signal.
    /// Blank input re-prompts without advancing state or spending budget.
    async fn obtain_input(&mut self) -> Input {
        loop {
            if self.voice.is_none() {
                match self.read_message("\nYou: ").await {
                    ReadOutcome::Message(message) => return Input::Message(message),
                    ReadOutcome::Terminate => return Input::Terminate,
                    ReadOutcome::Blank => continue,
                }
            }

            // Voice mode: one chooser round per exchange
            let choice = match self
                .io
                .read_line("\nEnter 'v' for voice, 't' for text, or 'quit' to end: ")
                .await
            {
                Some(line) => line.trim().to_lowercase(),
                None => return Input::Terminate,
            };

            if choice.is_empty() {
                self.io.say(prompts::REPROMPT);
                continue;
            }
            if is_termination(&choice) {
                return Input::Terminate;
            }

            match choice.as_str() {
                "t" => match self.read_message("You: ").await {
                    ReadOutcome::Message(message) => return Input::Message(message),
                    ReadOutcome::Terminate => return Input::Terminate,
                    ReadOutcome::Blank => continue,
                },
                "v" => match self.voice_input().await {
                    Ok(Some(text)) => {
                        if is_termination(text.trim()) {
                            return Input::Terminate;
                        }
                        self.io.say(&format!("You: {text}"));
                        return Input::Message(text);
                    }
                    Ok(None) => continue,
                    // Budget rejection during transcription
                    Err(_) => {
                        self.budget_notice();
                        return Input::Terminate;
                    }
                },
                _ => self.io.say("Please enter 'v', 't', or 'quit'."),
            }
        }
    }

    async fn read_message(&mut self, prompt: &str) -> ReadOutcome {
        match self.io.read_line(prompt).await {
            None => ReadOutcome::Terminate,
            Some(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    self.io.say(prompts::REPROMPT);
                    ReadOutcome::Blank
                } else if is_termination(trimmed) {
                    ReadOutcome::Terminate
                } else {
                    ReadOutcome::Message(trimmed.to_string())
                }
            }
        }
    }

    /// Capture and transcribe one utterance. Capture failures and empty
    /// captures degrade to `None`; transcription failure (after the
    /// gateway's one retry) falls back to manual text entry. Only a budget
    /// rejection propagates.
    async fn voice_input(&mut self) -> Result<Option<String>> {
        let Some(voice) = self.voice.as_mut() else {
            return Ok(None);
        };

        self.io.say("Recording... press ENTER to stop.");
        let stop = Arc::new(AtomicBool::new(false));
        self.io.arm_stop_signal(Arc::clone(&stop));

        let clip = match voice.capture(stop).await {
            Ok(Some(clip)) if !clip.is_empty() => clip,
            Ok(_) => {
                self.io.say("I didn't catch anything there.");
                return Ok(None);
            }
            Err(e) => {
                warn!(error = %e, "audio capture failed");
                self.io
                    .say("I couldn't access the recorder. Let's try again or use text.");
                return Ok(None);
            }
        };

        match self.gateway.transcribe(&clip).await {
            Ok(text) if !text.trim().is_empty() => Ok(Some(text.trim().to_string())),
            Ok(_) => {
                self.io.say("I didn't catch anything there.");
                Ok(None)
            }
            Err(e @ DiaryError::BudgetExceeded { .. }) => Err(e),
            Err(e) => {
                warn!(error = %e, "transcription failed twice, asking for manual entry");
                self.io.say("I couldn't transcribe that.");
                match self.io.read_line("Type your message: ").await {
                    Some(line) if !line.trim().is_empty() => Ok(Some(line.trim().to_string())),
                    _ => Ok(None),
                }
            }
        }
    }

    /// RequestingReply: one generation call over the rolling context, then
    /// both turns appended, user first. Service failure degrades to the
    /// fixed fallback reply; only a budget rejection propagates.
    async fn exchange(&mut self, message: String) -> Result<String> {
        let request = GenerateRequest {
            system: prompts::INTERVIEW_INSTRUCTION.to_string(),
            history: self
                .transcript
                .last_turns(self.config.context_turns)
                .iter()
                .map(HistoryMessage::from)
                .collect(),
            user_message: message.clone(),
        };

        let parsed = match self.gateway.generate_reply(&request).await {
            Ok(raw) => emotion::parse_reply(&raw),
            Err(e @ DiaryError::BudgetExceeded { .. }) => return Err(e),
            Err(e) => {
                warn!(error = %e, "reply generation failed, using fallback reply");
                ParsedReply {
                    text: prompts::FALLBACK_REPLY.to_string(),
                    emotion: None,
                }
            }
        };

        self.transcript
            .push(Turn::user(message, parsed.emotion.clone()));
        self.transcript.push(Turn::assistant(parsed.text.clone()));

        Ok(parsed.text)
    }

    /// PresentingReply: show the line, and in voice mode speak it too.
    /// Synthesis service failure or playback failure degrades to the text
    /// already shown; only a budget rejection propagates.
    async fn present(&mut self, text: &str) -> Result<()> {
        self.io.say(&format!("\nAI: {text}"));

        if self.voice.is_some() && self.config.speak_replies {
            match self.gateway.synthesize(text).await {
                Ok(bytes) => {
                    if let Err(e) = audio::play(&bytes).await {
                        warn!(error = %e, "audio playback failed, text already shown");
                    }
                }
                Err(e @ DiaryError::BudgetExceeded { .. }) => return Err(e),
                Err(e) => {
                    warn!(error = %e, "speech synthesis failed, showing text only");
                }
            }
        }

        Ok(())
    }
}

enum ReadOutcome {
    Message(String),
    Blank,
    Terminate,
}
