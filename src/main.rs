use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use voice_diary::audio::{CaptureSource, VoiceInput};
use voice_diary::session::{ConsoleIo, DiarySession, OpenEnded, PromptStrategy, ScriptedPrompts};
use voice_diary::{persist, Config, OpenAiProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Walk the fixed list of diary questions
    Scripted,
    /// Single open invitation, unscripted continuation
    Open,
}

#[derive(Debug, Parser)]
#[command(name = "voice-diary", about = "Conversational diary assistant")]
struct Cli {
    /// Interview style
    #[arg(long, value_enum, default_value = "scripted")]
    mode: Mode,

    /// Enable voice input and spoken replies
    #[arg(long)]
    voice: bool,

    /// WAV file standing in for the microphone in voice mode
    #[arg(long)]
    audio_file: Option<PathBuf>,

    /// Configuration file (without extension)
    #[arg(long, default_value = "config/voice-diary")]
    config: String,

    /// Directory for diary records (overrides the config file)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Per-session call budget (overrides the config file)
    #[arg(long)]
    max_calls: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Credential check comes before any session state exists
    let api_key = Config::api_key()?;

    let mut cfg = Config::load(&cli.config)?;
    if let Some(max_calls) = cli.max_calls {
        cfg.session.max_calls = max_calls;
    }
    let output_dir = cli
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&cfg.diary.output_dir));

    let voice = if cli.voice {
        let source = match cli.audio_file {
            Some(path) => CaptureSource::File(path),
            None => CaptureSource::Microphone,
        };
        Some(VoiceInput::new(source.create()?))
    } else {
        None
    };

    let prompts: Box<dyn PromptStrategy> = match cli.mode {
        Mode::Scripted => Box::new(ScriptedPrompts::default()),
        Mode::Open => Box::new(OpenEnded),
    };

    println!("*** Welcome to your AI Diary! ***");
    println!("I'm here to help you reflect on your day.");
    println!("Type 'quit' anytime to finish and save your diary entry.");

    let provider = OpenAiProvider::new(cfg.provider.clone(), api_key);
    let session = DiarySession::new(Box::new(provider), cfg.session.clone());

    let record = session.run(Box::new(ConsoleIo::new()), prompts, voice).await;

    if record.transcript.is_empty() {
        println!("\nNo diary entry created. Come back anytime!");
        return Ok(());
    }

    println!("\n{}", "=".repeat(50));
    println!("*** YOUR DIARY ENTRY ***");
    println!("{}", "=".repeat(50));
    println!("Date: {}", record.date.format("%B %d, %Y"));
    println!();
    println!("{}", record.summary);
    println!("{}", "=".repeat(50));

    let path = persist::persist(&output_dir, &record)?;
    info!(path = %path.display(), "session complete");
    println!("Saved to {} ({} calls used)", path.display(), record.calls_used);

    Ok(())
}
