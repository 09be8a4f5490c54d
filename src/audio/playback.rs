use crate::error::{DiaryError, Result};
use std::io::Write;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Upper bound on playback so a stuck external player cannot hang the
/// session.
const PLAYBACK_TIMEOUT: Duration = Duration::from_secs(10);

#[cfg(target_os = "macos")]
const PLAYER: &str = "afplay";
#[cfg(not(target_os = "macos"))]
const PLAYER: &str = "mpg123";

/// Play synthesized audio through the system player. Failures here are for
/// the caller to degrade on (display text instead of audio).
pub async fn play(audio: &[u8]) -> Result<()> {
    let mut file = tempfile::Builder::new()
        .prefix("voice-diary-tts-")
        .suffix(".mp3")
        .tempfile()
        .map_err(|e| DiaryError::Service(format!("could not create playback file: {e}")))?;

    file.write_all(audio)
        .and_then(|_| file.flush())
        .map_err(|e| DiaryError::Service(format!("could not write playback file: {e}")))?;

    // Keep the TempPath alive until the player exits; it unlinks on drop
    let path = file.into_temp_path();

    debug!(player = PLAYER, bytes = audio.len(), "playing synthesized audio");

    let mut cmd = Command::new(PLAYER);
    // A timed-out player must not outlive the dropped status future
    cmd.arg(path.to_path_buf()).kill_on_drop(true);

    run_player(cmd, PLAYER, PLAYBACK_TIMEOUT).await
}

async fn run_player(mut cmd: Command, player: &str, limit: Duration) -> Result<()> {
    let status = timeout(limit, cmd.status())
        .await
        .map_err(|_| {
            DiaryError::Service(format!(
                "{player} did not finish within {}s",
                limit.as_secs()
            ))
        })?
        .map_err(|e| DiaryError::Service(format!("failed to launch {player}: {e}")))?;

    if !status.success() {
        return Err(DiaryError::Service(format!("{player} exited with {status}")));
    }

    Ok(())
}
