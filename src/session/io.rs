use std::io::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::oneshot;

/// Interactive surface of the conversation driver. Abstracted so tests can
/// script a whole session.
#[async_trait::async_trait]
pub trait UserIo: Send {
    /// Prompt and read one line. `None` means end of input.
    async fn read_line(&mut self, prompt: &str) -> Option<String>;

    /// Show a line to the user.
    fn say(&mut self, line: &str);

    /// Arm a one-shot stop signal for voice capture: flip `stop` when the
    /// user signals (console: presses ENTER).
    fn arm_stop_signal(&mut self, stop: Arc<AtomicBool>);
}

/// Console implementation over stdin/stdout.
pub struct ConsoleIo {
    reader: BufReader<Stdin>,
    /// Line held by an armed stop listener. When capture ends on its own
    /// (stream drained) the listener is still parked on stdin and receives
    /// whatever the user types next; `read_line` reclaims it from here so
    /// two readers never contend for the same fd.
    pending: Option<oneshot::Receiver<String>>,
}

impl ConsoleIo {
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
            pending: None,
        }
    }
}

impl Default for ConsoleIo {
    fn default() -> Self {
        Self::new()
    }
}

/// A non-blank line caught by a stale stop listener is real user input; a
/// blank one is the ENTER press that stopped capture.
fn reclaimed(line: String) -> Option<String> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[async_trait::async_trait]
impl UserIo for ConsoleIo {
    async fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{prompt}");
        std::io::stdout().flush().ok();

        // An armed listener owns the next line; wait for it instead of
        // issuing a second read against stdin.
        if let Some(rx) = self.pending.take() {
            if let Ok(line) = rx.await {
                if let Some(input) = reclaimed(line) {
                    return Some(input);
                }
            }
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line).await {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    fn say(&mut self, line: &str) {
        println!("{line}");
    }

    fn arm_stop_signal(&mut self, stop: Arc<AtomicBool>) {
        // Blocking read on a fresh handle so the async reader is untouched;
        // the listener flips the flag and hands its line back for
        // `read_line` to reclaim.
        let (tx, rx) = oneshot::channel();
        self.pending = Some(rx);
        tokio::task::spawn_blocking(move || {
            let mut line = String::new();
            let _ = std::io::stdin().read_line(&mut line);
            stop.store(true, Ordering::SeqCst);
            let _ = tx.send(line);
        });
    }
}
