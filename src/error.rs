use thiserror::Error;

/// Error taxonomy for the diary pipeline.
///
/// `Configuration` is fatal at startup. `BudgetExceeded` ends the session
/// gracefully (the partial transcript is still summarized and persisted).
/// Everything else is caught at the failing capability call and converted
/// to a visible fallback; no transient failure escapes the driver.
#[derive(Debug, Error)]
pub enum DiaryError {
    /// A capability call failed (network, auth, quota).
    #[error("capability call failed: {0}")]
    Service(String),

    /// The per-session call budget is exhausted; the call was rejected
    /// before any external interaction.
    #[error("call budget exhausted ({limit} calls used)")]
    BudgetExceeded { limit: usize },

    /// Missing credential or unreadable configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The emotion tag after the reply marker did not parse.
    #[error("malformed emotion tag: {0:?}")]
    MalformedReply(String),

    /// Audio capture or encoding failed.
    #[error("audio capture failed: {0}")]
    AudioCapture(String),

    /// Reading or writing a diary record failed.
    #[error("persistence failed: {0}")]
    Persistence(String),
}

pub type Result<T> = std::result::Result<T, DiaryError>;
