use std::fmt;

/// Errors that abort the reassembly of one response body.
///
/// Every variant except [`ReassemblyError::StreamClosed`] moves the owning
/// [`StreamReassembler`](crate::StreamReassembler) into
/// [`StreamState::Failed`]; `StreamClosed` reports a usage error and leaves
/// the terminal state untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReassemblyError {
    #[error("Allocation of {requested} bytes failed")]
    AllocationFailure { requested: usize },
    #[error("Malformed element boundary at byte {offset}: {reason}")]
    MalformedBoundary { offset: u64, reason: &'static str },
    #[error("Element larger than the {limit} byte limit")]
    ElementTooLarge { limit: usize },
    #[error("Truncated stream: body ended with {carried} bytes of an unterminated element")]
    TruncatedStream { carried: usize },
    #[error("Stream is {0}; no further chunks accepted")]
    StreamClosed(Box<StreamState>),
}

/// Lifecycle of one response body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StreamState {
    #[default]
    Idle,
    Streaming,
    Completed,
    Failed(ReassemblyError),
}

impl StreamState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamState::Completed | StreamState::Failed(_))
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamState::Idle => f.write_str("idle"),
            StreamState::Streaming => f.write_str("streaming"),
            StreamState::Completed => f.write_str("completed"),
            StreamState::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// Failure to turn one fragment into price records. Never fatal to the stream.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] simd_json::Error),
    #[error("Fragment is not a JSON array")]
    NotAnArray,
    #[error("Element is missing the `{field}` field")]
    MissingField { field: String },
    #[error("Invalid price value: {raw}")]
    InvalidPrice { raw: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected HTTP status {0}")]
    Status(u16),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Error of a single fetch cycle.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("Transport error: {0}")]
    Source(#[from] SourceError),
    #[error("Reassembly error: {0}")]
    Reassembly(#[from] ReassemblyError),
}
