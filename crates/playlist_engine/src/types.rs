use std::fmt;

use playlist_core::Playlist;

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    IngestCompleted {
        request_id: RequestId,
        result: Result<Playlist, IngestError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct IngestError {
    pub kind: FailureKind,
    pub message: String,
}

impl IngestError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Malformed, message)
    }

    /// Coarse message safe to show to the user; detail stays in the log.
    pub fn user_message(&self) -> &'static str {
        match self.kind {
            FailureKind::MissingCredential => "Please configure your YouTube API key first",
            FailureKind::InvalidUrl => "Invalid playlist URL",
            FailureKind::Cancelled => "Loading cancelled",
            _ => "Failed to load playlist",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    MissingCredential,
    NotFound,
    RateLimited,
    Malformed,
    HttpStatus(u16),
    Timeout,
    Cancelled,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::MissingCredential => write!(f, "missing credential"),
            FailureKind::NotFound => write!(f, "playlist not found"),
            FailureKind::RateLimited => write!(f, "rate limited"),
            FailureKind::Malformed => write!(f, "malformed response"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
