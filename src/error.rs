/// Error types for the shorten-and-present workflow
use thiserror::Error;

/// Why a shortening run could not produce a short link
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortenError {
    #[error("No active tab with a URL was found")]
    NoActiveTab,

    #[error("Shortening request failed: {0}")]
    RequestFailed(String),

    #[error("Shortening service returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Fieldless discriminant of [`ShortenError`], handy for matching and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoActiveTab,
    RequestFailed,
    InvalidResponse,
}

impl ShortenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShortenError::NoActiveTab => ErrorKind::NoActiveTab,
            ShortenError::RequestFailed(_) => ErrorKind::RequestFailed,
            ShortenError::InvalidResponse(_) => ErrorKind::InvalidResponse,
        }
    }
}

/// Problems with a caller-supplied [`crate::config::WorkflowConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid shortening service URL {url:?}: {reason}")]
    InvalidServiceUrl { url: String, reason: String },
}
