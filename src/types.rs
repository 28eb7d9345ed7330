//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// How a photo upload ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadOutcome {
    /// The Bot API acknowledged the photo
    Sent,
    /// Token, chat id or path was empty; nothing was sent
    InvalidInput(String),
    /// The photo could not be read; nothing was sent
    FileUnavailable(String),
    /// The request never produced a response (connect, TLS, timeout)
    TransportFailure(String),
    /// A response came back without the success marker
    ApiRejected(String),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Sent)
    }

    /// Whether a request went out on the wire
    pub fn reached_network(&self) -> bool {
        matches!(self, Self::Sent | Self::TransportFailure(_) | Self::ApiRejected(_))
    }

    /// Diagnostic text, empty for a successful upload
    pub fn message(&self) -> &str {
        match self {
            Self::Sent => "",
            Self::InvalidInput(msg)
            | Self::FileUnavailable(msg)
            | Self::TransportFailure(msg)
            | Self::ApiRejected(msg) => msg,
        }
    }

    /// Convert into the error used by the command line front end
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Sent => Ok(()),
            Self::InvalidInput(msg) => Err(AppError::validation(msg)),
            Self::FileUnavailable(msg) => Err(AppError::io(msg)),
            Self::TransportFailure(msg) => Err(AppError::network(msg)),
            Self::ApiRejected(msg) => Err(AppError::api(msg)),
        }
    }
}

impl From<UploadOutcome> for bool {
    fn from(outcome: UploadOutcome) -> Self {
        outcome.is_success()
    }
}

impl fmt::Display for UploadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent => write!(f, "photo sent"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            Self::FileUnavailable(msg) => write!(f, "photo unavailable: {}", msg),
            Self::TransportFailure(msg) => write!(f, "transport failure: {}", msg),
            Self::ApiRejected(msg) => write!(f, "rejected by API: {}", msg),
        }
    }
}
