//! Error types for SpeechGate.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all SpeechGate operations.
///
/// Field-level configuration problems never show up here: the loader
/// substitutes defaults and logs instead. A `Configuration` error means a
/// required credential is still missing when synthesis is attempted, or a
/// config file could not be parsed at all.
#[derive(Error, Debug)]
pub enum SpeechGateError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Provider error: code={code}, message={message}")]
    Provider { code: i64, message: String },

    #[error("Request failed: {message}")]
    Transport {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid audio payload: {0}")]
    InvalidAudio(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpeechGateError {
    /// Wrap a transport-level failure, keeping the original cause.
    pub fn transport(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Api { .. } | Self::Provider { .. } => ErrorCategory::Provider,
            Self::Transport { .. } | Self::Timeout(_) => ErrorCategory::Transport,
            Self::InvalidAudio(_) => ErrorCategory::Audio,
            Self::Io(_) => ErrorCategory::Io,
        }
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            Self::Api {
                status: 401 | 403, ..
            } => RecoverySuggestion::CheckCredentials,
            _ => match self.category() {
                ErrorCategory::Configuration => RecoverySuggestion::CheckCredentials,
                ErrorCategory::Provider => RecoverySuggestion::CheckProviderStatus,
                ErrorCategory::Transport => RecoverySuggestion::CheckNetwork,
                ErrorCategory::Audio => RecoverySuggestion::CheckAudioPayload,
                ErrorCategory::Io => RecoverySuggestion::CheckFilesystem,
            },
        }
    }
}

impl From<reqwest::Error> for SpeechGateError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport("HTTP request failed", err)
    }
}

impl From<serde_json::Error> for SpeechGateError {
    fn from(err: serde_json::Error) -> Self {
        Self::transport("response body is not valid JSON", err)
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SpeechGateError>;
