//! Error classification and recovery hints.

use strum::Display;

/// Broad error category used by the reply interceptor and the CLI.
///
/// Transport failures (connection, timeout, undecodable body) and
/// provider-reported failures abort a synthesis attempt the same way; the
/// category only tells them apart for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    Configuration,
    Provider,
    Transport,
    Audio,
    Io,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RecoverySuggestion {
    CheckCredentials,
    CheckProviderStatus,
    CheckNetwork,
    CheckAudioPayload,
    CheckFilesystem,
}
