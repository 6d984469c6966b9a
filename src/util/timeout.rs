//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::SpeechGateError;

/// Wrap a future with a timeout.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, SpeechGateError>>,
) -> Result<T, SpeechGateError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(SpeechGateError::Timeout(duration.as_millis() as u64)),
    }
}
