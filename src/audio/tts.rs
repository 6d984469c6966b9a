//! Text-to-speech trait.

use async_trait::async_trait;

use crate::error::SpeechGateError;

/// Trait for text-to-speech backends used by the reply interceptor.
///
/// `Ok(None)` means the backend had nothing to deliver (blank input, or an
/// accepted request that produced no usable audio). `Err` means the attempt
/// could not be made or the provider refused it.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text`, returning base64-encoded audio.
    async fn synthesize(&self, text: &str) -> Result<Option<String>, SpeechGateError>;
}
