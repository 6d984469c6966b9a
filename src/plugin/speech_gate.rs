//! The reply interceptor: gate, extract, synthesize, splice.

use async_trait::async_trait;

use super::gate::{LengthBounds, LengthCheck, ProbabilityGate};
use super::{Plugin, PluginMetadata, ReplyEvent, ResultDecorator};
use crate::audio::{SpeechSynthesizer, VolcengineTtsClient};
use crate::config::{RawConfig, SpeechGateConfig};
use crate::error::ErrorCategory;
use crate::types::{AudioSegment, Segment};

/// What happened to one reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorateOutcome {
    Disabled,
    GateMissed,
    /// No result, an empty chain, or no text segments.
    NoText,
    Empty,
    TooLong { length: usize },
    TooShort { length: usize },
    /// The provider accepted the request but produced nothing usable.
    NoAudio,
    /// The host dropped the result while synthesis was in flight.
    ResultGone,
    Replaced,
    Failed(ErrorCategory),
}

impl DecorateOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced)
    }
}

/// Turns eligible text replies into a single voice segment.
///
/// Holds only immutable settings and the synthesizer, so one instance can
/// decorate concurrent replies through `&self`. Every failure leaves the
/// reply as it was.
pub struct SpeechGate<S = VolcengineTtsClient> {
    config: SpeechGateConfig,
    gate: ProbabilityGate,
    bounds: LengthBounds,
    synthesizer: S,
}

impl SpeechGate<VolcengineTtsClient> {
    /// Build the gate with the OpenSpeech client described by `config`.
    pub fn new(config: SpeechGateConfig) -> Self {
        let synthesizer = VolcengineTtsClient::from_config(&config);
        Self::with_synthesizer(config, synthesizer)
    }

    /// Validate the host's raw settings and build the gate.
    pub fn from_raw(raw: &RawConfig) -> Self {
        Self::new(SpeechGateConfig::from_raw(raw))
    }
}

impl<S: SpeechSynthesizer> SpeechGate<S> {
    pub fn with_synthesizer(config: SpeechGateConfig, synthesizer: S) -> Self {
        Self {
            gate: ProbabilityGate::new(config.tts_probability()),
            bounds: LengthBounds::new(config.min_length(), config.max_length()),
            config,
            synthesizer,
        }
    }

    pub fn config(&self) -> &SpeechGateConfig {
        &self.config
    }

    pub fn synthesizer(&self) -> &S {
        &self.synthesizer
    }

    /// Run the whole decision and mutation flow for one reply.
    pub async fn decorate(&self, event: &mut dyn ReplyEvent) -> DecorateOutcome {
        if !self.config.enable_tts() {
            return DecorateOutcome::Disabled;
        }

        let fired = self.gate.roll(&mut rand::thread_rng());
        if !fired {
            tracing::debug!(
                probability = self.gate.percent(),
                "Reply missed the TTS gate, skipping synthesis"
            );
            return DecorateOutcome::GateMissed;
        }

        let Some(full_text) = event.result_mut().and_then(|result| result.text()) else {
            return DecorateOutcome::NoText;
        };
        let text = full_text.trim();

        match self.bounds.check(text) {
            LengthCheck::Empty => {
                tracing::debug!("Reply text is empty, skipping synthesis");
                return DecorateOutcome::Empty;
            }
            LengthCheck::TooLong { length } => {
                tracing::debug!(
                    length,
                    max_length = self.bounds.max,
                    "Reply text too long, skipping synthesis"
                );
                return DecorateOutcome::TooLong { length };
            }
            LengthCheck::TooShort { length } => {
                tracing::debug!(
                    length,
                    min_length = self.bounds.min,
                    "Reply text too short, skipping synthesis"
                );
                return DecorateOutcome::TooShort { length };
            }
            LengthCheck::Within { .. } => {}
        }

        tracing::info!(text, "Synthesizing cloned voice");
        let audio = match self.synthesizer.synthesize(text).await {
            Ok(Some(audio)) => audio,
            Ok(None) => {
                tracing::warn!("Speech synthesis returned no audio, keeping text reply");
                return DecorateOutcome::NoAudio;
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    category = %e.category(),
                    "Speech synthesis failed, keeping text reply"
                );
                return DecorateOutcome::Failed(e.category());
            }
        };

        let Some(result) = event.result_mut() else {
            tracing::warn!("Reply result was dropped during synthesis, skipping");
            return DecorateOutcome::ResultGone;
        };
        result.replace_chain(vec![Segment::Audio(AudioSegment::from_base64(audio))]);
        DecorateOutcome::Replaced
    }
}

#[async_trait]
impl<S: SpeechSynthesizer> ResultDecorator for SpeechGate<S> {
    async fn on_decorating_result(&self, event: &mut dyn ReplyEvent) {
        let outcome = self.decorate(event).await;
        tracing::debug!(?outcome, "Reply decoration finished");
    }
}

#[async_trait]
impl<S: SpeechSynthesizer> Plugin for SpeechGate<S> {
    fn metadata(&self) -> PluginMetadata {
        PluginMetadata {
            name: "speechgate",
            author: "speechgate contributors",
            description: "Text-to-speech for chat replies using OpenSpeech voice cloning (ICL)",
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    async fn initialize(&self) {
        tracing::info!(
            enabled = self.config.enable_tts(),
            probability = self.config.tts_probability(),
            "SpeechGate plugin initialized"
        );
    }

    async fn terminate(&self) {
        tracing::info!("SpeechGate plugin terminated");
    }
}
