//! Convenience re-exports for common use.

pub use crate::audio::{SpeechSynthesizer, VolcengineTtsClient};
pub use crate::config::{RawConfig, SpeechGateConfig};
pub use crate::error::{Result, SpeechGateError};
pub use crate::plugin::{DecorateOutcome, Plugin, ReplyEvent, ResultDecorator, SpeechGate};
pub use crate::types::{AudioSegment, MessageResult, Segment};
