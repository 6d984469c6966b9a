//! Reply segments and the outgoing message result.

use std::path::PathBuf;

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::{Result, SpeechGateError};

/// One typed piece of an outgoing reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Text(TextSegment),
    Image(ImageSegment),
    Audio(AudioSegment),
    Mention(MentionSegment),
}

impl Segment {
    /// Create a text segment.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextSegment { text: text.into() })
    }

    /// Speakable text carried by this segment, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(segment) => Some(segment.text.as_str()),
            Self::Image(_) | Self::Audio(_) | Self::Mention(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextSegment {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageSegment {
    pub source: MediaSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MentionSegment {
    pub user_id: String,
}

/// Voice attachment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AudioSegment {
    pub source: MediaSource,
    pub format: AudioFormat,
}

impl AudioSegment {
    /// Wrap a base64 mp3 payload as returned by the speech provider.
    pub fn from_base64(data: impl Into<String>) -> Self {
        Self {
            source: MediaSource::Base64 { data: data.into() },
            format: AudioFormat::Mp3,
        }
    }

    /// Decode inline audio bytes. Only base64 sources carry bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        match &self.source {
            MediaSource::Base64 { data } => decode_base64(data)
                .map_err(|e| SpeechGateError::InvalidAudio(e.to_string())),
            MediaSource::Url { url } => Err(SpeechGateError::InvalidAudio(format!(
                "audio is referenced by URL ({url}), not inline"
            ))),
            MediaSource::Path { path } => Err(SpeechGateError::InvalidAudio(format!(
                "audio is referenced by path ({}), not inline",
                path.display()
            ))),
        }
    }
}

/// Where a media segment's bytes live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaSource {
    Base64 { data: String },
    Url { url: String },
    Path { path: PathBuf },
}

/// Audio container format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    Ogg,
}

/// The host-owned result of one outgoing reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageResult {
    pub chain: Vec<Segment>,
}

impl MessageResult {
    pub fn new(chain: Vec<Segment>) -> Self {
        Self { chain }
    }

    /// Concatenate the text of every text segment, in chain order.
    ///
    /// Returns `None` when the chain has no text segment at all.
    pub fn text(&self) -> Option<String> {
        let mut parts = self.chain.iter().filter_map(Segment::as_text).peekable();
        parts.peek()?;
        Some(parts.collect())
    }

    /// Replace the whole chain, returning the previous one.
    pub fn replace_chain(&mut self, chain: Vec<Segment>) -> Vec<Segment> {
        std::mem::replace(&mut self.chain, chain)
    }
}

/// Decode standard base64, ignoring ASCII whitespace such as line breaks.
pub(crate) fn decode_base64(data: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD.decode(compact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_skips_non_text_segments_in_order() {
        let result = MessageResult::new(vec![
            Segment::text("Hello, "),
            Segment::Image(ImageSegment {
                source: MediaSource::Url {
                    url: "https://example.com/cat.png".to_string(),
                },
            }),
            Segment::text("world"),
        ]);

        assert_eq!(result.text().as_deref(), Some("Hello, world"));
    }

    #[test]
    fn text_is_none_without_text_segments() {
        let result = MessageResult::new(vec![Segment::Mention(MentionSegment {
            user_id: "42".to_string(),
        })]);
        assert_eq!(result.text(), None);
        assert_eq!(MessageResult::default().text(), None);
    }

    #[test]
    fn segments_serialize_with_type_tag() {
        let segment = Segment::Audio(AudioSegment::from_base64("SUQz"));
        let value = serde_json::to_value(&segment).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "audio",
                "source": { "kind": "base64", "data": "SUQz" },
                "format": "mp3"
            })
        );
    }

    #[test]
    fn audio_decode_tolerates_line_breaks() {
        let segment = AudioSegment::from_base64("SUQz\nBAA=");
        assert_eq!(segment.decode().unwrap(), b"ID3\x04\x00".to_vec());
    }

    #[test]
    fn audio_decode_rejects_url_sources() {
        let segment = AudioSegment {
            source: MediaSource::Url {
                url: "https://example.com/a.mp3".to_string(),
            },
            format: AudioFormat::Mp3,
        };
        assert!(matches!(
            segment.decode(),
            Err(SpeechGateError::InvalidAudio(_))
        ));
    }
}
