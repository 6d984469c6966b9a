//! SpeechGate — speak chat-bot replies in a cloned voice.
//!
//! A reply decorator for chat-bot hosts. For each outgoing reply it rolls a
//! probability gate, checks the reply's text length, asks the Volcengine
//! OpenSpeech voice-cloning API for mp3 audio, and on success replaces the
//! reply's segments with a single audio segment. Any failure leaves the text
//! reply untouched.
//!
//! # Quick Start
//!
//! ```no_run
//! use speechgate::prelude::*;
//! use speechgate::plugin::OutgoingReply;
//!
//! # async fn example() {
//! let raw = serde_json::json!({
//!     "enable_tts": true,
//!     "appid": "your-appid",
//!     "access_token": "your-token",
//!     "voice_type": "S_your_voice",
//! });
//! let gate = SpeechGate::from_raw(raw.as_object().unwrap());
//!
//! let mut reply = OutgoingReply::new(MessageResult::new(vec![Segment::text("Good morning!")]));
//! gate.on_decorating_result(&mut reply).await;
//! # }
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod plugin;
pub mod prelude;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
