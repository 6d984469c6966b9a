//! Speech synthesis: the backend trait and the OpenSpeech voice-cloning client.

pub mod tts;
pub mod volcengine;

pub use tts::SpeechSynthesizer;
pub use volcengine::VolcengineTtsClient;
