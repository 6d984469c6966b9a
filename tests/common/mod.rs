//! Shared test helpers: settings pointed at a mock OpenSpeech server.

#![allow(dead_code)]

use serde_json::{json, Value};
use speechgate::config::{RawConfig, SpeechGateConfig};
use wiremock::MockServer;

pub const TTS_PATH: &str = "/api/v1/tts";
/// "ID3\x04\x00", the start of an mp3 header.
pub const MP3_BASE64: &str = "SUQzBAA=";

/// Enabled, always-firing settings with full credentials.
pub fn raw_config(server: &MockServer, overrides: Value) -> RawConfig {
    let mut raw = json!({
        "enable_tts": true,
        "tts_probability": 100,
        "min_length": 1,
        "max_length": 50,
        "appid": "app-123",
        "access_token": "tok-abc",
        "voice_type": "S_clone_voice",
        "uid": "10001",
        "url": format!("{}{TTS_PATH}", server.uri()),
    });
    if let (Some(base), Value::Object(extra)) = (raw.as_object_mut(), overrides) {
        base.extend(extra);
    }
    match raw {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

pub fn config(server: &MockServer, overrides: Value) -> SpeechGateConfig {
    SpeechGateConfig::from_raw(&raw_config(server, overrides))
}

pub fn success_body(data: &str) -> Value {
    json!({
        "reqid": "echoed",
        "code": 3000,
        "message": "Success",
        "sequence": -1,
        "data": data,
    })
}
