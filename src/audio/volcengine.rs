//! Volcengine OpenSpeech v1 TTS client (voice cloning / ICL cluster).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::tts::SpeechSynthesizer;
use crate::config::SpeechGateConfig;
use crate::error::SpeechGateError;
use crate::types::segment::{decode_base64, AudioFormat};
use crate::util::http::{openspeech_headers, shared_client};
use crate::util::timeout::with_timeout;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const SUCCESS_CODE: i64 = 3000;
/// The v1 API takes the real token from the header; the body field is a fixed placeholder.
const TOKEN_PLACEHOLDER: &str = "access_token";

/// Request body for `POST /api/v1/tts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TtsRequest {
    pub app: AppParams,
    pub user: UserParams,
    pub audio: AudioParams,
    pub request: RequestParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppParams {
    pub appid: String,
    pub token: String,
    pub cluster: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserParams {
    pub uid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioParams {
    pub voice_type: String,
    pub encoding: AudioFormat,
    pub speed_ratio: f64,
    pub volume_ratio: f64,
    pub pitch_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestParams {
    pub reqid: String,
    pub text: String,
    pub text_type: String,
    pub operation: String,
    pub with_frontend: u8,
    pub frontend_type: String,
}

/// Response envelope. Fields stay loosely typed: the provider is not strict
/// about JSON types, and only a syntax error counts as an undecodable body.
#[derive(Debug)]
struct TtsResponse {
    body: Value,
}

/// What the `data` field held.
#[derive(Debug, PartialEq)]
enum AudioData<'a> {
    Missing,
    Base64(&'a str),
    NotAString,
}

impl TtsResponse {
    /// Business code; integral floats count, anything else is -1.
    fn code(&self) -> i64 {
        match self.body.get("code") {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                })
                .unwrap_or(-1),
            _ => -1,
        }
    }

    fn message(&self) -> String {
        match self.body.get("message") {
            Some(Value::String(message)) => message.clone(),
            None | Some(Value::Null) => "unknown error".to_string(),
            Some(other) => other.to_string(),
        }
    }

    fn data(&self) -> AudioData<'_> {
        match self.body.get("data") {
            Some(Value::String(data)) if !data.is_empty() => AudioData::Base64(data),
            None | Some(Value::Null) | Some(Value::String(_)) | Some(Value::Bool(false)) => {
                AudioData::Missing
            }
            Some(_) => AudioData::NotAString,
        }
    }
}

/// OpenSpeech TTS client built from validated settings.
#[derive(Clone)]
pub struct VolcengineTtsClient {
    appid: String,
    access_token: String,
    cluster: String,
    voice_type: String,
    uid: String,
    speed_ratio: f64,
    volume_ratio: f64,
    pitch_ratio: f64,
    url: String,
    timeout: Duration,
}

impl std::fmt::Debug for VolcengineTtsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolcengineTtsClient")
            .field("appid", &self.appid)
            .field("cluster", &self.cluster)
            .field("voice_type", &self.voice_type)
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl VolcengineTtsClient {
    pub fn from_config(config: &SpeechGateConfig) -> Self {
        Self {
            appid: config.appid().to_string(),
            access_token: config.access_token().to_string(),
            cluster: config.cluster().to_string(),
            voice_type: config.voice_type().to_string(),
            uid: config.uid().to_string(),
            speed_ratio: config.speed_ratio(),
            volume_ratio: config.volume_ratio(),
            pitch_ratio: config.pitch_ratio(),
            url: config.url().to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate_credentials(&self) -> Result<(), SpeechGateError> {
        let missing: Vec<&str> = [
            ("appid", &self.appid),
            ("access_token", &self.access_token),
            ("voice_type", &self.voice_type),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SpeechGateError::Configuration(format!(
                "missing required TTS settings: {}",
                missing.join(", ")
            )))
        }
    }

    /// Build the request body for `text` with a fresh request id.
    pub fn build_request(&self, text: &str) -> TtsRequest {
        TtsRequest {
            app: AppParams {
                appid: self.appid.clone(),
                token: TOKEN_PLACEHOLDER.to_string(),
                cluster: self.cluster.clone(),
            },
            user: UserParams {
                uid: self.uid.clone(),
            },
            audio: AudioParams {
                voice_type: self.voice_type.clone(),
                encoding: AudioFormat::Mp3,
                speed_ratio: self.speed_ratio,
                volume_ratio: self.volume_ratio,
                pitch_ratio: self.pitch_ratio,
            },
            request: RequestParams {
                reqid: Uuid::new_v4().to_string(),
                text: text.to_string(),
                text_type: "plain".to_string(),
                operation: "query".to_string(),
                with_frontend: 1,
                frontend_type: "unitTson".to_string(),
            },
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for VolcengineTtsClient {
    async fn synthesize(&self, text: &str) -> Result<Option<String>, SpeechGateError> {
        if text.trim().is_empty() {
            tracing::warn!("Received blank text for synthesis, skipping");
            return Ok(None);
        }
        self.validate_credentials()?;

        let payload = self.build_request(text);
        let headers = openspeech_headers(&self.access_token)?;
        tracing::debug!(reqid = %payload.request.reqid, chars = text.chars().count(), "Sending TTS request");

        with_timeout(self.timeout, async {
            let response = shared_client()
                .post(&self.url)
                .headers(headers)
                .json(&payload)
                .send()
                .await?;

            parse_tts_response(response).await
        })
        .await
    }
}

async fn parse_tts_response(
    response: reqwest::Response,
) -> Result<Option<String>, SpeechGateError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    tracing::debug!(status, "TTS response received");

    if status != 200 {
        return Err(SpeechGateError::Api {
            status,
            message: body,
        });
    }

    let parsed = TtsResponse {
        body: serde_json::from_str(&body)?,
    };
    let code = parsed.code();
    if code != SUCCESS_CODE {
        return Err(SpeechGateError::Provider {
            code,
            message: parsed.message(),
        });
    }

    let data = match parsed.data() {
        AudioData::Missing => {
            tracing::warn!("TTS response carried no audio data");
            return Ok(None);
        }
        AudioData::NotAString => {
            tracing::warn!("TTS response carried invalid base64 audio: data is not a string");
            return Ok(None);
        }
        AudioData::Base64(data) => data,
    };

    if let Err(e) = decode_base64(data) {
        tracing::warn!(error = %e, "TTS response carried invalid base64 audio");
        return Ok(None);
    }

    Ok(Some(data.to_string()))
}
