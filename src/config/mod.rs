//! Plugin settings, validated and clamped once at construction.
//!
//! Hosts hand over their config store as a raw JSON-like mapping. Loading
//! never fails: a value that cannot be coerced is logged and replaced by the
//! field default, then every number is clamped into its valid range. Missing
//! credentials are only a warning here; the synthesis call refuses to run
//! without them.

use std::fmt;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Result, SpeechGateError};

pub const DEFAULT_URL: &str = "https://openspeech.bytedance.com/api/v1/tts";
pub const DEFAULT_CLUSTER: &str = "volcano_icl";
pub const DEFAULT_UID: &str = "388808087185088";
pub const DEFAULT_PROBABILITY: f64 = 100.0;
pub const DEFAULT_MAX_LENGTH: usize = 50;
pub const DEFAULT_MIN_LENGTH: usize = 5;
pub const DEFAULT_RATIO: f64 = 1.0;

const PROBABILITY_RANGE: (f64, f64) = (0.0, 100.0);
const RATIO_RANGE: (f64, f64) = (0.5, 2.0);

/// Raw settings as handed over by the host's config store.
pub type RawConfig = Map<String, Value>;

/// Environment variables copied over file values by [`apply_env_overrides`].
const ENV_OVERRIDES: [(&str, &str); 6] = [
    ("SPEECHGATE_APPID", "appid"),
    ("SPEECHGATE_ACCESS_TOKEN", "access_token"),
    ("SPEECHGATE_VOICE_TYPE", "voice_type"),
    ("SPEECHGATE_CLUSTER", "cluster"),
    ("SPEECHGATE_UID", "uid"),
    ("SPEECHGATE_URL", "url"),
];

/// Validated, immutable plugin settings.
#[derive(Clone, PartialEq)]
pub struct SpeechGateConfig {
    enable_tts: bool,
    tts_probability: f64,
    max_length: usize,
    min_length: usize,
    appid: String,
    access_token: String,
    cluster: String,
    voice_type: String,
    uid: String,
    speed_ratio: f64,
    volume_ratio: f64,
    pitch_ratio: f64,
    url: String,
}

impl fmt::Debug for SpeechGateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechGateConfig")
            .field("enable_tts", &self.enable_tts)
            .field("tts_probability", &self.tts_probability)
            .field("max_length", &self.max_length)
            .field("min_length", &self.min_length)
            .field("appid", &self.appid)
            .field(
                "access_token",
                &if self.access_token.is_empty() { "" } else { ".." },
            )
            .field("cluster", &self.cluster)
            .field("voice_type", &self.voice_type)
            .field("uid", &self.uid)
            .field("speed_ratio", &self.speed_ratio)
            .field("volume_ratio", &self.volume_ratio)
            .field("pitch_ratio", &self.pitch_ratio)
            .field("url", &self.url)
            .finish()
    }
}

impl Default for SpeechGateConfig {
    fn default() -> Self {
        Self::from_raw(&RawConfig::new())
    }
}

impl SpeechGateConfig {
    /// Validate a raw mapping. Never fails; see the module docs.
    pub fn from_raw(raw: &RawConfig) -> Self {
        let config = Self {
            enable_tts: read_bool(raw, "enable_tts", false),
            tts_probability: clamp(
                read_number(raw, "tts_probability", DEFAULT_PROBABILITY),
                PROBABILITY_RANGE,
            ),
            max_length: read_length(raw, "max_length", DEFAULT_MAX_LENGTH),
            min_length: read_length(raw, "min_length", DEFAULT_MIN_LENGTH),
            appid: read_string(raw, "appid", ""),
            access_token: read_string(raw, "access_token", ""),
            cluster: read_string(raw, "cluster", DEFAULT_CLUSTER),
            voice_type: read_string(raw, "voice_type", ""),
            uid: read_string(raw, "uid", DEFAULT_UID),
            speed_ratio: clamp(read_number(raw, "speed_ratio", DEFAULT_RATIO), RATIO_RANGE),
            volume_ratio: clamp(read_number(raw, "volume_ratio", DEFAULT_RATIO), RATIO_RANGE),
            pitch_ratio: clamp(read_number(raw, "pitch_ratio", DEFAULT_RATIO), RATIO_RANGE),
            url: read_string(raw, "url", DEFAULT_URL),
        };

        if config.enable_tts {
            let missing = config.missing_credentials();
            if !missing.is_empty() {
                tracing::warn!(
                    missing = %missing.join(", "),
                    "Required TTS settings are empty; speech synthesis will fail"
                );
            }
            if config.min_length > config.max_length {
                tracing::warn!(
                    min_length = config.min_length,
                    max_length = config.max_length,
                    "min_length exceeds max_length; no reply can be synthesized"
                );
            }
        }

        config
    }

    /// Parse a TOML document into a raw mapping.
    pub fn raw_from_toml_str(source: &str) -> Result<RawConfig> {
        toml::from_str(source)
            .map_err(|e| SpeechGateError::Configuration(format!("invalid TOML config: {e}")))
    }

    /// Read a TOML file into a raw mapping.
    pub fn raw_from_file(path: impl AsRef<Path>) -> Result<RawConfig> {
        let source = std::fs::read_to_string(path)?;
        Self::raw_from_toml_str(&source)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(Self::from_raw(&Self::raw_from_toml_str(source)?))
    }

    /// Read and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_raw(&Self::raw_from_file(path)?))
    }

    /// Names of the credentials synthesis cannot run without, if empty.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            ("appid", &self.appid),
            ("access_token", &self.access_token),
            ("voice_type", &self.voice_type),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn enable_tts(&self) -> bool {
        self.enable_tts
    }

    /// Firing probability in percent, within `[0, 100]`.
    pub fn tts_probability(&self) -> f64 {
        self.tts_probability
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn appid(&self) -> &str {
        &self.appid
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub fn voice_type(&self) -> &str {
        &self.voice_type
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn speed_ratio(&self) -> f64 {
        self.speed_ratio
    }

    pub fn volume_ratio(&self) -> f64 {
        self.volume_ratio
    }

    pub fn pitch_ratio(&self) -> f64 {
        self.pitch_ratio
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Load `.env` (if present) and copy `SPEECHGATE_*` variables over `raw`.
pub fn apply_env_overrides(raw: &mut RawConfig) {
    let _ = dotenvy::dotenv(); // load .env if present, ignore error
    apply_overrides_from(raw, |name| std::env::var(name).ok());
}

/// Copy overrides from an arbitrary lookup; empty values are ignored.
pub fn apply_overrides_from(raw: &mut RawConfig, lookup: impl Fn(&str) -> Option<String>) {
    for (env_var, key) in ENV_OVERRIDES {
        if let Some(value) = lookup(env_var).filter(|v| !v.trim().is_empty()) {
            raw.insert(key.to_string(), Value::String(value));
        }
    }
}

fn clamp(value: f64, (low, high): (f64, f64)) -> f64 {
    value.max(low).min(high)
}

fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    (!number.is_nan()).then_some(number)
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn read_with<T: Copy + fmt::Debug>(
    raw: &RawConfig,
    key: &'static str,
    default: T,
    coerce: impl Fn(&Value) -> Option<T>,
) -> T {
    match raw.get(key) {
        None => default,
        Some(value) => coerce(value).unwrap_or_else(|| {
            tracing::warn!(
                field = key,
                value = %value,
                default = ?default,
                "Invalid config value, using default"
            );
            default
        }),
    }
}

fn read_number(raw: &RawConfig, key: &'static str, default: f64) -> f64 {
    read_with(raw, key, default, coerce_number)
}

fn read_length(raw: &RawConfig, key: &'static str, default: usize) -> usize {
    let value = read_with(raw, key, default as i64, coerce_integer);
    value.max(1) as usize
}

fn read_bool(raw: &RawConfig, key: &'static str, default: bool) -> bool {
    read_with(raw, key, default, coerce_bool)
}

/// Absent, null and `""` quietly mean "unset"; anything else unusable warns.
fn read_string(raw: &RawConfig, key: &'static str, default: &str) -> String {
    match raw.get(key) {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) if s.is_empty() => default.to_string(),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(value) => {
            tracing::warn!(
                field = key,
                value = %value,
                default,
                "Invalid config value, using default"
            );
            default.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` under a scoped subscriber and return the warnings it logged.
    fn captured_warnings(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn raw(value: Value) -> RawConfig {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn empty_mapping_yields_documented_defaults() {
        let config = SpeechGateConfig::default();

        assert!(!config.enable_tts());
        assert_eq!(config.tts_probability(), 100.0);
        assert_eq!(config.max_length(), 50);
        assert_eq!(config.min_length(), 5);
        assert_eq!(config.cluster(), "volcano_icl");
        assert_eq!(config.uid(), "388808087185088");
        assert_eq!(config.url(), DEFAULT_URL);
        assert_eq!(config.speed_ratio(), 1.0);
        assert_eq!(
            config.missing_credentials(),
            vec!["appid", "access_token", "voice_type"]
        );
    }

    #[test]
    fn unparsable_probability_falls_back_to_100() {
        let config = SpeechGateConfig::from_raw(&raw(json!({ "tts_probability": "often" })));
        assert_eq!(config.tts_probability(), 100.0);

        let config = SpeechGateConfig::from_raw(&raw(json!({ "tts_probability": null })));
        assert_eq!(config.tts_probability(), 100.0);
    }

    #[test]
    fn unparsable_probability_logs_a_warning() {
        let logs = captured_warnings(|| {
            let config =
                SpeechGateConfig::from_raw(&raw(json!({ "tts_probability": "often" })));
            assert_eq!(config.tts_probability(), 100.0);
        });

        assert!(logs.contains("WARN"), "logs: {logs}");
        assert!(logs.contains("Invalid config value, using default"), "logs: {logs}");
        assert!(logs.contains("tts_probability"), "logs: {logs}");
    }

    #[test]
    fn wrong_typed_credential_logs_a_warning() {
        let logs = captured_warnings(|| {
            let config = SpeechGateConfig::from_raw(&raw(json!({
                "access_token": true,
                "cluster": ["a"],
                "appid": "   ",
            })));
            assert_eq!(config.access_token(), "");
            assert_eq!(config.cluster(), DEFAULT_CLUSTER);
            assert_eq!(config.appid(), "");
        });

        assert!(logs.contains("access_token"), "logs: {logs}");
        assert!(logs.contains("cluster"), "logs: {logs}");
        assert!(logs.contains("appid"), "logs: {logs}");
    }

    #[test]
    fn unset_strings_stay_quiet() {
        let logs = captured_warnings(|| {
            SpeechGateConfig::from_raw(&raw(json!({ "appid": "", "uid": null })));
        });
        assert!(logs.is_empty(), "logs: {logs}");
    }

    #[test]
    fn numbers_are_clamped_into_range() {
        let config = SpeechGateConfig::from_raw(&raw(json!({
            "tts_probability": 250,
            "max_length": 0,
            "min_length": -4,
            "speed_ratio": 9.5,
            "volume_ratio": 0.1,
            "pitch_ratio": "1.25",
        })));

        assert_eq!(config.tts_probability(), 100.0);
        assert_eq!(config.max_length(), 1);
        assert_eq!(config.min_length(), 1);
        assert_eq!(config.speed_ratio(), 2.0);
        assert_eq!(config.volume_ratio(), 0.5);
        assert_eq!(config.pitch_ratio(), 1.25);
    }

    #[test]
    fn negative_probability_clamps_to_zero() {
        let config = SpeechGateConfig::from_raw(&raw(json!({ "tts_probability": "-3" })));
        assert_eq!(config.tts_probability(), 0.0);
    }

    #[test]
    fn lengths_accept_numeric_strings_and_truncate_floats() {
        let config = SpeechGateConfig::from_raw(&raw(json!({
            "max_length": "80",
            "min_length": 2.9,
        })));
        assert_eq!(config.max_length(), 80);
        assert_eq!(config.min_length(), 2);
    }

    #[test]
    fn invalid_length_uses_default() {
        let config = SpeechGateConfig::from_raw(&raw(json!({
            "max_length": [1, 2],
            "min_length": "five",
        })));
        assert_eq!(config.max_length(), DEFAULT_MAX_LENGTH);
        assert_eq!(config.min_length(), DEFAULT_MIN_LENGTH);
    }

    #[test]
    fn string_fields_fall_back_when_empty() {
        let config = SpeechGateConfig::from_raw(&raw(json!({
            "cluster": "",
            "uid": 12345,
            "appid": "  app-1 ",
            "url": null,
        })));
        assert_eq!(config.cluster(), DEFAULT_CLUSTER);
        assert_eq!(config.uid(), "12345");
        assert_eq!(config.appid(), "app-1");
        assert_eq!(config.url(), DEFAULT_URL);
    }

    #[test]
    fn enable_flag_accepts_common_spellings() {
        for (value, expected) in [
            (json!(true), true),
            (json!("yes"), true),
            (json!(1), true),
            (json!("OFF"), false),
            (json!(0), false),
            (json!("maybe"), false),
        ] {
            let config = SpeechGateConfig::from_raw(&raw(json!({ "enable_tts": value })));
            assert_eq!(config.enable_tts(), expected, "value {value}");
        }
    }

    #[test]
    fn debug_output_redacts_token() {
        let config = SpeechGateConfig::from_raw(&raw(json!({ "access_token": "s3cret" })));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("access_token: \"..\""));
    }

    #[test]
    fn overrides_replace_file_values_and_skip_blanks() {
        let mut map = raw(json!({ "appid": "from-file", "voice_type": "S_file" }));
        apply_overrides_from(&mut map, |name| match name {
            "SPEECHGATE_APPID" => Some("from-env".to_string()),
            "SPEECHGATE_VOICE_TYPE" => Some("  ".to_string()),
            _ => None,
        });

        let config = SpeechGateConfig::from_raw(&map);
        assert_eq!(config.appid(), "from-env");
        assert_eq!(config.voice_type(), "S_file");
    }

    #[test]
    fn toml_documents_load_through_the_same_validation() {
        let config = SpeechGateConfig::from_toml_str(
            r#"
            enable_tts = true
            tts_probability = "not a number"
            max_length = 120
            appid = "app"
            access_token = "token"
            voice_type = "S_voice"
            speed_ratio = 1.2
            "#,
        )
        .unwrap();

        assert!(config.enable_tts());
        assert_eq!(config.tts_probability(), 100.0);
        assert_eq!(config.max_length(), 120);
        assert_eq!(config.speed_ratio(), 1.2);
        assert!(config.missing_credentials().is_empty());
    }

    #[test]
    fn malformed_toml_is_a_configuration_error() {
        let err = SpeechGateConfig::from_toml_str("enable_tts = = true").unwrap_err();
        assert!(matches!(err, SpeechGateError::Configuration(_)));
    }
}
