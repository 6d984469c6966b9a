//! CLI command handlers.

use std::path::Path;

use serde_json::Value;

use super::{CheckConfigArgs, SpeakArgs};
use crate::config::{apply_env_overrides, RawConfig, SpeechGateConfig};
use crate::error::Result;
use crate::plugin::{DecorateOutcome, OutgoingReply, Plugin, SpeechGate};
use crate::types::{MessageResult, Segment};

/// Read the optional settings file and layer env overrides on top.
fn load_raw(path: Option<&Path>) -> Result<RawConfig> {
    let mut raw = match path {
        Some(path) => SpeechGateConfig::raw_from_file(path)?,
        None => RawConfig::new(),
    };
    apply_env_overrides(&mut raw);
    Ok(raw)
}

/// Handle `speechgate speak <text>`.
pub async fn handle_speak(args: &SpeakArgs) -> Result<()> {
    let mut raw = load_raw(args.config.as_deref())?;
    if args.force {
        raw.insert("enable_tts".to_string(), Value::Bool(true));
        raw.insert("tts_probability".to_string(), Value::from(100));
    }

    let gate = SpeechGate::from_raw(&raw);
    gate.initialize().await;

    let mut reply = OutgoingReply::new(MessageResult::new(vec![Segment::text(&args.text)]));
    let outcome = gate.decorate(&mut reply).await;
    gate.terminate().await;

    let audio = reply
        .result
        .as_ref()
        .and_then(|result| result.chain.first())
        .and_then(|segment| match segment {
            Segment::Audio(audio) => Some(audio),
            _ => None,
        });

    match (outcome, audio) {
        (DecorateOutcome::Replaced, Some(audio)) => {
            let bytes = audio.decode()?;
            std::fs::write(&args.out, &bytes)?;
            println!("Wrote {} bytes of {} to {}", bytes.len(), audio.format, args.out.display());
        }
        (DecorateOutcome::Failed(category), _) => {
            eprintln!("Synthesis failed ({category}); the reply stays text");
        }
        (outcome, _) => {
            println!("Reply kept as text: {outcome:?}");
        }
    }

    Ok(())
}

/// Handle `speechgate check-config`.
pub fn handle_check_config(args: &CheckConfigArgs) -> Result<()> {
    let config = SpeechGateConfig::from_raw(&load_raw(args.config.as_deref())?);
    println!("{config:#?}");

    let missing = config.missing_credentials();
    if missing.is_empty() {
        println!("All required credentials are set.");
    } else {
        println!("Missing credentials: {}", missing.join(", "));
    }
    Ok(())
}
