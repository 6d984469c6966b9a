//! CLI entry point for SpeechGate.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SpeechGate CLI
#[derive(Parser, Debug)]
#[command(name = "speechgate", version, about = "Try the SpeechGate reply decorator from a shell")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one text reply through the decorator and save any audio
    Speak(SpeakArgs),
    /// Print validated settings and missing credentials
    CheckConfig(CheckConfigArgs),
}

/// Arguments for `speechgate speak`.
#[derive(Parser, Debug)]
pub struct SpeakArgs {
    /// Reply text to decorate
    pub text: String,

    /// TOML settings file (SPEECHGATE_* env vars override it)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable the plugin and open the gate fully for this run
    #[arg(short, long)]
    pub force: bool,

    /// Where to write synthesized audio
    #[arg(short, long, default_value = "reply.mp3")]
    pub out: PathBuf,
}

/// Arguments for `speechgate check-config`.
#[derive(Parser, Debug)]
pub struct CheckConfigArgs {
    /// TOML settings file (SPEECHGATE_* env vars override it)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
