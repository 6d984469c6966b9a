//! SpeechGate CLI binary entry point.

use clap::Parser;
use speechgate::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Speak(args) => speechgate::cli::commands::handle_speak(&args).await,
        Commands::CheckConfig(args) => speechgate::cli::commands::handle_check_config(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e} (hint: {})", e.recovery_suggestion());
        std::process::exit(1);
    }
}
