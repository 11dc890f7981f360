//! JARVIS application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Negotiate speech capabilities (recogniser, synthesiser)
//! 4. Wire the system probe and the conversation log
//! 5. Run the conversation loop until an exit phrase, Ctrl-C or end of input

mod cli;
mod error;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use jarvis_audio::SpeechEngine;
use jarvis_chat::{ConversationLoop, SessionSummary, ShutdownSignal, StdinTerminal};
use jarvis_core::config::JarvisConfig;
use jarvis_storage::JsonFileLog;
use jarvis_system::SysinfoProbe;

use crate::cli::CliArgs;
use crate::error::StartupError;

/// Load configuration, applying CLI overrides.
///
/// An explicitly requested config file must load; the default location may
/// be missing or broken, in which case defaults are used.
fn load_config(args: &CliArgs) -> Result<JarvisConfig, StartupError> {
    let path = args.resolve_config_path();
    let mut config = if args.config_is_explicit() {
        JarvisConfig::load(&path).map_err(|source| StartupError::Config {
            path: path.clone(),
            source,
        })?
    } else if path.exists() {
        JarvisConfig::load_or_default(&path)
    } else {
        JarvisConfig::default()
    };

    if let Some(dir) = args.resolve_data_dir() {
        config.general.data_dir = dir;
    }
    if let Some(ref level) = args.log_level {
        config.general.log_level = level.clone();
    }
    Ok(config)
}

/// RUST_LOG wins; otherwise the resolved config level, then `info`.
fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: CliArgs, config: JarvisConfig) -> Result<SessionSummary, StartupError> {
    tracing::info!("Starting JARVIS v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = config.general.data_dir_path();
    if let Err(source) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %source, "Failed to create data directory");
        return Err(StartupError::DataDir {
            path: data_dir,
            source,
        });
    }

    let speech = Arc::new(SpeechEngine::from_config(
        &config.general.name,
        &config.voice,
        !args.no_voice,
    ));
    let probe = Arc::new(SysinfoProbe::new());
    let log_path = config.conversation_log_path();
    tracing::info!(path = %log_path.display(), "Conversation log ready");
    let log = Arc::new(JsonFileLog::new(log_path));

    let shutdown = ShutdownSignal::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => shutdown.trigger(),
                Err(e) => tracing::warn!(error = %e, "Failed to listen for Ctrl-C"),
            }
        });
    }

    let conversation = ConversationLoop::new(
        config,
        speech,
        probe,
        log,
        Arc::new(StdinTerminal::new()),
    )
    .with_shutdown(shutdown)
    .force_text_mode(args.force_text_mode());

    Ok(conversation.run().await?)
}

fn report(err: &StartupError) -> ExitCode {
    eprintln!("Error: {}", err);
    eprintln!("{}", err.remediation());
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => return report(&e),
    };
    init_tracing(&config.general.log_level);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => return report(&StartupError::Runtime(e)),
    };

    let result = runtime.block_on(run(args, config));
    // A pending stdin read holds a blocking thread; don't wait for it.
    runtime.shutdown_background();

    match result {
        Ok(summary) => {
            tracing::info!(
                session_id = %summary.session_id,
                mode = %summary.mode,
                interactions = summary.interactions,
                "Session ended"
            );
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}
