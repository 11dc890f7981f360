//! CLI argument definitions for the JARVIS binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Interaction surface requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UiMode {
    /// Voice when a capture backend is available, text otherwise.
    Voice,
    /// Always text.
    Text,
    /// Not implemented; behaves like `voice`.
    Gui,
}

/// JARVIS - a keyword-driven voice assistant for the terminal.
#[derive(Parser, Debug)]
#[command(name = "jarvis", version, about)]
pub struct CliArgs {
    /// Interaction mode.
    #[arg(long = "mode", value_enum, default_value_t = UiMode::Voice)]
    pub mode: UiMode,

    /// Print responses instead of speaking them.
    #[arg(long = "no-voice")]
    pub no_voice: bool,

    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Directory holding the conversation log.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > JARVIS_CONFIG env var > ~/.jarvis/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("JARVIS_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Whether the config path was given explicitly. A broken explicit
    /// config is fatal; a broken default one falls back to defaults.
    pub fn config_is_explicit(&self) -> bool {
        self.config.is_some() || std::env::var_os("JARVIS_CONFIG").is_some()
    }

    /// Resolve the data directory override, if any.
    pub fn resolve_data_dir(&self) -> Option<String> {
        self.data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
    }

    /// Whether text mode is forced regardless of speech capabilities.
    pub fn force_text_mode(&self) -> bool {
        match self.mode {
            UiMode::Text => true,
            UiMode::Voice => false,
            UiMode::Gui => {
                tracing::warn!("GUI mode is not implemented, falling back to voice mode");
                false
            }
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".jarvis").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".jarvis").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["jarvis"]).unwrap();
        assert_eq!(args.mode, UiMode::Voice);
        assert!(!args.no_voice);
        assert!(args.config.is_none());
        assert!(!args.force_text_mode());
    }

    #[test]
    fn test_mode_text_forces_text() {
        let args = CliArgs::try_parse_from(["jarvis", "--mode", "text"]).unwrap();
        assert!(args.force_text_mode());
    }

    #[test]
    fn test_mode_gui_falls_back_to_voice() {
        let args = CliArgs::try_parse_from(["jarvis", "--mode", "gui"]).unwrap();
        assert_eq!(args.mode, UiMode::Gui);
        assert!(!args.force_text_mode());
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(CliArgs::try_parse_from(["jarvis", "--mode", "telepathy"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let args = CliArgs::try_parse_from([
            "jarvis",
            "--no-voice",
            "-c",
            "/tmp/jarvis.toml",
            "-d",
            "/tmp/jarvis-data",
            "-l",
            "debug",
        ])
        .unwrap();
        assert!(args.no_voice);
        assert!(args.config_is_explicit());
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/jarvis.toml"));
        assert_eq!(args.resolve_data_dir().as_deref(), Some("/tmp/jarvis-data"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_default_config_path_ends_with_jarvis_dir() {
        let path = default_config_path();
        assert!(path.ends_with("config.toml"));
    }
}
