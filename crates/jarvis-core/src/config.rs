use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{JarvisError, Result};

/// Top-level configuration for the assistant.
///
/// Loaded from `~/.jarvis/config.toml` by default. Built once at startup and
/// handed to each component by value; nothing reads it from ambient state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JarvisConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
}

impl JarvisConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: JarvisConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| JarvisError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Absolute path of the conversation log, with `~` expanded.
    pub fn conversation_log_path(&self) -> PathBuf {
        self.general
            .data_dir_path()
            .join(&self.conversation.log_file)
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Assistant name used in spoken greetings and log lines.
    pub name: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Directory holding the conversation log.
    pub data_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            name: "JARVIS".to_string(),
            log_level: "info".to_string(),
            data_dir: "~/.jarvis".to_string(),
        }
    }
}

impl GeneralConfig {
    /// `data_dir` with a leading `~` expanded to the home directory.
    pub fn data_dir_path(&self) -> PathBuf {
        expand_home(&self.data_dir)
    }
}

/// Speech capture and synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Speaking rate in words per minute.
    pub rate: u32,
    /// Output volume, 0.0 to 1.0.
    pub volume: f32,
    /// Maximum seconds a single listen may block.
    pub listen_timeout_secs: u64,
    /// External recogniser program. It must record from the microphone and
    /// print the transcript on stdout. Voice mode is unavailable when unset
    /// or not found on `PATH`.
    pub capture_command: Option<String>,
    /// Extra arguments passed to the recogniser.
    pub capture_args: Vec<String>,
    /// External synthesiser program. A platform default is used when unset.
    pub tts_command: Option<String>,
    /// Extra arguments passed to the synthesiser before the text.
    pub tts_args: Vec<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            rate: 150,
            volume: 0.9,
            listen_timeout_secs: 30,
            capture_command: None,
            capture_args: Vec::new(),
            tts_command: None,
            tts_args: Vec::new(),
        }
    }
}

/// Conversation loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Conversation log file name, relative to `general.data_dir`.
    pub log_file: String,
    /// Phrases that end a text-mode session (compared trimmed, case-insensitive).
    pub exit_phrases: Vec<String>,
    /// Run handler keyword checks (cpu, memory, shutdown, ...) against the
    /// normalized text instead of the raw input.
    pub normalize_handler_text: bool,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            log_file: "conversations.json".to_string(),
            exit_phrases: vec![
                "exit".to_string(),
                "quit".to_string(),
                "shutdown".to_string(),
                "power down".to_string(),
            ],
            normalize_handler_text: false,
        }
    }
}

/// Expand a leading `~/` to the current user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" || path.starts_with("~/") || path.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let rest = path.get(2..).unwrap_or("");
        PathBuf::from(home).join(rest)
    } else {
        PathBuf::from(path)
    }
}
