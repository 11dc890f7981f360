//! Fatal startup failures and the guidance printed for each.

use std::path::PathBuf;

use jarvis_chat::ConversationError;
use jarvis_core::error::JarvisError;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to load config {path}: {source}")]
    Config { path: PathBuf, source: JarvisError },

    #[error("failed to create data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to start async runtime: {0}")]
    Runtime(std::io::Error),

    #[error("conversation failed: {0}")]
    Conversation(#[from] ConversationError),
}

impl StartupError {
    /// What the user can do about it.
    pub fn remediation(&self) -> String {
        match self {
            StartupError::Config { path, .. } => format!(
                "Fix or remove {}, or unset JARVIS_CONFIG to use the defaults.",
                path.display()
            ),
            StartupError::DataDir { .. } => {
                "Choose a writable location with --data-dir or general.data_dir.".to_string()
            }
            StartupError::Runtime(_) => {
                "Check process limits (threads, file descriptors) and try again.".to_string()
            }
            StartupError::Conversation(_) => "Restart the assistant.".to_string(),
        }
    }
}
