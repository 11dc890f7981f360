//! External-program speech recogniser.
//!
//! The configured program records from the microphone and prints the
//! transcript on stdout. Any wrapper around whisper.cpp, Vosk or a cloud
//! recogniser works as long as it follows that contract.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::SpeechError;

/// Locate `program` on `PATH`, or verify it directly if it contains a path separator.
pub fn find_on_path(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var).find_map(|dir| {
        let full = dir.join(program);
        if full.is_file() {
            return Some(full);
        }
        #[cfg(target_os = "windows")]
        {
            let exe = dir.join(format!("{}.exe", program));
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

/// Recogniser that shells out to an external program per listen.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandRecognizer {
    /// Resolve `program` on `PATH`. Returns `None` when it cannot be found.
    pub fn detect(program: &str, args: Vec<String>) -> Option<Self> {
        let program = find_on_path(program)?;
        Some(Self { program, args })
    }

    /// Display name of the backend (program file name).
    pub fn name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Run the program once, bounded by `timeout`. Returns lower-cased text.
    pub async fn recognize(&self, timeout: Duration) -> Result<String, SpeechError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Recognition(format!("failed to start: {}", e)))?;

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| SpeechError::Timeout(timeout.as_secs()))?
            .map_err(|e| SpeechError::Recognition(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::Recognition(format!(
                "{}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_lowercase();
        if text.is_empty() {
            return Err(SpeechError::Recognition("no speech recognised".to_string()));
        }
        Ok(text)
    }
}
