//! Error types for speech capture and synthesis.

use jarvis_core::error::JarvisError;

/// Errors raised inside the speech subsystem.
///
/// None of these reach the conversation loop directly: `listen` collapses
/// them to "no input" and `speak` falls back to the console.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("no speech capture backend available")]
    NoBackend,
    #[error("capture device is busy")]
    CaptureBusy,
    #[error("recognition failed: {0}")]
    Recognition(String),
    #[error("listen timed out after {0} seconds")]
    Timeout(u64),
    #[error("synthesis failed: {0}")]
    Synthesis(String),
}

impl From<SpeechError> for JarvisError {
    fn from(err: SpeechError) -> Self {
        JarvisError::Speech(err.to_string())
    }
}
