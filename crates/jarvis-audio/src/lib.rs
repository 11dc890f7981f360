//! Jarvis Audio crate - speech capture, speech output, backend negotiation.
//!
//! Provides the `SpeechIO` abstraction the conversation loop talks to, an
//! engine built on external recogniser/synthesiser programs, and a scripted
//! implementation for testing without audio hardware.

pub mod engine;
pub mod error;
pub mod instructions;
pub mod recognizer;
pub mod synth;

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

pub use engine::SpeechEngine;
pub use error::SpeechError;
pub use instructions::install_instructions;
pub use recognizer::CommandRecognizer;
pub use synth::{CommandSynthesizer, SpeakOutcome, Synthesizer};

// =============================================================================
// Trait
// =============================================================================

/// Identifies the capture backend negotiated at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendId(pub String);

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Narrow speech interface used by the conversation loop.
#[async_trait]
pub trait SpeechIO: Send + Sync {
    /// Capture backend, if any. Resolved once at construction.
    fn backend(&self) -> Option<BackendId>;

    /// Block up to `timeout` for one utterance. Silence, timeout and
    /// recognition failure all yield `None`.
    async fn listen(&self, timeout: Duration) -> Option<String>;

    /// Speak `text`. Never fails from the caller's point of view.
    async fn speak(&self, text: &str);

    /// Guidance for enabling voice input on this platform. Display only.
    fn install_instructions(&self) -> String;
}

// =============================================================================
// Scripted implementation
// =============================================================================

/// Scripted speech for testing.
///
/// `listen` pops the next scripted result. Once the script is exhausted it
/// signals `exhausted()` and then never returns, like a silent microphone
/// whose caller must be interrupted. Everything spoken is recorded.
#[derive(Debug)]
pub struct ScriptedSpeech {
    backend: Option<BackendId>,
    heard: Mutex<VecDeque<Option<String>>>,
    spoken: Mutex<Vec<String>>,
    listens: AtomicUsize,
    exhausted: Notify,
}

impl ScriptedSpeech {
    /// Speech with a capture backend and the given listen results.
    pub fn voice<I, S>(script: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            backend: Some(BackendId("scripted".to_string())),
            heard: Mutex::new(script.into_iter().map(|s| s.map(Into::into)).collect()),
            spoken: Mutex::new(Vec::new()),
            listens: AtomicUsize::new(0),
            exhausted: Notify::new(),
        }
    }

    /// Speech with no capture backend.
    pub fn text_only() -> Self {
        Self {
            backend: None,
            ..Self::voice(Vec::<Option<String>>::new())
        }
    }

    /// Everything passed to `speak`, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Number of `listen` calls made so far.
    pub fn listens(&self) -> usize {
        self.listens.load(Ordering::SeqCst)
    }

    /// Resolves once a `listen` call has found the script empty.
    pub async fn exhausted(&self) {
        self.exhausted.notified().await
    }
}

#[async_trait]
impl SpeechIO for ScriptedSpeech {
    fn backend(&self) -> Option<BackendId> {
        self.backend.clone()
    }

    async fn listen(&self, _timeout: Duration) -> Option<String> {
        self.listens.fetch_add(1, Ordering::SeqCst);
        let next = self.heard.lock().ok().and_then(|mut h| h.pop_front());
        match next {
            Some(result) => result,
            None => {
                self.exhausted.notify_one();
                std::future::pending().await
            }
        }
    }

    async fn speak(&self, text: &str) {
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(text.to_string());
        }
    }

    fn install_instructions(&self) -> String {
        "install a recogniser".to_string()
    }
}
