//! Speech engine composed of an optional recogniser and an optional synthesiser.
//!
//! Backend negotiation happens once, in `from_config`. A single capture lock
//! guards the microphone so a background listen can never overlap a
//! synchronous one.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use jarvis_core::config::VoiceConfig;

use crate::error::SpeechError;
use crate::instructions::install_instructions;
use crate::recognizer::CommandRecognizer;
use crate::synth::{speak_or_print, CommandSynthesizer, Synthesizer};
use crate::{BackendId, SpeechIO};

pub struct SpeechEngine {
    speaker_name: String,
    recognizer: Option<CommandRecognizer>,
    synthesizer: Option<Box<dyn Synthesizer>>,
    capture: Arc<Mutex<()>>,
}

impl std::fmt::Debug for SpeechEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechEngine")
            .field("speaker_name", &self.speaker_name)
            .field("recognizer", &self.recognizer)
            .field("has_synthesizer", &self.synthesizer.is_some())
            .finish()
    }
}

impl SpeechEngine {
    /// Negotiate capabilities from config.
    ///
    /// `speech_output` = false skips the synthesiser entirely (responses are printed).
    pub fn from_config(speaker_name: &str, voice: &VoiceConfig, speech_output: bool) -> Self {
        let recognizer = voice.capture_command.as_deref().and_then(|program| {
            let found = CommandRecognizer::detect(program, voice.capture_args.clone());
            if found.is_none() {
                tracing::warn!(program, "Configured capture command not found on PATH");
            }
            found
        });

        let synthesizer: Option<Box<dyn Synthesizer>> = if speech_output {
            CommandSynthesizer::from_config(voice).map(|s| Box::new(s) as Box<dyn Synthesizer>)
        } else {
            None
        };

        let capture = recognizer
            .as_ref()
            .map(|r| r.name())
            .unwrap_or_else(|| "none".to_string());
        tracing::info!(
            capture = %capture,
            synthesis = synthesizer.is_some(),
            "Speech capabilities negotiated"
        );

        Self::new(speaker_name, recognizer, synthesizer)
    }

    pub fn new(
        speaker_name: &str,
        recognizer: Option<CommandRecognizer>,
        synthesizer: Option<Box<dyn Synthesizer>>,
    ) -> Self {
        Self {
            speaker_name: speaker_name.to_string(),
            recognizer,
            synthesizer,
            capture: Arc::new(Mutex::new(())),
        }
    }

    async fn capture_once(recognizer: &CommandRecognizer, timeout: Duration) -> Option<String> {
        match recognizer.recognize(timeout).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!(error = %e, "Nothing recognised this cycle");
                None
            }
        }
    }

    /// Run one capture on a worker task and hand recognised text to `callback`.
    ///
    /// Fails with `CaptureBusy` if a listen is already in progress, and with
    /// `NoBackend` if there is no recogniser. Nothing is delivered when the
    /// capture yields no text.
    pub fn listen_async<F>(
        self: &Arc<Self>,
        timeout: Duration,
        callback: F,
    ) -> Result<JoinHandle<()>, SpeechError>
    where
        F: FnOnce(String) + Send + 'static,
    {
        if self.recognizer.is_none() {
            return Err(SpeechError::NoBackend);
        }
        let guard = Arc::clone(&self.capture)
            .try_lock_owned()
            .map_err(|_| SpeechError::CaptureBusy)?;

        let engine = Arc::clone(self);
        Ok(tokio::spawn(async move {
            let _guard = guard;
            let Some(recognizer) = engine.recognizer.as_ref() else {
                return;
            };
            if let Some(text) = Self::capture_once(recognizer, timeout).await {
                callback(text);
            }
        }))
    }
}

#[async_trait]
impl SpeechIO for SpeechEngine {
    fn backend(&self) -> Option<BackendId> {
        self.recognizer.as_ref().map(|r| BackendId(r.name()))
    }

    async fn listen(&self, timeout: Duration) -> Option<String> {
        let recognizer = self.recognizer.as_ref()?;
        let _guard = self.capture.lock().await;
        Self::capture_once(recognizer, timeout).await
    }

    async fn speak(&self, text: &str) {
        speak_or_print(self.synthesizer.as_deref(), &self.speaker_name, text).await;
    }

    fn install_instructions(&self) -> String {
        install_instructions(std::env::consts::OS)
    }
}
