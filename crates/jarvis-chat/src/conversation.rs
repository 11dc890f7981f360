//! The conversation loop: read, classify, dispatch, respond, log.
//!
//! Mode is decided once when the loop starts. Text mode reads lines from a
//! `Terminal`; voice mode blocks on `SpeechIO::listen`. Interactions are
//! strictly sequential, and the interrupt signal is only observed while
//! waiting for input, so a half-processed interaction is never abandoned
//! or logged.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};
use uuid::Uuid;

use jarvis_action::{CommandDispatcher, IntentClassifier};
use jarvis_audio::SpeechIO;
use jarvis_core::config::JarvisConfig;
use jarvis_core::types::InteractionRecord;
use jarvis_storage::InteractionLog;
use jarvis_system::SystemProbe;

use crate::error::ConversationError;
use crate::shutdown::ShutdownSignal;
use crate::state::{LoopState, StateMachine};
use crate::terminal::Terminal;

pub const TEXT_PROMPT: &str = "You: ";
pub const FAREWELL: &str = "Powering down. Goodbye sir.";
pub const TEXT_MODE_ANNOUNCEMENT: &str =
    "Voice input not available. Switching to text mode. Type your commands.";
pub const VOICE_HELP_HEADING: &str = "=== How to enable voice input ===";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Text,
    Voice,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Text => write!(f, "text"),
            Mode::Voice => write!(f, "voice"),
        }
    }
}

/// What ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    ExitPhrase,
    Interrupted,
    EndOfInput,
}

/// Outcome of one `run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub mode: Mode,
    /// Interactions that were classified, answered and handed to the log.
    pub interactions: usize,
    pub stop_reason: StopReason,
}

pub struct ConversationLoop {
    config: JarvisConfig,
    speech: Arc<dyn SpeechIO>,
    probe: Arc<dyn SystemProbe>,
    log: Arc<dyn InteractionLog>,
    terminal: Arc<dyn Terminal>,
    classifier: IntentClassifier,
    dispatcher: CommandDispatcher,
    shutdown: ShutdownSignal,
    force_text: bool,
    state: StateMachine,
    session_id: Uuid,
}

impl ConversationLoop {
    pub fn new(
        config: JarvisConfig,
        speech: Arc<dyn SpeechIO>,
        probe: Arc<dyn SystemProbe>,
        log: Arc<dyn InteractionLog>,
        terminal: Arc<dyn Terminal>,
    ) -> Self {
        let dispatcher = CommandDispatcher::new(config.conversation.normalize_handler_text);
        Self {
            config,
            speech,
            probe,
            log,
            terminal,
            classifier: IntentClassifier::new(),
            dispatcher,
            shutdown: ShutdownSignal::new(),
            force_text: false,
            state: StateMachine::new(),
            session_id: Uuid::new_v4(),
        }
    }

    /// Use `signal` as the interrupt source.
    pub fn with_shutdown(mut self, signal: ShutdownSignal) -> Self {
        self.shutdown = signal;
        self
    }

    /// Run in text mode even when a capture backend is available.
    pub fn force_text_mode(mut self, force: bool) -> Self {
        self.force_text = force;
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> LoopState {
        self.state.current()
    }

    pub fn select_mode(&self) -> Mode {
        if self.force_text || self.speech.backend().is_none() {
            Mode::Text
        } else {
            Mode::Voice
        }
    }

    /// Greet, pick a mode, converse until stopped, then say goodbye.
    ///
    /// A loop runs once; a second call fails with `InvalidTransition`.
    pub async fn run(&self) -> Result<SessionSummary, ConversationError> {
        self.state.transition(LoopState::Running)?;
        let mode = self.select_mode();
        info!(session_id = %self.session_id, mode = %mode, "Conversation started");

        self.speech
            .speak(&format!(
                "Hello sir. {} online. Ready to assist.",
                self.config.general.name
            ))
            .await;

        let (interactions, stop_reason) = match mode {
            Mode::Text => self.run_text().await,
            Mode::Voice => self.run_voice().await,
        };

        self.state.transition(LoopState::Stopped)?;
        self.speech.speak(FAREWELL).await;
        info!(
            session_id = %self.session_id,
            interactions,
            reason = ?stop_reason,
            "Conversation stopped"
        );

        Ok(SessionSummary {
            session_id: self.session_id,
            mode,
            interactions,
            stop_reason,
        })
    }

    async fn run_text(&self) -> (usize, StopReason) {
        if self.speech.backend().is_none() {
            self.speech.speak(TEXT_MODE_ANNOUNCEMENT).await;
            self.terminal.show(&format!(
                "Voice input is not available on this system. Running in text mode.\n\n{}\n{}",
                VOICE_HELP_HEADING,
                self.speech.install_instructions()
            ));
        } else {
            self.terminal.show("Text mode selected. Type your commands.");
        }

        let mut interactions = 0;
        loop {
            let line = tokio::select! {
                biased;
                _ = self.shutdown.wait() => return (interactions, StopReason::Interrupted),
                line = self.terminal.read_line(TEXT_PROMPT) => match line {
                    Some(line) => line,
                    None => return (interactions, StopReason::EndOfInput),
                },
            };

            if line.is_empty() {
                continue;
            }
            if self.is_exit_phrase(line.trim()) {
                debug!(session_id = %self.session_id, "Exit phrase received");
                return (interactions, StopReason::ExitPhrase);
            }

            self.handle(&line).await;
            interactions += 1;
        }
    }

    async fn run_voice(&self) -> (usize, StopReason) {
        let timeout = Duration::from_secs(self.config.voice.listen_timeout_secs);
        let mut interactions = 0;
        loop {
            let heard = tokio::select! {
                biased;
                _ = self.shutdown.wait() => return (interactions, StopReason::Interrupted),
                heard = self.speech.listen(timeout) => heard,
            };

            // Silence, timeout and recognition failure all skip the cycle.
            let Some(text) = heard else {
                continue;
            };
            self.handle(&text).await;
            interactions += 1;
        }
    }

    fn is_exit_phrase(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.config
            .conversation
            .exit_phrases
            .iter()
            .any(|phrase| phrase.trim().to_lowercase() == text)
    }

    /// One full interaction. Speech and log failures are absorbed here.
    async fn handle(&self, text: &str) {
        let classification = self.classifier.classify(text);
        debug!(
            session_id = %self.session_id,
            intent = %classification.intent,
            confidence = classification.confidence,
            "Classified input"
        );

        let response = match self
            .dispatcher
            .dispatch(text, &classification, self.probe.as_ref())
            .await
        {
            Ok(reply) => reply,
            Err(e) => self.dispatcher.degraded_reply(&e),
        };

        self.speech.speak(&response).await;

        if self.state.is_running() {
            let record = InteractionRecord::now(text, response.as_str());
            if let Err(e) = self.log.append(&record) {
                error!(session_id = %self.session_id, error = %e, "Failed to log interaction");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::ScriptedTerminal;
    use jarvis_audio::ScriptedSpeech;
    use jarvis_core::types::{DiskInfo, MemoryInfo, SystemInfoSnapshot};
    use jarvis_storage::InMemoryLog;
    use jarvis_system::FixedProbe;

    fn probe() -> Arc<FixedProbe> {
        Arc::new(FixedProbe::new(SystemInfoSnapshot {
            cpu_percent: 12.5,
            memory: MemoryInfo {
                available: "3.00 GB".to_string(),
            },
            disk: DiskInfo {
                free: "50.00 GB".to_string(),
            },
            platform: "Linux".to_string(),
            cpu_count: 4,
        }))
    }

    fn text_loop(
        lines: &[&str],
    ) -> (ConversationLoop, Arc<ScriptedSpeech>, Arc<InMemoryLog>, Arc<ScriptedTerminal>) {
        let speech = Arc::new(ScriptedSpeech::text_only());
        let log = Arc::new(InMemoryLog::new());
        let terminal = Arc::new(ScriptedTerminal::new(lines.iter().copied()));
        let conversation = ConversationLoop::new(
            JarvisConfig::default(),
            speech.clone(),
            probe(),
            log.clone(),
            terminal.clone(),
        );
        (conversation, speech, log, terminal)
    }

    #[test]
    fn test_mode_selection() {
        let voice = ConversationLoop::new(
            JarvisConfig::default(),
            Arc::new(ScriptedSpeech::voice(Vec::<Option<&str>>::new())),
            probe(),
            Arc::new(InMemoryLog::new()),
            Arc::new(ScriptedTerminal::default()),
        );
        assert_eq!(voice.select_mode(), Mode::Voice);

        let forced = voice.force_text_mode(true);
        assert_eq!(forced.select_mode(), Mode::Text);

        let (text, _, _, _) = text_loop(&[]);
        assert_eq!(text.select_mode(), Mode::Text);
    }

    #[test]
    fn test_exit_phrases_are_trimmed_and_case_insensitive() {
        let (conversation, _, _, _) = text_loop(&[]);
        assert!(conversation.is_exit_phrase("EXIT"));
        assert!(conversation.is_exit_phrase("Power Down"));
        assert!(!conversation.is_exit_phrase("exit now"));
        assert!(!conversation.is_exit_phrase("shut down"));
    }

    #[tokio::test]
    async fn test_greeting_and_farewell_bracket_session() {
        let (conversation, speech, _, _) = text_loop(&["quit"]);
        conversation.run().await.unwrap();

        let spoken = speech.spoken();
        assert_eq!(spoken.first().unwrap(), "Hello sir. JARVIS online. Ready to assist.");
        assert_eq!(spoken[1], TEXT_MODE_ANNOUNCEMENT);
        assert_eq!(spoken.last().unwrap(), FAREWELL);
    }

    #[tokio::test]
    async fn test_only_empty_lines_reprompt_without_processing() {
        let (conversation, speech, log, terminal) = text_loop(&["", "", "hello"]);
        let summary = conversation.run().await.unwrap();

        assert_eq!(summary.interactions, 1);
        assert_eq!(summary.stop_reason, StopReason::EndOfInput);
        assert_eq!(log.read_all().unwrap().len(), 1);
        assert_eq!(terminal.prompts().len(), 4);
        // greeting, announcement, one response, farewell
        assert_eq!(speech.spoken().len(), 4);
    }

    #[tokio::test]
    async fn test_whitespace_only_line_is_answered_as_unknown() {
        let (conversation, speech, log, _) = text_loop(&["   "]);
        let summary = conversation.run().await.unwrap();

        assert_eq!(summary.interactions, 1);
        let records = log.read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_input, "   ");
        assert_eq!(
            records[0].response,
            "I did not understand that. Could you please repeat?"
        );
        assert!(speech
            .spoken()
            .contains(&"I did not understand that. Could you please repeat?".to_string()));
    }

    #[tokio::test]
    async fn test_text_mode_shows_install_guidance_once() {
        let (conversation, _, _, terminal) = text_loop(&["hello", "hello"]);
        conversation.run().await.unwrap();

        let shown = terminal.shown();
        assert_eq!(shown.len(), 1);
        assert!(shown[0].contains(VOICE_HELP_HEADING));
        assert!(shown[0].contains("install a recogniser"));
    }

    #[tokio::test]
    async fn test_run_twice_is_rejected() {
        let (conversation, _, _, _) = text_loop(&[]);
        conversation.run().await.unwrap();
        assert_eq!(conversation.state(), LoopState::Stopped);
        assert!(matches!(
            conversation.run().await,
            Err(ConversationError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_padded_line_is_logged_as_typed() {
        let (conversation, _, log, _) = text_loop(&["   what is the time  ", "  hello jarvis "]);
        let summary = conversation.run().await.unwrap();

        assert_eq!(summary.interactions, 2);
        let records = log.read_all().unwrap();
        assert_eq!(records[0].user_input, "   what is the time  ");
        assert_eq!(records[0].response, "I will search for that information for you");
        assert_eq!(records[1].user_input, "  hello jarvis ");
        assert_eq!(records[1].response, "Good to see you. How can I assist you today?");
    }

    #[tokio::test]
    async fn test_padded_exit_phrase_still_stops() {
        let (conversation, _, log, _) = text_loop(&["  Exit  ", "hello"]);
        let summary = conversation.run().await.unwrap();

        assert_eq!(summary.stop_reason, StopReason::ExitPhrase);
        assert!(log.read_all().unwrap().is_empty());
    }
}
