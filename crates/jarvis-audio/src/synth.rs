//! Speech synthesis with one retry and a console fallback.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use jarvis_core::config::VoiceConfig;

use crate::error::SpeechError;
use crate::recognizer::find_on_path;

/// Text-to-speech engine.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Speak `text`, returning once playback finishes.
    async fn say(&self, text: &str) -> Result<(), SpeechError>;

    /// Reinitialise the engine after a failure. No-op by default.
    async fn reset(&self) {}
}

/// How a `speak` call was ultimately delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    Spoken,
    SpokenAfterRetry,
    /// Synthesis failed twice, or there is no synthesiser; text went to stdout.
    Printed,
}

/// Speak through `synth`, retrying once after a reset, then printing.
///
/// Never fails: the conversation must not abort because output failed.
pub async fn speak_or_print(
    synth: Option<&dyn Synthesizer>,
    speaker_name: &str,
    text: &str,
) -> SpeakOutcome {
    let Some(synth) = synth else {
        println!("{}: {}", speaker_name, text);
        return SpeakOutcome::Printed;
    };

    match synth.say(text).await {
        Ok(()) => return SpeakOutcome::Spoken,
        Err(e) => tracing::debug!(error = %e, "Synthesis failed, resetting engine"),
    }

    synth.reset().await;
    match synth.say(text).await {
        Ok(()) => SpeakOutcome::SpokenAfterRetry,
        Err(e) => {
            tracing::warn!(error = %e, "Synthesis failed after retry, printing instead");
            println!("{}: {}", speaker_name, text);
            SpeakOutcome::Printed
        }
    }
}

// =============================================================================
// External program
// =============================================================================

/// Synthesiser that runs an external program with the text as last argument.
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandSynthesizer {
    /// Build from config. Uses `tts_command` when set, otherwise the platform
    /// default (`say` on macOS, `espeak` elsewhere). Returns `None` when the
    /// program is not installed.
    pub fn from_config(voice: &VoiceConfig) -> Option<Self> {
        let (program, args) = match &voice.tts_command {
            Some(cmd) => (cmd.clone(), voice.tts_args.clone()),
            None => default_command(voice)?,
        };
        let resolved = find_on_path(&program);
        if resolved.is_none() {
            tracing::info!(program = %program, "Speech synthesiser not found");
        }
        Some(Self {
            program: resolved?,
            args,
        })
    }

    pub fn new(program: PathBuf, args: Vec<String>) -> Self {
        Self { program, args }
    }
}

#[async_trait]
impl Synthesizer for CommandSynthesizer {
    async fn say(&self, text: &str) -> Result<(), SpeechError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| SpeechError::Synthesis(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(SpeechError::Synthesis(format!(
                "{} exited with {}",
                self.program.display(),
                status
            )))
        }
    }
}

/// Platform default synthesiser and its rate/volume arguments.
fn default_command(voice: &VoiceConfig) -> Option<(String, Vec<String>)> {
    if cfg!(target_os = "macos") {
        Some((
            "say".to_string(),
            vec!["-r".to_string(), voice.rate.to_string()],
        ))
    } else if cfg!(target_os = "windows") {
        None
    } else {
        // espeak amplitude runs 0..=200.
        let amplitude = (voice.volume.clamp(0.0, 1.0) * 200.0).round() as u32;
        Some((
            "espeak".to_string(),
            vec![
                "-s".to_string(),
                voice.rate.to_string(),
                "-a".to_string(),
                amplitude.to_string(),
            ],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails the first `failures` calls, then succeeds.
    struct FlakySynth {
        failures: usize,
        calls: AtomicUsize,
        resets: AtomicUsize,
    }

    impl FlakySynth {
        fn new(failures: usize) -> Self {
            Self {
                failures,
                calls: AtomicUsize::new(0),
                resets: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Synthesizer for FlakySynth {
        async fn say(&self, _text: &str) -> Result<(), SpeechError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(SpeechError::Synthesis("run loop already started".into()))
            } else {
                Ok(())
            }
        }

        async fn reset(&self) {
            self.resets.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_speaks_first_time() {
        let synth = FlakySynth::new(0);
        let outcome = speak_or_print(Some(&synth), "JARVIS", "hello").await;
        assert_eq!(outcome, SpeakOutcome::Spoken);
        assert_eq!(synth.calls.load(Ordering::SeqCst), 1);
        assert_eq!(synth.resets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_retries_once_after_reset() {
        let synth = FlakySynth::new(1);
        let outcome = speak_or_print(Some(&synth), "JARVIS", "hello").await;
        assert_eq!(outcome, SpeakOutcome::SpokenAfterRetry);
        assert_eq!(synth.calls.load(Ordering::SeqCst), 2);
        assert_eq!(synth.resets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_prints_after_second_failure() {
        let synth = FlakySynth::new(5);
        let outcome = speak_or_print(Some(&synth), "JARVIS", "hello").await;
        assert_eq!(outcome, SpeakOutcome::Printed);
        assert_eq!(synth.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_prints_without_synthesizer() {
        let outcome = speak_or_print(None, "JARVIS", "hello").await;
        assert_eq!(outcome, SpeakOutcome::Printed);
    }

    #[test]
    fn test_default_command_args() {
        let voice = VoiceConfig::default();
        match default_command(&voice) {
            Some((program, args)) if program == "espeak" => {
                assert_eq!(args, vec!["-s", "150", "-a", "180"]);
            }
            Some((program, args)) => {
                assert_eq!(program, "say");
                assert_eq!(args, vec!["-r", "150"]);
            }
            None => assert!(cfg!(target_os = "windows")),
        }
    }

    #[test]
    fn test_from_config_missing_program() {
        let voice = VoiceConfig {
            tts_command: Some("jarvis-no-such-tts-xyz".to_string()),
            ..VoiceConfig::default()
        };
        assert!(CommandSynthesizer::from_config(&voice).is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_synthesizer_exit_status() {
        let ok = CommandSynthesizer::new(PathBuf::from("/bin/sh"), vec!["-c".into(), "exit 0".into()]);
        assert!(ok.say("hello").await.is_ok());

        let failing =
            CommandSynthesizer::new(PathBuf::from("/bin/sh"), vec!["-c".into(), "exit 1".into()]);
        let err = failing.say("hello").await.unwrap_err();
        assert!(matches!(err, SpeechError::Synthesis(_)));
    }
}
