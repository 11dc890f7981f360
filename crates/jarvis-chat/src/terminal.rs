//! Line-oriented console used by text mode.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Notify;

/// Source of typed input and sink for user-facing guidance.
#[async_trait]
pub trait Terminal: Send + Sync {
    /// Show `prompt` and read one line. `None` means end of input.
    async fn read_line(&self, prompt: &str) -> Option<String>;

    /// Print a block of text for the user.
    fn show(&self, text: &str);
}

// =============================================================================
// Stdin
// =============================================================================

pub struct StdinTerminal {
    lines: tokio::sync::Mutex<Lines<BufReader<Stdin>>>,
}

impl Default for StdinTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl StdinTerminal {
    pub fn new() -> Self {
        Self {
            lines: tokio::sync::Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

#[async_trait]
impl Terminal for StdinTerminal {
    async fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = std::io::stdout().flush();

        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read from stdin, treating as end of input");
                None
            }
        }
    }

    fn show(&self, text: &str) {
        println!("{}", text);
    }
}

// =============================================================================
// Scripted
// =============================================================================

/// Terminal fed from a fixed list of lines, for testing.
///
/// By default an exhausted script reads as end of input. With `hold_open`
/// it instead signals `exhausted()` and blocks, like an idle user.
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    lines: Mutex<VecDeque<String>>,
    shown: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
    hold_open: bool,
    exhausted: Notify,
}

impl ScriptedTerminal {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: Mutex::new(lines.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    /// Text passed to `show`, in order.
    pub fn shown(&self) -> Vec<String> {
        self.shown.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Prompts displayed so far, one per `read_line` call.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Resolves once a held-open terminal has run out of lines.
    pub async fn exhausted(&self) {
        self.exhausted.notified().await
    }
}

#[async_trait]
impl Terminal for ScriptedTerminal {
    async fn read_line(&self, prompt: &str) -> Option<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let next = self.lines.lock().ok().and_then(|mut l| l.pop_front());
        match next {
            Some(line) => Some(line),
            None if self.hold_open => {
                self.exhausted.notify_one();
                std::future::pending().await
            }
            None => None,
        }
    }

    fn show(&self, text: &str) {
        if let Ok(mut shown) = self.shown.lock() {
            shown.push(text.to_string());
        }
    }
}
