//! Routes a classified utterance to its handler.

use jarvis_core::types::{ClassificationResult, IntentCategory};
use jarvis_system::SystemProbe;

use crate::error::DispatchError;
use crate::handler::{
    self, control, system_info, FILE_OPERATION_RESPONSE, GREETING_RESPONSE, QUERY_RESPONSE,
    UNKNOWN_RESPONSE,
};

/// Exhaustive router over `IntentCategory`.
///
/// Handlers that inspect the wording (system info, control) see the raw
/// input unless `normalize_handler_text` is set, in which case they see the
/// classifier's normalized text.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandDispatcher {
    normalize_handler_text: bool,
}

impl CommandDispatcher {
    pub fn new(normalize_handler_text: bool) -> Self {
        Self {
            normalize_handler_text,
        }
    }

    /// Produce the reply text for one utterance.
    ///
    /// Only `SystemInfo` reads from `probe`; a probe failure is returned as
    /// `DispatchError::SystemProbeUnavailable` for the caller to recover from.
    pub async fn dispatch(
        &self,
        original_text: &str,
        classification: &ClassificationResult,
        probe: &dyn SystemProbe,
    ) -> Result<String, DispatchError> {
        let text = if self.normalize_handler_text {
            classification.normalized_text.as_str()
        } else {
            original_text
        };

        let reply = match classification.intent {
            IntentCategory::Greeting => GREETING_RESPONSE.to_string(),
            IntentCategory::SystemInfo => system_info::respond(text, probe).await?,
            IntentCategory::FileOperation => FILE_OPERATION_RESPONSE.to_string(),
            IntentCategory::Control => control::respond(text).to_string(),
            IntentCategory::Query => QUERY_RESPONSE.to_string(),
            IntentCategory::Unknown => UNKNOWN_RESPONSE.to_string(),
        };

        tracing::debug!(intent = %classification.intent, "Dispatched");
        Ok(reply)
    }

    /// Reply used in place of a system-info answer when the probe fails.
    pub fn degraded_reply(&self, err: &DispatchError) -> String {
        tracing::warn!(error = %err, "System info degraded");
        handler::SYSTEM_INFO_UNAVAILABLE_RESPONSE.to_string()
    }
}
