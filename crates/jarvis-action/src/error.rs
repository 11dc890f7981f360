//! Error types for command dispatch.

use jarvis_core::error::JarvisError;

/// Errors from routing a classified utterance to its handler.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("System probe unavailable: {0}")]
    SystemProbeUnavailable(String),
}

impl From<JarvisError> for DispatchError {
    fn from(err: JarvisError) -> Self {
        match err {
            JarvisError::SystemProbe(msg) => DispatchError::SystemProbeUnavailable(msg),
            other => DispatchError::SystemProbeUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_error_display() {
        let err = DispatchError::SystemProbeUnavailable("no sensors".to_string());
        assert_eq!(err.to_string(), "System probe unavailable: no sensors");
    }

    #[test]
    fn test_from_probe_error_keeps_message() {
        let err: DispatchError = JarvisError::SystemProbe("cpu offline".to_string()).into();
        assert_eq!(err.to_string(), "System probe unavailable: cpu offline");
    }

    #[test]
    fn test_from_other_error_is_still_probe_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "/proc/stat");
        let err: DispatchError = JarvisError::Io(io).into();
        assert!(matches!(err, DispatchError::SystemProbeUnavailable(_)));
        assert!(err.to_string().contains("/proc/stat"));
    }
}
