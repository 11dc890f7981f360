use thiserror::Error;

/// Top-level error type for the assistant.
///
/// Subsystem crates define their own error types and convert to or from
/// `JarvisError` at crate boundaries so that `?` works across them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JarvisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("System probe error: {0}")]
    SystemProbe(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for JarvisError {
    fn from(err: toml::de::Error) -> Self {
        JarvisError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for JarvisError {
    fn from(err: toml::ser::Error) -> Self {
        JarvisError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for JarvisError {
    fn from(err: serde_json::Error) -> Self {
        JarvisError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for assistant operations.
pub type Result<T> = std::result::Result<T, JarvisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(JarvisError, &str)> = vec![
            (
                JarvisError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                JarvisError::Speech("engine busy".to_string()),
                "Speech error: engine busy",
            ),
            (
                JarvisError::SystemProbe("no /proc".to_string()),
                "System probe error: no /proc",
            ),
            (
                JarvisError::Storage("disk full".to_string()),
                "Storage error: disk full",
            ),
            (
                JarvisError::Serialization("invalid json".to_string()),
                "Serialization error: invalid json",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: JarvisError = io_err.into();
        assert!(matches!(err, JarvisError::Io(_)));
        assert!(err.to_string().starts_with("I/O error:"));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let err: JarvisError = err.unwrap_err().into();
        assert!(matches!(err, JarvisError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let err: JarvisError = err.unwrap_err().into();
        assert!(matches!(err, JarvisError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let value = io_result?;
            Ok(value.to_string())
        }

        assert_eq!(inner().unwrap(), "42");
    }
}
