//! Append-only interaction log.
//!
//! `JsonFileLog` serializes writers through a mutex. The rewrite goes to a
//! sibling temp file that is renamed over the log, so a crash mid-write
//! leaves the previous history intact instead of a truncated file.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use jarvis_core::error::JarvisError;
use jarvis_core::types::InteractionRecord;

/// Ordered, append-only store of interaction records.
pub trait InteractionLog: Send + Sync {
    /// Append one record to the end of the log.
    fn append(&self, record: &InteractionRecord) -> Result<(), JarvisError>;

    /// All records in insertion order.
    fn read_all(&self) -> Result<Vec<InteractionRecord>, JarvisError>;
}

// =============================================================================
// JSON file
// =============================================================================

/// Interaction log persisted as a pretty-printed JSON array.
#[derive(Debug)]
pub struct JsonFileLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write `content` to the temp file and rename it over the log. The temp
    /// file is removed if either step fails.
    fn replace_contents(&self, content: &str) -> Result<(), JarvisError> {
        let tmp = self.temp_path();
        let result =
            std::fs::write(&tmp, content).and_then(|()| std::fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            if let Err(cleanup) = std::fs::remove_file(&tmp) {
                warn!(path = %tmp.display(), error = %cleanup, "Failed to remove temp log file");
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Read the existing array. A missing or empty file is an empty log; a
    /// file that does not parse is an error and is left untouched.
    fn load(&self) -> Result<Vec<InteractionRecord>, JarvisError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            JarvisError::Serialization(format!(
                "conversation log {} is not a JSON array of records: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl InteractionLog for JsonFileLog {
    fn append(&self, record: &InteractionRecord) -> Result<(), JarvisError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| JarvisError::Storage(format!("log lock poisoned: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut records = self.load()?;
        records.push(record.clone());

        let content = serde_json::to_string_pretty(&records)?;
        self.replace_contents(&content)?;

        debug!(path = %self.path.display(), count = records.len(), "Interaction saved");
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<InteractionRecord>, JarvisError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| JarvisError::Storage(format!("log lock poisoned: {}", e)))?;
        self.load()
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Volatile log (for testing).
#[derive(Debug, Default)]
pub struct InMemoryLog {
    records: Mutex<Vec<InteractionRecord>>,
}

impl InMemoryLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InteractionLog for InMemoryLog {
    fn append(&self, record: &InteractionRecord) -> Result<(), JarvisError> {
        self.records
            .lock()
            .map_err(|e| JarvisError::Storage(format!("log lock poisoned: {}", e)))?
            .push(record.clone());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<InteractionRecord>, JarvisError> {
        Ok(self
            .records
            .lock()
            .map_err(|e| JarvisError::Storage(format!("log lock poisoned: {}", e)))?
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(i: usize) -> InteractionRecord {
        InteractionRecord::now(format!("input {}", i), format!("response {}", i))
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonFileLog::new(dir.path().join("conversations.json"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_preserves_order_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonFileLog::new(dir.path().join("conversations.json"));

        let written: Vec<_> = (0..5).map(record).collect();
        for r in &written {
            log.append(r).unwrap();
        }

        let read = log.read_all().unwrap();
        assert_eq!(read, written);
    }

    #[test]
    fn test_file_is_json_array_with_snake_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversations.json");
        let log = JsonFileLog::new(&path);
        log.append(&InteractionRecord::now("hello", "Good to see you."))
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let arr = raw.as_array().unwrap();
        assert_eq!(arr.len(), 1);
        assert_eq!(arr[0]["user_input"], "hello");
        assert_eq!(arr[0]["response"], "Good to see you.");
        assert!(arr[0]["timestamp"].is_string());
    }

    #[test]
    fn test_appends_to_existing_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversations.json");
        std::fs::write(
            &path,
            r#"[{"timestamp":"2024-01-01T10:00:00.000000","user_input":"hi","response":"hey"}]"#,
        )
        .unwrap();

        let log = JsonFileLog::new(&path);
        log.append(&record(1)).unwrap();

        let read = log.read_all().unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].user_input, "hi");
        assert_eq!(read[1].user_input, "input 1");
    }

    #[test]
    fn test_empty_file_treated_as_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversations.json");
        std::fs::write(&path, "").unwrap();

        let log = JsonFileLog::new(&path);
        log.append(&record(0)).unwrap();
        assert_eq!(log.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversations.json");
        // A non-empty directory at the log path makes the rename fail.
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();
        let log = JsonFileLog::new(&path);

        let err = log.replace_contents("[]").unwrap_err();
        assert!(matches!(err, JarvisError::Io(_)));
        assert!(!dir.path().join("conversations.json.tmp").exists());
        assert!(path.join("occupied").exists());
    }

    #[test]
    fn test_corrupt_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversations.json");
        std::fs::write(&path, "{ not json").unwrap();

        let log = JsonFileLog::new(&path);
        let err = log.append(&record(0)).unwrap_err();
        assert!(matches!(err, JarvisError::Serialization(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("log.json");
        let log = JsonFileLog::new(&path);
        log.append(&record(0)).unwrap();
        assert!(path.exists());
        assert!(!log.temp_path().exists());
    }

    #[test]
    fn test_concurrent_writers_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(JsonFileLog::new(dir.path().join("conversations.json")));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let log = Arc::clone(&log);
                std::thread::spawn(move || {
                    for i in 0..10 {
                        log.append(&record(t * 100 + i)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(log.read_all().unwrap().len(), 40);
    }

    #[test]
    fn test_in_memory_log() {
        let log = InMemoryLog::new();
        log.append(&record(1)).unwrap();
        log.append(&record(2)).unwrap();
        let read = log.read_all().unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[1].response, "response 2");
    }
}
