use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};

// =============================================================================
// Intent
// =============================================================================

/// Confidence reported for any recognised (non-`Unknown`) intent.
pub const MATCHED_CONFIDENCE: f32 = 0.85;

/// Confidence reported when no keyword matched.
pub const UNKNOWN_CONFIDENCE: f32 = 0.3;

/// Coarse user-goal categories. Closed set, no runtime extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    Greeting,
    SystemInfo,
    FileOperation,
    Control,
    Query,
    Unknown,
}

impl IntentCategory {
    /// Confidence is a function of `Unknown`-ness only, never of the keyword that matched.
    pub fn confidence(&self) -> f32 {
        match self {
            IntentCategory::Unknown => UNKNOWN_CONFIDENCE,
            _ => MATCHED_CONFIDENCE,
        }
    }
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentCategory::Greeting => write!(f, "greeting"),
            IntentCategory::SystemInfo => write!(f, "system_info"),
            IntentCategory::FileOperation => write!(f, "file_operation"),
            IntentCategory::Control => write!(f, "control"),
            IntentCategory::Query => write!(f, "query"),
            IntentCategory::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for IntentCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greeting" => Ok(IntentCategory::Greeting),
            "system_info" => Ok(IntentCategory::SystemInfo),
            "file_operation" => Ok(IntentCategory::FileOperation),
            "control" => Ok(IntentCategory::Control),
            "query" => Ok(IntentCategory::Query),
            "unknown" => Ok(IntentCategory::Unknown),
            _ => Err(format!("Unknown intent category: {}", s)),
        }
    }
}

/// Output of intent classification for one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Lower-cased, trimmed input.
    pub normalized_text: String,
    pub intent: IntentCategory,
    /// Extracted entities. Always empty for now.
    pub entities: Vec<String>,
    pub confidence: f32,
}

impl ClassificationResult {
    pub fn new(normalized_text: String, intent: IntentCategory, entities: Vec<String>) -> Self {
        Self {
            normalized_text,
            intent,
            entities,
            confidence: intent.confidence(),
        }
    }
}

// =============================================================================
// Interaction log
// =============================================================================

/// One logged user-input/response pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Local time, ISO-8601 without offset (e.g. `2024-03-01T09:15:02.123456`).
    pub timestamp: String,
    pub user_input: String,
    pub response: String,
}

impl InteractionRecord {
    /// Create a record stamped with the current local time.
    pub fn now(user_input: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            user_input: user_input.into(),
            response: response.into(),
        }
    }
}

// =============================================================================
// System information
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    /// Human-readable available memory, e.g. `"7.81 GB"`.
    pub available: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskInfo {
    /// Human-readable free space on the root filesystem.
    pub free: String,
}

/// Point-in-time host metrics. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfoSnapshot {
    pub cpu_percent: f32,
    pub memory: MemoryInfo,
    pub disk: DiskInfo,
    pub platform: String,
    pub cpu_count: usize,
}
