//! Jarvis Storage crate - conversation history persistence.
//!
//! Stores interaction records as a single JSON array on disk. Each append
//! reads the whole file, pushes the record and rewrites the file.

pub mod interaction_log;

pub use interaction_log::{InMemoryLog, InteractionLog, JsonFileLog};
