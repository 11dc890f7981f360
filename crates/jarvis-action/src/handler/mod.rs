//! Per-intent response handlers.
//!
//! Handlers only produce text. None of them touches files, processes or
//! power state; the file-operation and query handlers are placeholders.

pub mod control;
pub mod system_info;

pub const GREETING_RESPONSE: &str = "Good to see you. How can I assist you today?";
pub const FILE_OPERATION_RESPONSE: &str = "File operation feature coming soon";
pub const QUERY_RESPONSE: &str = "I will search for that information for you";
pub const UNKNOWN_RESPONSE: &str = "I did not understand that. Could you please repeat?";

/// Spoken when the system probe fails.
pub const SYSTEM_INFO_UNAVAILABLE_RESPONSE: &str = "System information is currently unavailable";
