//! System-info handler.
//!
//! Picks one metric from a fresh snapshot based on words in the utterance.

use jarvis_core::types::SystemInfoSnapshot;
use jarvis_system::SystemProbe;

use crate::error::DispatchError;

/// Query the probe and describe the metric the utterance asks about.
pub async fn respond(text: &str, probe: &dyn SystemProbe) -> Result<String, DispatchError> {
    let snapshot = probe.system_info().await?;
    Ok(describe(text, &snapshot))
}

/// Pure formatting half of `respond`.
pub fn describe(text: &str, info: &SystemInfoSnapshot) -> String {
    if text.contains("cpu") || text.contains("processor") {
        format!("Your CPU usage is at {:.1} percent", info.cpu_percent)
    } else if text.contains("memory") || text.contains("ram") {
        format!("Memory available: {}", info.memory.available)
    } else if text.contains("disk") {
        format!("Disk space free: {}", info.disk.free)
    } else {
        format!(
            "System is running on {} with {} processors",
            info.platform, info.cpu_count
        )
    }
}
