//! Jarvis System crate - host metrics for the system-info handler.
//!
//! Provides the `SystemProbe` trait, a `sysinfo`-backed implementation, and a
//! fixed-snapshot probe for testing without touching the host.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sysinfo::{Disks, System};

use jarvis_core::error::JarvisError;
use jarvis_core::types::{DiskInfo, MemoryInfo, SystemInfoSnapshot};

const BYTES_PER_GB: f64 = 1_073_741_824.0;

// =============================================================================
// Trait
// =============================================================================

/// Source of point-in-time host metrics.
#[async_trait]
pub trait SystemProbe: Send + Sync {
    /// Take a fresh snapshot. Never served from a cache.
    async fn system_info(&self) -> Result<SystemInfoSnapshot, JarvisError>;
}

// =============================================================================
// sysinfo implementation
// =============================================================================

/// Probe backed by the `sysinfo` crate. Works on macOS, Linux and Windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoProbe;

impl SysinfoProbe {
    pub fn new() -> Self {
        Self
    }

    /// Blocking sample. CPU usage needs two refreshes separated by
    /// `MINIMUM_CPU_UPDATE_INTERVAL` to yield a meaningful percentage.
    fn sample() -> Result<SystemInfoSnapshot, JarvisError> {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        let cpu_count = sys.cpus().len();
        if cpu_count == 0 {
            return Err(JarvisError::SystemProbe(
                "CPU information unavailable".to_string(),
            ));
        }

        let disks = Disks::new_with_refreshed_list();
        let root = disks
            .list()
            .iter()
            .find(|d| d.mount_point() == Path::new("/"))
            .or_else(|| disks.list().first())
            .ok_or_else(|| JarvisError::SystemProbe("no mounted disks found".to_string()))?;

        let platform = System::name().unwrap_or_else(|| std::env::consts::OS.to_string());

        Ok(SystemInfoSnapshot {
            cpu_percent: sys.global_cpu_usage(),
            memory: MemoryInfo {
                available: format_gb(sys.available_memory()),
            },
            disk: DiskInfo {
                free: format_gb(root.available_space()),
            },
            platform,
            cpu_count,
        })
    }
}

#[async_trait]
impl SystemProbe for SysinfoProbe {
    async fn system_info(&self) -> Result<SystemInfoSnapshot, JarvisError> {
        let snapshot = tokio::task::spawn_blocking(Self::sample)
            .await
            .map_err(|e| JarvisError::SystemProbe(format!("probe task failed: {}", e)))??;
        tracing::debug!(
            cpu_percent = snapshot.cpu_percent,
            cpu_count = snapshot.cpu_count,
            "System snapshot taken"
        );
        Ok(snapshot)
    }
}

/// Format a byte count as gigabytes with two decimals, e.g. `"7.81 GB"`.
pub fn format_gb(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / BYTES_PER_GB)
}

// =============================================================================
// Fixed implementation
// =============================================================================

/// Probe returning a fixed snapshot, or a fixed failure.
///
/// Counts calls so tests can assert whether a handler touched the probe.
#[derive(Debug)]
pub struct FixedProbe {
    outcome: Result<SystemInfoSnapshot, String>,
    calls: AtomicUsize,
}

impl FixedProbe {
    pub fn new(snapshot: SystemInfoSnapshot) -> Self {
        Self {
            outcome: Ok(snapshot),
            calls: AtomicUsize::new(0),
        }
    }

    /// A probe whose every call fails with `JarvisError::SystemProbe`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(reason.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SystemProbe for FixedProbe {
    async fn system_info(&self) -> Result<SystemInfoSnapshot, JarvisError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.outcome.clone().map_err(JarvisError::SystemProbe)
    }
}
