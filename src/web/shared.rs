//! Shared state for sigpad-core

use crate::config::Config;
use crate::render::LabelFont;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared state for the service
pub struct SharedState {
    /// Configuration
    pub config: Arc<Config>,

    /// Label font, loaded once at startup
    pub font: LabelFont,

    /// Capture permit. At most one session may be active against the
    /// tablet; holding this guard is owning the device.
    pub device_permit: Mutex<()>,

    /// Whether a capture session is currently running
    pub capture_active: AtomicBool,

    /// Completed capture count
    pub captures_completed: AtomicU64,

    /// Canceled capture count
    pub captures_canceled: AtomicU64,

    /// Server start time
    pub start_time: std::time::Instant,
}

impl SharedState {
    pub fn new(config: Config, font: LabelFont) -> Self {
        Self {
            config: Arc::new(config),
            font,
            device_permit: Mutex::new(()),
            capture_active: AtomicBool::new(false),
            captures_completed: AtomicU64::new(0),
            captures_canceled: AtomicU64::new(0),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    pub fn capture_active(&self) -> bool {
        self.capture_active.load(Ordering::Relaxed)
    }
}
