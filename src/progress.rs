//! Progress reporting for long-running downloads.
//!
//! Reports are advisory: nothing in the client depends on a sink accepting
//! or displaying them.

use log::info;

/// Receives coarse progress updates.
pub trait ProgressSink: Send + Sync {
    /// `percent` is in `0..=100`.
    fn report(&self, label: &str, percent: u8);
}

/// Writes progress to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, label: &str, percent: u8) {
        info!("{} ({}%)", label, percent.min(100));
    }
}

/// Discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn report(&self, _label: &str, _percent: u8) {}
}
