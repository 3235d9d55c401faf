//! Progress reporting seam.
//!
//! The pipeline reports one tick per chunk to a write-only observer; the
//! total is known upfront. The core never draws anything itself — the CLI
//! plugs in an indicatif bar, tests plug in counters.

/// Write-only observer for pipeline progress.
pub trait ProgressSink {
    /// Called once before processing starts with the total chunk count.
    fn begin(&self, total: u64);

    /// Called once per chunk, including empty ones.
    fn tick(&self);
}

/// Sink that discards all progress events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn begin(&self, _total: u64) {}
    fn tick(&self) {}
}
