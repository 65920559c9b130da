use std::path::Path;

/// Trait for reporting reconciliation progress.
///
/// The CLI implements it with an indicatif spinner. All methods have default
/// no-op implementations.
pub trait ProgressReporter {
    fn on_scan_start(&self, _root: &Path) {}
    fn on_scan_progress(&self, _files_found: usize, _current_path: &Path) {}
    fn on_scan_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_reconcile_start(&self, _batch: usize, _recorded: usize) {}
    fn on_item_complete(&self, _processed: usize, _batch: usize, _path: &Path) {}
    fn on_reconcile_complete(&self, _replaced: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
