use indicatif::{ProgressBar, ProgressStyle};
use seedkeeper::ProgressReporter;
use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

/// CLI progress reporter. The scan gets a spinner; the replace phase only
/// prints a completion line since it may stop to prompt.
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self, root: &Path) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(format!("Scanning {}...", root.display()));
        pb.enable_steady_tick(Duration::from_millis(80));
        if let Some(old) = self.bar.borrow_mut().replace(pb) {
            old.finish_and_clear();
        }
    }

    fn on_scan_progress(&self, files_found: usize, _current_path: &Path) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_message(format!(
                "Scanning... {} non-hardlinked files found",
                files_found
            ));
        }
    }

    fn on_scan_complete(&self, total_files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} non-hardlinked files in {:.2}s",
            total_files, duration_secs
        );
    }

    fn on_item_complete(&self, processed: usize, batch: usize, path: &Path) {
        eprintln!("  [{}/{}] {}", processed, batch, path.display());
    }

    fn on_reconcile_complete(&self, replaced: usize, duration_secs: f64) {
        eprintln!(
            "  \x1b[32m✓\x1b[0m Replace complete: {} files in {:.2}s",
            replaced, duration_secs
        );
    }
}
