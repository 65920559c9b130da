use crate::catalog::{CatalogEntry, RemoteCatalog};
use crate::config::AppConfig;
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::record::ReconciliationRecord;
use crate::scanner;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub struct ReconcileEngine<C: RemoteCatalog> {
    config: AppConfig,
    catalog: C,
    record: ReconciliationRecord,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Non-hardlinked files found by the scan.
    pub found: usize,
    /// Record entries actually worked on. A declined entry is not counted.
    pub attempted: usize,
    pub replaced: usize,
    pub not_found: usize,
    pub failed: usize,
    /// The operator declined a deletion, which ends the batch.
    pub declined: bool,
    /// Entries left in the record when the run finished.
    pub remaining: usize,
    /// Deleted locally but the catalog follow-up failed. These titles need a
    /// manual search since the next scan no longer sees their files.
    pub orphaned: Vec<CatalogEntry>,
}

enum ItemOutcome {
    Replaced(CatalogEntry),
    NotFound(PathBuf),
    Orphaned { entry: CatalogEntry, error: Error },
    Declined,
}

impl<C: RemoteCatalog> ReconcileEngine<C> {
    pub fn new(config: AppConfig, catalog: C) -> Self {
        let record = ReconciliationRecord::new(&config.record_path);
        Self {
            config,
            catalog,
            record,
        }
    }

    pub fn record(&self) -> &ReconciliationRecord {
        &self.record
    }

    /// Full run: scan, checkpoint the result, then replace up to
    /// `batch_size` recorded files. `confirm` is asked before each deletion
    /// unless the config is unattended.
    pub fn run<F>(
        &self,
        confirm: F,
        reporter: &dyn ProgressReporter,
    ) -> Result<ReconcileSummary, Error>
    where
        F: FnMut(&Path) -> bool,
    {
        let found = self.scan_and_persist(reporter)?;
        info!(
            "Found {} non-hardlinked files, saved to {}",
            found,
            self.record.path().display()
        );

        if self.config.batch_size == 0 {
            return Ok(ReconcileSummary {
                found,
                remaining: found,
                ..Default::default()
            });
        }

        let mut summary = self.reconcile(confirm, reporter)?;
        summary.found = found;
        Ok(summary)
    }

    /// Scan the configured root and overwrite the record with the result.
    pub fn scan_and_persist(&self, reporter: &dyn ProgressReporter) -> Result<usize, Error> {
        let root = &self.config.root_directory;
        info!("Looking for non-hardlinked files in {}", root.display());
        reporter.on_scan_start(root);
        let scan_start = Instant::now();

        let mut paths: Vec<PathBuf> = Vec::new();
        for file in scanner::scan(
            root,
            &self.config.extensions,
            &self.config.ignore_patterns,
        )? {
            debug!(
                path = %file.path.display(),
                extension = %file.extension,
                "Non-hardlinked file"
            );
            reporter.on_scan_progress(paths.len() + 1, &file.path);
            paths.push(file.path);
        }

        reporter.on_scan_complete(paths.len(), scan_start.elapsed().as_secs_f64());
        self.record.save(&paths)?;
        Ok(paths.len())
    }

    /// Work through the first `batch_size` entries of the saved record.
    /// Each fully replaced entry is removed and the record rewritten right away.
    pub fn reconcile<F>(
        &self,
        mut confirm: F,
        reporter: &dyn ProgressReporter,
    ) -> Result<ReconcileSummary, Error>
    where
        F: FnMut(&Path) -> bool,
    {
        let mut remaining = self.record.load()?;
        let batch: Vec<PathBuf> = remaining
            .iter()
            .take(self.config.batch_size)
            .cloned()
            .collect();

        let mut summary = ReconcileSummary::default();
        info!(
            "Replacing {} of {} recorded files",
            batch.len(),
            remaining.len()
        );
        reporter.on_reconcile_start(batch.len(), remaining.len());
        let start = Instant::now();

        for (index, path) in batch.iter().enumerate() {
            let outcome = self.process_item(path, &mut confirm);
            if !matches!(outcome, Ok(ItemOutcome::Declined)) {
                summary.attempted += 1;
            }

            match outcome {
                Ok(ItemOutcome::Replaced(entry)) => {
                    info!(
                        id = entry.id,
                        "Monitoring and searching for {} ({})",
                        entry.title,
                        path.display()
                    );
                    remaining.retain(|p| p != path);
                    self.record.save(&remaining)?;
                    summary.replaced += 1;
                }
                Ok(ItemOutcome::NotFound(folder)) => {
                    warn!(
                        "Not found in remote catalog for folder path: {}",
                        folder.display()
                    );
                    summary.not_found += 1;
                }
                Ok(ItemOutcome::Orphaned { entry, error }) => {
                    error!(
                        id = entry.id,
                        title = %entry.title,
                        "Deleted {} but could not queue a replacement: {}. Search for it manually",
                        path.display(),
                        error
                    );
                    summary.failed += 1;
                    summary.orphaned.push(entry);
                }
                Ok(ItemOutcome::Declined) => {
                    info!("Skipping deletion of {}, stopping", path.display());
                    summary.declined = true;
                    break;
                }
                Err(err) if err.is_item_recoverable() => {
                    error!("Error replacing {}: {}", path.display(), err);
                    summary.failed += 1;
                }
                Err(err) => return Err(err),
            }
            reporter.on_item_complete(index + 1, batch.len(), path);
        }

        summary.remaining = remaining.len();
        reporter.on_reconcile_complete(summary.replaced, start.elapsed().as_secs_f64());
        Ok(summary)
    }

    fn process_item<F>(&self, path: &Path, confirm: &mut F) -> Result<ItemOutcome, Error>
    where
        F: FnMut(&Path) -> bool,
    {
        let folder = path.parent().unwrap_or(path);
        let Some(entry) = self.catalog.find_entry_by_storage_path(folder)? else {
            return Ok(ItemOutcome::NotFound(folder.to_path_buf()));
        };

        if !self.config.unattended && !confirm(path) {
            return Ok(ItemOutcome::Declined);
        }

        fs::remove_file(path).map_err(|source| Error::LocalDeletion {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Deleted non-hardlinked file: {}", path.display());

        match self.request_replacement(&entry) {
            Ok(()) => Ok(ItemOutcome::Replaced(entry)),
            Err(error) if error.is_item_recoverable() => {
                Ok(ItemOutcome::Orphaned { entry, error })
            }
            Err(error) => Err(error),
        }
    }

    fn request_replacement(&self, entry: &CatalogEntry) -> Result<(), Error> {
        self.catalog.refresh(entry.id)?;
        if self.config.rescan_delay_secs > 0 {
            thread::sleep(Duration::from_secs(self.config.rescan_delay_secs));
        }
        self.catalog.set_monitored(entry.id)?;
        self.catalog.trigger_reacquisition(entry.id)?;
        Ok(())
    }
}
