//! Remote media-manager catalog.
//!
//! The engine only ever reads entries, flips the monitored flag and queues
//! commands. Creating or deleting catalog entries is left to the remote side.

mod radarr;

pub use radarr::RadarrClient;

use crate::error::Error;
use std::path::{Component, Path, PathBuf};

pub type EntryId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: EntryId,
    pub storage_path: PathBuf,
    pub monitored: bool,
    pub title: String,
}

pub trait RemoteCatalog {
    /// Entry whose storage path equals `path` once both are normalized.
    /// `Ok(None)` when nothing matches.
    fn find_entry_by_storage_path(&self, path: &Path) -> Result<Option<CatalogEntry>, Error>;

    /// Mark the entry monitored. Already-monitored entries are left untouched.
    fn set_monitored(&self, id: EntryId) -> Result<(), Error>;

    /// Queue a search for a replacement. Returns once the remote side accepted
    /// the command, not when the search finishes.
    fn trigger_reacquisition(&self, id: EntryId) -> Result<(), Error>;

    /// Queue a rescan of the entry's storage so the catalog notices a removed file.
    fn refresh(&self, id: EntryId) -> Result<(), Error>;
}

impl<C: RemoteCatalog + ?Sized> RemoteCatalog for &C {
    fn find_entry_by_storage_path(&self, path: &Path) -> Result<Option<CatalogEntry>, Error> {
        (**self).find_entry_by_storage_path(path)
    }

    fn set_monitored(&self, id: EntryId) -> Result<(), Error> {
        (**self).set_monitored(id)
    }

    fn trigger_reacquisition(&self, id: EntryId) -> Result<(), Error> {
        (**self).trigger_reacquisition(id)
    }

    fn refresh(&self, id: EntryId) -> Result<(), Error> {
        (**self).refresh(id)
    }
}

/// Lexically normalize a storage path to absolute form: relative paths are
/// joined to the working directory, `.` segments and trailing separators are
/// dropped, `..` pops a segment. The filesystem is not consulted since remote
/// paths need not exist locally.
pub fn normalize_storage_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
