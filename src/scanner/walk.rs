use crate::error::Error;
use crate::media::{MediaFile, VideoContainer};
use crate::platform;
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};
use walkdir::{DirEntry, WalkDir};

/// Lazy walk over `root` yielding media files whose link count is exactly 1,
/// in file-name order.
///
/// The root is canonicalized and probed before anything is yielded, so a
/// missing or unreadable root is an error rather than an empty result.
/// Symlinks are never followed or yielded. Entries below the root that cannot
/// be read are logged and skipped.
pub fn scan(
    root: &Path,
    extensions: &[VideoContainer],
    ignore_globs: &[String],
) -> Result<NonHardlinkedFiles, Error> {
    let root = fs::canonicalize(root).map_err(|source| Error::Filesystem {
        path: root.to_path_buf(),
        source,
    })?;
    fs::read_dir(&root).map_err(|source| Error::Filesystem {
        path: root.clone(),
        source,
    })?;

    let ignore_patterns: Vec<Pattern> = ignore_globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect();

    debug!(root = %root.display(), ?extensions, "Starting hardlink scan");

    Ok(NonHardlinkedFiles {
        walker: WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter(),
        root,
        extensions: extensions.to_vec(),
        ignore_patterns,
    })
}

pub struct NonHardlinkedFiles {
    walker: walkdir::IntoIter,
    root: PathBuf,
    extensions: Vec<VideoContainer>,
    ignore_patterns: Vec<Pattern>,
}

impl NonHardlinkedFiles {
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_ignored(&self, path: &Path) -> bool {
        self.ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(path))
    }

    fn classify(&self, entry: &DirEntry) -> Option<MediaFile> {
        if !entry.file_type().is_file() {
            return None;
        }

        let extension = VideoContainer::from_path(entry.path())?;
        if !self.extensions.contains(&extension) || self.is_ignored(entry.path()) {
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                error!(
                    "Error getting metadata for {}: {}",
                    entry.path().display(),
                    err
                );
                return None;
            }
        };

        let Some(link_count) = platform::link_count(&metadata) else {
            warn!(
                "Link count unavailable on this platform, skipping {}",
                entry.path().display()
            );
            return None;
        };

        (link_count == 1).then(|| MediaFile {
            path: entry.path().to_path_buf(),
            link_count,
            extension,
        })
    }
}

impl Iterator for NonHardlinkedFiles {
    type Item = MediaFile;

    fn next(&mut self) -> Option<MediaFile> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    error!("Error walking {}: {}", self.root.display(), err);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                if entry.depth() > 0 && self.is_ignored(entry.path()) {
                    debug!("Ignoring directory {}", entry.path().display());
                    self.walker.skip_current_dir();
                }
                continue;
            }

            if let Some(file) = self.classify(&entry) {
                return Some(file);
            }
        }
    }
}
