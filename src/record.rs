use crate::error::Error;
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const HEADER: &str = "File Path";
pub const DEFAULT_RECORD_PATH: &str = "non_hardlinked_files.csv";

/// The on-disk checkpoint of non-hardlinked paths still awaiting replacement.
///
/// Every save rewrites the whole file through a sibling temp file and a
/// rename, so a crash leaves either the old or the new list on disk.
#[derive(Debug, Clone)]
pub struct ReconciliationRecord {
    path: PathBuf,
}

impl ReconciliationRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the record with a header row and one row per path, in order.
    /// Repeated paths keep their first position only.
    pub fn save<P: AsRef<Path>>(&self, paths: &[P]) -> Result<(), Error> {
        let tmp_path = self.tmp_path();
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Necessary)
            .from_path(&tmp_path)?;

        writer.write_record([HEADER])?;

        let mut seen: HashSet<&Path> = HashSet::with_capacity(paths.len());
        let mut rows = 0usize;
        for path in paths {
            let path = path.as_ref();
            if !seen.insert(path) {
                continue;
            }
            let row = path.to_string_lossy();
            writer.write_record([row.as_bytes()])?;
            rows += 1;
        }
        writer.flush()?;
        drop(writer);

        fs::rename(&tmp_path, &self.path)?;
        debug!(record = %self.path.display(), rows, "Record saved");
        Ok(())
    }

    /// Read the record back in saved order, header excluded.
    pub fn load(&self) -> Result<Vec<PathBuf>, Error> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut records = reader.records();
        match records.next() {
            None => return Err(self.format_error("file is empty, expected header")),
            Some(header) => {
                let header = header.map_err(|e| self.format_error(e.to_string()))?;
                if header.len() != 1 || &header[0] != HEADER {
                    return Err(self.format_error(format!(
                        "expected header '{}', found '{}'",
                        HEADER,
                        header.iter().collect::<Vec<_>>().join(",")
                    )));
                }
            }
        }

        let mut paths = Vec::new();
        for (index, row) in records.enumerate() {
            let row = row.map_err(|e| self.format_error(e.to_string()))?;
            if row.len() != 1 {
                return Err(self.format_error(format!(
                    "row {} has {} fields, expected 1",
                    index + 2,
                    row.len()
                )));
            }
            paths.push(PathBuf::from(&row[0]));
        }

        Ok(paths)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn format_error(&self, message: impl Into<String>) -> Error {
        Error::Format {
            path: self.path.clone(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_writes_header_then_rows() {
        let tmp = tempdir().unwrap();
        let record = ReconciliationRecord::new(tmp.path().join("record.csv"));
        record
            .save(&["/movies/A (2001)/a.mkv", "/movies/B (2002)/b.mkv"])
            .unwrap();

        let contents = fs::read_to_string(record.path()).unwrap();
        assert_eq!(
            contents,
            "File Path\n/movies/A (2001)/a.mkv\n/movies/B (2002)/b.mkv\n"
        );
        assert!(!tmp.path().join("record.csv.tmp").exists());
    }

    #[test]
    fn test_save_drops_repeated_paths() {
        let tmp = tempdir().unwrap();
        let record = ReconciliationRecord::new(tmp.path().join("record.csv"));
        record.save(&["/m/a.mkv", "/m/b.mkv", "/m/a.mkv"]).unwrap();

        assert_eq!(
            record.load().unwrap(),
            vec![PathBuf::from("/m/a.mkv"), PathBuf::from("/m/b.mkv")]
        );
    }

    #[test]
    fn test_load_rejects_missing_header() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("record.csv");
        fs::write(&path, "/m/a.mkv\n/m/b.mkv\n").unwrap();

        let err = ReconciliationRecord::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::Format { .. }), "got {:?}", err);
    }

    #[test]
    fn test_load_rejects_empty_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("record.csv");
        fs::write(&path, "").unwrap();

        let err = ReconciliationRecord::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::Format { .. }), "got {:?}", err);
    }

    #[test]
    fn test_load_rejects_multi_field_row() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("record.csv");
        fs::write(&path, "File Path\n/m/a.mkv,extra\n").unwrap();

        let err = ReconciliationRecord::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::Format { .. }), "got {:?}", err);
    }

    #[test]
    fn test_header_only_loads_empty() {
        let tmp = tempdir().unwrap();
        let record = ReconciliationRecord::new(tmp.path().join("record.csv"));
        record.save::<&str>(&[]).unwrap();
        assert!(record.load().unwrap().is_empty());
    }
}
