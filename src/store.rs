use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::PatientRecord;

/// JSON-file backed list of patient records.
///
/// The file is the only source of truth: every call re-reads it and every
/// mutation rewrites it whole. There is no locking, so two writers racing on
/// the same file can lose each other's changes.
#[derive(Debug, Clone)]
pub struct PatientStore {
    path: PathBuf,
}

impl PatientStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record in insertion order.
    ///
    /// A missing file is an empty store; a file that does not parse is
    /// `CorruptStore`, never an empty list.
    pub fn load(&self) -> Result<Vec<PatientRecord>> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "store file absent, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let records: Vec<PatientRecord> =
            serde_json::from_slice(&contents).map_err(|source| Error::CorruptStore {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = ?self.path, count = records.len(), "loaded patient records");
        Ok(records)
    }

    pub fn append(&self, record: PatientRecord) -> Result<()> {
        let mut records = self.load()?;
        info!(name = %record.name, result = %record.result, "appending patient record");
        records.push(record);
        self.save(&records)
    }

    /// Remove the record at `index`, returning it.
    ///
    /// Out-of-range indices fail with `IndexOutOfRange` and leave the file
    /// untouched.
    pub fn delete_by_index(&self, index: usize) -> Result<PatientRecord> {
        let mut records = self.load()?;
        if index >= records.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: records.len(),
            });
        }
        let removed = records.remove(index);
        self.save(&records)?;
        info!(index, name = %removed.name, "deleted patient record");
        Ok(removed)
    }

    /// Remove every record named exactly `name`; returns how many went.
    ///
    /// Duplicates are all removed. Nothing is written when no record matches.
    pub fn delete_by_name(&self, name: &str) -> Result<usize> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.name != name);
        let removed = before - records.len();
        if removed > 0 {
            self.save(&records)?;
        }
        info!(name, removed, "deleted patient records by name");
        Ok(removed)
    }

    fn save(&self, records: &[PatientRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        records
            .serialize(&mut serializer)
            .map_err(io::Error::from)?;

        let mut file = fs::File::create(&self.path)?;
        file.write_all(&buf)?;
        debug!(path = ?self.path, count = records.len(), "rewrote store file");
        Ok(())
    }
}
