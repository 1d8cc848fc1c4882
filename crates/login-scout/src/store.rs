//! Append-only JSON array of [`PersistedRecord`]s, used by the CLI.
//!
//! Each append takes an exclusive advisory lock on a sibling `<file>.lock`,
//! reads the current array, extends it and writes the result to a temporary
//! sibling that is then renamed over the target. Appends from separate
//! processes are serialized by the lock, and readers never observe a
//! half-written file.
//!
//! A file that exists but does not hold a record array is renamed to
//! `<file>.bak` before the first append replaces it.

use crate::types::PersistedRecord;
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

enum Contents {
    Missing,
    Records(Vec<PersistedRecord>),
    Unparsable(serde_json::Error),
}

/// Flat-file record collection.
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents. A missing or unparsable file reads as empty.
    pub fn load(&self) -> Result<Vec<PersistedRecord>, StoreError> {
        match self.read()? {
            Contents::Missing => Ok(Vec::new()),
            Contents::Records(records) => Ok(records),
            Contents::Unparsable(e) => {
                warn!(path = %self.path.display(), "record file is not a record array: {e}");
                Ok(Vec::new())
            }
        }
    }

    /// Append `records` and return the new total.
    pub fn append(&self, records: &[PersistedRecord]) -> Result<usize, StoreError> {
        let dir = self.dir();
        std::fs::create_dir_all(&dir).map_err(|source| self.io_err(&dir, source))?;

        // Released when dropped.
        let _lock = self.lock()?;

        let mut all = match self.read()? {
            Contents::Missing => Vec::new(),
            Contents::Records(existing) => existing,
            Contents::Unparsable(e) => {
                let backup = self.sibling(".bak");
                std::fs::rename(&self.path, &backup).map_err(|source| self.io_err(&backup, source))?;
                warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    "record file is not a record array, moved aside: {e}"
                );
                Vec::new()
            }
        };
        all.extend_from_slice(records);

        let json = serde_json::to_string_pretty(&all)?;
        self.write_atomic(&dir, json.as_bytes())?;

        debug!(path = %self.path.display(), appended = records.len(), total = all.len(), "records saved");
        Ok(all.len())
    }

    fn read(&self) -> Result<Contents, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Contents::Missing),
            Err(source) => return Err(self.io_err(&self.path, source)),
        };

        Ok(match serde_json::from_str(&raw) {
            Ok(records) => Contents::Records(records),
            Err(e) => Contents::Unparsable(e),
        })
    }

    fn lock(&self) -> Result<File, StoreError> {
        let lock_path = self.sibling(".lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|source| self.io_err(&lock_path, source))?;
        FileExt::lock_exclusive(&file).map_err(|source| self.io_err(&lock_path, source))?;
        Ok(file)
    }

    fn write_atomic(&self, dir: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| self.io_err(&self.path, source);

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(bytes).map_err(io_err)?;
        tmp.write_all(b"\n").map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// `out.json` -> `out.json<suffix>`
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    }

    fn io_err(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
