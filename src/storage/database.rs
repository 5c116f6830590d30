//! JSON file storage for the task store
//!
//! The whole store lives in one JSON document (`.db.tt` by default). It is
//! read in full when a command starts and rewritten in full when it ends.
//! Writes go to a temp file that is renamed over the original, so a crash
//! leaves either the old or the new contents. File locks cover a single
//! read or write, not a whole command, so concurrent runs are last writer
//! wins.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::{null_as_empty, Board, Store};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read task file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode task file {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode task store")]
    Encode(#[source] serde_json::Error),

    #[error("failed to write task file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// On-disk layout; every field is optional so older files still load
#[derive(Deserialize)]
struct Document {
    #[serde(default, deserialize_with = "null_as_empty")]
    boards: Vec<Board>,
}

/// The task file
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the task file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Write {
            path: self.path.clone(),
            source,
        }
    }

    /// Loads the store. A missing or blank file is an empty store.
    pub fn load(&self) -> Result<Store, PersistenceError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "task file missing, starting empty");
            return Ok(Store::new());
        }

        let mut file = File::open(&self.path).map_err(|e| self.read_error(e))?;
        file.lock_shared().map_err(|e| self.read_error(e))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| self.read_error(e))?;

        if content.trim().is_empty() {
            return Ok(Store::new());
        }

        let document: Document =
            serde_json::from_str(&content).map_err(|source| PersistenceError::Decode {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), boards = document.boards.len(), "loaded task file");
        Ok(Store::from_boards(document.boards))
    }

    /// Overwrites the file with the given store
    pub fn save(&self, store: &Store) -> Result<(), PersistenceError> {
        let data = serde_json::to_vec(store).map_err(PersistenceError::Encode)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        let temp_path = self.temp_path();
        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| self.write_error(e))?;

            file.lock_exclusive().map_err(|e| self.write_error(e))?;

            let mut writer = BufWriter::new(&file);
            writer.write_all(&data).map_err(|e| self.write_error(e))?;
            writer.write_all(b"\n").map_err(|e| self.write_error(e))?;
            writer.flush().map_err(|e| self.write_error(e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| self.write_error(e))?;

        debug!(path = %self.path.display(), "saved task file");
        Ok(())
    }
}
