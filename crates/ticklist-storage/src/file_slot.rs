use std::{
    fs, io,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use ticklist_core::storage::{SlotError, SlotStore};
use tracing::instrument;

/// File-backed slot implementing the shared `SlotStore` contract. Saves go
/// through a named temp file in the same directory and are renamed over the
/// target, so a crash mid-write never leaves a truncated slot behind.
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SlotStore for FileSlot {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn load_raw(&self) -> Result<Option<String>, SlotError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_err(err)),
        }
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn save_raw(&self, payload: &str) -> Result<(), SlotError> {
        let parent = self.path.parent().ok_or_else(|| SlotError::Storage {
            reason: "invalid slot path".to_string(),
        })?;
        fs::create_dir_all(parent).map_err(storage_err)?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(storage_err)?;
        tmp.write_all(payload.as_bytes()).map_err(storage_err)?;
        tmp.flush().map_err(storage_err)?;
        tmp.persist(&self.path).map_err(|e| storage_err(e.error))?;
        Ok(())
    }
}

fn storage_err<E: ToString>(err: E) -> SlotError {
    SlotError::Storage {
        reason: err.to_string(),
    }
}
