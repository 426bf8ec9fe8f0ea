use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Errors produced by slot storage implementations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    /// Underlying storage failure.
    #[error("storage failure: {reason}")]
    Storage { reason: String },
}

/// Contract for the single named persistence slot the store writes through.
/// The slot is format-agnostic: the store owns the payload layout, the slot
/// only moves opaque strings. Last write wins; no transactional guarantees.
pub trait SlotStore {
    /// Read the slot contents, `None` when the slot has never been written.
    fn load_raw(&self) -> Result<Option<String>, SlotError>;

    /// Overwrite the slot contents.
    fn save_raw(&self, payload: &str) -> Result<(), SlotError>;
}

/// In-memory slot for tests and smoke runs. Cloning shares the underlying
/// cell, so a test can reopen a second store over the same slot.
#[derive(Debug, Default, Clone)]
pub struct InMemorySlot {
    inner: Arc<Mutex<Option<String>>>,
}

impl InMemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for InMemorySlot {
    fn load_raw(&self) -> Result<Option<String>, SlotError> {
        let cell = self.inner.lock().map_err(|err| SlotError::Storage {
            reason: format!("lock poisoned: {err}"),
        })?;
        Ok(cell.clone())
    }

    fn save_raw(&self, payload: &str) -> Result<(), SlotError> {
        let mut cell = self.inner.lock().map_err(|err| SlotError::Storage {
            reason: format!("lock poisoned: {err}"),
        })?;
        *cell = Some(payload.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_reads_as_none() {
        let slot = InMemorySlot::new();
        assert_eq!(slot.load_raw().expect("load"), None);
    }

    #[test]
    fn last_write_wins() {
        let slot = InMemorySlot::new();
        slot.save_raw("first").expect("save");
        slot.save_raw("second").expect("save");
        assert_eq!(slot.load_raw().expect("load").as_deref(), Some("second"));
    }

    #[test]
    fn clones_share_the_slot() {
        let slot = InMemorySlot::new();
        let other = slot.clone();
        slot.save_raw("shared").expect("save");
        assert_eq!(other.load_raw().expect("load").as_deref(), Some("shared"));
    }
}
