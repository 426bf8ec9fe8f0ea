use std::path::PathBuf;

use crate::config::Config;
use color_eyre::Result;
use dirs::data_dir;
use ticklist_storage::file_slot::FileSlot;
use tracing::debug;

/// File name of the single task slot inside the data directory.
pub const SLOT_FILE: &str = "todos.json";

/// Resolve the default data directory for Ticklist.
pub fn default_data_dir() -> Result<PathBuf> {
    let base = data_dir().ok_or_else(|| color_eyre::eyre::eyre!("no data dir available"))?;
    Ok(base.join("ticklist"))
}

/// Build the task slot, honoring a `data_dir` override from config.
pub fn slot_from_config(config: &Config) -> Result<FileSlot> {
    let root = match &config.data_dir {
        Some(root) => {
            debug!(?root, "using task slot from config override");
            root.clone()
        }
        None => default_data_dir()?,
    };
    Ok(FileSlot::new(root.join(SLOT_FILE)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_override_places_slot_under_data_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config {
            data_dir: Some(dir.path().to_path_buf()),
        };
        let slot = slot_from_config(&config).expect("slot");
        let expected = dir.path().join(SLOT_FILE);
        assert_eq!(slot.path(), expected.as_path());
    }
}
