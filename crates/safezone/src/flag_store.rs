use crate::atomic_file::write_atomic;

use std::{
    collections::BTreeMap,
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use safezone_core::{CoreResult, SosError, collaborators::FlagStore};
use tracing::{debug, instrument};

/// [`FlagStore`] persisted as a flat TOML table of booleans.
#[derive(Debug)]
pub struct FileFlagStore {
    path: PathBuf,
    flags: BTreeMap<String, bool>,
}

impl FileFlagStore {
    /// Open the store at `path`. A missing file is an empty store.
    #[track_caller]
    #[instrument]
    pub fn open(path: &Path) -> CoreResult<Self> {
        let flags = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|e| SosError::StoreError {
                reason: format!("Failed to read flags: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            toml::from_str(&contents).map_err(|e| SosError::StoreError {
                reason: format!("Failed to parse flags: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
        } else {
            BTreeMap::new()
        };

        debug!(path = ?path, count = flags.len(), "Flag store opened");

        Ok(Self {
            path: path.to_path_buf(),
            flags,
        })
    }
}

impl FlagStore for FileFlagStore {
    fn get_flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    #[track_caller]
    fn set_flag(&mut self, key: &str, value: bool) -> CoreResult<()> {
        let mut updated = self.flags.clone();
        updated.insert(key.to_string(), value);

        let contents = toml::to_string(&updated).map_err(|e| SosError::StoreError {
            reason: format!("Failed to serialize flags: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        write_atomic(&self.path, contents.as_bytes()).map_err(|e| SosError::StoreError {
            reason: format!("Failed to write flags: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Memory only changes once the write is durable.
        self.flags = updated;
        debug!(key, value, "Flag stored");

        Ok(())
    }
}
