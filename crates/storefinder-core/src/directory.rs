//! Read-only store directory.
//!
//! The shipped implementation is an in-memory list seeded from
//! `config/stores.yaml`. Refreshing the seed is an out-of-band concern.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ConfigError, DirectoryError};
use crate::geo;
use crate::postal_code::sanitize_postal_code;
use crate::types::StoreLocation;

#[async_trait]
pub trait StoreDirectory: Send + Sync {
    /// Every known location, in directory order.
    async fn all(&self) -> Result<Vec<StoreLocation>, DirectoryError>;

    async fn by_id(&self, id: i64) -> Result<Option<StoreLocation>, DirectoryError>;

    /// Locations in a two-letter region; the code is matched case-insensitively.
    async fn by_state(&self, state: &str) -> Result<Vec<StoreLocation>, DirectoryError>;
}

#[derive(Debug, Deserialize)]
pub struct StoresFile {
    pub stores: Vec<StoreLocation>,
}

/// Load and validate the store seed from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_stores(path: &Path) -> Result<StoresFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StoresFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let stores_file: StoresFile = serde_yaml::from_str(&content)?;
    validate_stores(&stores_file)?;
    Ok(stores_file)
}

fn validate_stores(stores_file: &StoresFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for store in &stores_file.stores {
        if store.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "store {} must have a non-empty name",
                store.id
            )));
        }

        if !seen_ids.insert(store.id) {
            return Err(ConfigError::Validation(format!(
                "duplicate store id {}",
                store.id
            )));
        }

        let digits_only = sanitize_postal_code(&store.postal_code) == store.postal_code;
        if store.postal_code.len() != 8 || !digits_only {
            return Err(ConfigError::Validation(format!(
                "store '{}' has invalid postal code '{}'; expected 8 digits",
                store.name, store.postal_code
            )));
        }

        if store.state.len() != 2 || !store.state.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::Validation(format!(
                "store '{}' has invalid state '{}'; expected a two-letter uppercase code",
                store.name, store.state
            )));
        }

        if geo::validate(store.coordinates).is_err() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has out-of-range coordinates ({}, {})",
                store.name, store.coordinates.latitude, store.coordinates.longitude
            )));
        }
    }

    Ok(())
}

/// [`StoreDirectory`] over a fixed in-memory list.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStoreDirectory {
    stores: Vec<StoreLocation>,
}

impl InMemoryStoreDirectory {
    #[must_use]
    pub fn new(stores: Vec<StoreLocation>) -> Self {
        Self { stores }
    }

    /// Loads the directory from a YAML seed file.
    ///
    /// # Errors
    ///
    /// See [`load_stores`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let file = load_stores(path)?;
        tracing::info!(path = %path.display(), count = file.stores.len(), "loaded store directory");
        Ok(Self::new(file.stores))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

#[async_trait]
impl StoreDirectory for InMemoryStoreDirectory {
    async fn all(&self) -> Result<Vec<StoreLocation>, DirectoryError> {
        Ok(self.stores.clone())
    }

    async fn by_id(&self, id: i64) -> Result<Option<StoreLocation>, DirectoryError> {
        Ok(self.stores.iter().find(|s| s.id == id).cloned())
    }

    async fn by_state(&self, state: &str) -> Result<Vec<StoreLocation>, DirectoryError> {
        let state = state.trim().to_uppercase();
        Ok(self
            .stores
            .iter()
            .filter(|s| s.state == state)
            .cloned()
            .collect())
    }
}
