//! Public operation surface consumed by the HTTP API and the CLI.

use std::sync::Arc;

use crate::directory::StoreDirectory;
use crate::error::{DirectoryError, ProximityError};
use crate::proximity::ProximityResolver;
use crate::types::{ProximityResult, StoreLocation, StoreType};

#[derive(Clone)]
pub struct StoreService {
    directory: Arc<dyn StoreDirectory>,
    resolver: ProximityResolver,
}

impl StoreService {
    #[must_use]
    pub fn new(directory: Arc<dyn StoreDirectory>, resolver: ProximityResolver) -> Self {
        Self {
            directory,
            resolver,
        }
    }

    /// # Errors
    ///
    /// Propagates directory failures.
    pub async fn list_all(&self) -> Result<Vec<StoreLocation>, DirectoryError> {
        self.directory.all().await
    }

    /// # Errors
    ///
    /// Propagates directory failures.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<StoreLocation>, DirectoryError> {
        self.directory.by_id(id).await
    }

    /// Stores in a region; `uf` is uppercased before matching.
    ///
    /// # Errors
    ///
    /// Propagates directory failures.
    pub async fn find_by_state(&self, uf: &str) -> Result<Vec<StoreLocation>, DirectoryError> {
        self.directory.by_state(&uf.to_uppercase()).await
    }

    /// Nearby lookup, optionally keeping only one classification.
    ///
    /// The filter runs on the resolved list, so it never affects caching.
    ///
    /// # Errors
    ///
    /// See [`ProximityResolver::find_nearby`].
    pub async fn find_nearby(
        &self,
        postal_code: &str,
        radius_km: Option<f64>,
        only: Option<StoreType>,
    ) -> Result<Vec<ProximityResult>, ProximityError> {
        let mut results = self.resolver.find_nearby(postal_code, radius_km).await?;
        if let Some(wanted) = only {
            results.retain(|r| r.classified_type == wanted);
        }
        Ok(results)
    }
}
