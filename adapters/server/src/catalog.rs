//! Read access to the reference catalogs.

use std::sync::Arc;

use grow_defence_core::{Catalogs, ContentError};

/// Supplies an already-materialised catalog snapshot for one generation call.
pub trait CatalogSource: Send + Sync {
    /// Snapshot handed to the level generator.
    fn catalogs(&self) -> Result<Arc<Catalogs>, ContentError>;
}

/// Catalogs loaded once at boot and shared read-only between requests.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    catalogs: Arc<Catalogs>,
}

impl StaticCatalog {
    /// Wraps a loaded catalog.
    #[must_use]
    pub fn new(catalogs: Catalogs) -> Self {
        Self {
            catalogs: Arc::new(catalogs),
        }
    }
}

impl CatalogSource for StaticCatalog {
    fn catalogs(&self) -> Result<Arc<Catalogs>, ContentError> {
        Ok(Arc::clone(&self.catalogs))
    }
}
