//! Startup wiring for the catalog, entitlements and bindings.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::RosterConfig;
use crate::entitlements::{EntitlementError, EntitlementResolver, EntitlementTable};
use crate::models::{CatalogError, ModelCatalog};
use crate::providers::{BindingError, ModelBindings};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Entitlements(#[from] EntitlementError),
    #[error(transparent)]
    Bindings(#[from] BindingError),
}

/// Immutable registries built once at startup.
#[derive(Debug, Clone)]
pub struct Roster {
    catalog: Arc<ModelCatalog>,
    resolver: EntitlementResolver,
    bindings: Arc<ModelBindings>,
}

impl Roster {
    /// Build from the built-in catalog and entitlement table.
    pub fn builtin(config: &RosterConfig) -> Result<Self, StartupError> {
        Self::from_parts(ModelCatalog::builtin()?, EntitlementTable::builtin(), config)
    }

    pub fn from_parts(
        catalog: ModelCatalog,
        table: EntitlementTable,
        config: &RosterConfig,
    ) -> Result<Self, StartupError> {
        table.validate(&catalog, config.strict_entitlements)?;
        let bindings = ModelBindings::for_mode(config.binding_mode(), &catalog)?;

        let catalog = Arc::new(catalog);
        let resolver = EntitlementResolver::new(Arc::clone(&catalog), Arc::new(table));

        info!(
            models = catalog.len(),
            bindings = bindings.len(),
            mode = ?bindings.mode(),
            "Model roster ready"
        );

        Ok(Self {
            catalog,
            resolver,
            bindings: Arc::new(bindings),
        })
    }

    pub fn catalog(&self) -> &Arc<ModelCatalog> {
        &self.catalog
    }

    pub fn resolver(&self) -> &EntitlementResolver {
        &self.resolver
    }

    pub fn bindings(&self) -> &Arc<ModelBindings> {
        &self.bindings
    }
}
