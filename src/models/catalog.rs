//! Model catalog and its read-only query service.
//!
//! `ModelCatalog` is built once at startup and never mutated afterwards.
//! It is shared behind an `Arc` by the HTTP layer and borrowed everywhere
//! else; no query takes a lock or allocates beyond its result vector.

use std::collections::HashMap;

use super::defaults::{default_models, DEFAULT_CHAT_MODEL};
use super::types::{CatalogError, ModelDescriptor, Provider};

/// Immutable registry of model descriptors.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelDescriptor>,
    index: HashMap<String, usize>,
    default_id: String,
}

impl ModelCatalog {
    /// Build a catalog from descriptors in declaration order.
    ///
    /// Fails if two descriptors share an id or the default id is not present.
    pub fn new(models: Vec<ModelDescriptor>, default_id: &str) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(models.len());
        for (position, model) in models.iter().enumerate() {
            if index.insert(model.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(model.id.clone()));
            }
        }

        if !index.contains_key(default_id) {
            return Err(CatalogError::MissingDefault(default_id.to_string()));
        }

        tracing::debug!(
            total_models = models.len(),
            default = %default_id,
            "Model catalog built"
        );

        Ok(Self {
            models,
            index,
            default_id: default_id.to_string(),
        })
    }

    /// The bundled catalog with the bundled default model.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(default_models(), DEFAULT_CHAT_MODEL)
    }

    /// Look up a descriptor by id. Unknown ids are `None`, not an error.
    pub fn find_by_id(&self, id: &str) -> Option<&ModelDescriptor> {
        self.index.get(id).map(|&position| &self.models[position])
    }

    /// All descriptors for a provider, in declaration order.
    pub fn find_by_provider(&self, provider: Provider) -> Vec<&ModelDescriptor> {
        self.models
            .iter()
            .filter(|m| m.provider == provider)
            .collect()
    }

    /// Provider lookup for untrusted input. Unknown names match nothing.
    pub fn find_by_provider_name(&self, name: &str) -> Vec<&ModelDescriptor> {
        match name.parse::<Provider>() {
            Ok(provider) => self.find_by_provider(provider),
            Err(_) => {
                tracing::debug!(provider = %name, "Unknown provider filter");
                Vec::new()
            }
        }
    }

    /// Check if a model id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All descriptors in declaration order.
    pub fn all(&self) -> &[ModelDescriptor] {
        &self.models
    }

    /// All ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.id.as_str())
    }

    /// The process-wide default model.
    pub fn default_model(&self) -> &ModelDescriptor {
        &self.models[self.index[&self.default_id]]
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// Providers offered by this catalog, in display priority order.
    pub fn providers(&self) -> Vec<Provider> {
        Provider::ALL.to_vec()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
