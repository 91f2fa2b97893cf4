//! Entitlement resolution: user class to quota plus visible models.

use std::sync::Arc;

use serde::Serialize;

use super::table::{EntitlementTable, UserClass};
use crate::models::{ModelCatalog, ModelDescriptor};

/// What a user class may do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution<'a> {
    pub max_messages_per_day: u32,
    pub available_models: Vec<&'a ModelDescriptor>,
}

impl Resolution<'_> {
    /// Check if a model id is among the available models.
    pub fn allows(&self, id: &str) -> bool {
        self.available_models.iter().any(|m| m.id == id)
    }
}

/// Resolves user classes against a catalog and entitlement table.
///
/// Both tables are shared read-only; cloning the resolver only bumps
/// reference counts.
#[derive(Debug, Clone)]
pub struct EntitlementResolver {
    catalog: Arc<ModelCatalog>,
    table: Arc<EntitlementTable>,
}

impl EntitlementResolver {
    pub fn new(catalog: Arc<ModelCatalog>, table: Arc<EntitlementTable>) -> Self {
        Self { catalog, table }
    }

    /// Quota and entitled models for a class, in entitlement order.
    ///
    /// Ids missing from the catalog are dropped.
    pub fn resolve(&self, class: UserClass) -> Resolution<'_> {
        let record = self.table.record(class);
        let available_models = record
            .available_chat_model_ids
            .iter()
            .filter_map(|id| self.catalog.find_by_id(id))
            .collect();

        Resolution {
            max_messages_per_day: record.max_messages_per_day,
            available_models,
        }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn table(&self) -> &EntitlementTable {
        &self.table
    }
}
