//! Model catalog.
//!
//! This module handles:
//! - Provider and model descriptor types
//! - The built-in catalog data and default model
//! - Read-only catalog queries (by id, by provider)

pub mod catalog;
pub mod defaults;
pub mod types;

pub use catalog::ModelCatalog;
pub use defaults::{default_models, DEFAULT_CHAT_MODEL};
pub use types::{CatalogError, ModelDescriptor, Provider};
