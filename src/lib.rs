//! Model Roster Library
//!
//! Catalog of chat models, per user class entitlements, and the pieces that
//! present and serve them.
//!
//! ## Main Components
//!
//! - [`models`] - Model catalog and query service
//! - [`entitlements`] - Entitlement table, resolver and quota status
//! - [`selection`] - Provider grouping and persisted model selection
//! - [`providers`] - Bindings from model ids and role aliases to clients
//! - [`server`] - HTTP listing and selection API
//! - [`cli`] - Listing command and interactive picker
//! - [`config`] - Startup options and settings management
//! - [`db`] - SQLite database for persistence
//!
//! ## Quick Start
//!
//! ```ignore
//! use model_roster::{Roster, RosterConfig, UserClass};
//!
//! let roster = Roster::builtin(&RosterConfig::default())?;
//! let guest = roster.resolver().resolve(UserClass::Guest);
//! assert_eq!(guest.max_messages_per_day, 20);
//! ```

pub mod cli;
pub mod config;
pub mod db;
pub mod entitlements;
pub mod models;
pub mod providers;
pub mod roster;
pub mod selection;
pub mod server;

// Re-export commonly used types
pub use config::{RosterConfig, Settings, SettingsError};
pub use db::{Database, UsageRepository};
pub use entitlements::{
    EntitlementError, EntitlementResolver, EntitlementTable, QuotaStatus, Resolution, UserClass,
};
pub use models::{CatalogError, ModelCatalog, ModelDescriptor, Provider, DEFAULT_CHAT_MODEL};
pub use providers::{Binding, BindingError, BindingMode, BoundModel, ModelBindings, RoleAlias};
pub use roster::{Roster, StartupError};
pub use selection::{effective_selection, group_by_provider, SelectionState};
pub use server::{serve, AppState, ServeHandle};
