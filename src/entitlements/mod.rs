//! User entitlements.
//!
//! This module handles:
//! - The closed set of user classes
//! - Per-class quota and model allow-lists
//! - Resolving a class to the catalog entries it may use
//! - Daily quota checks

pub mod quota;
pub mod resolver;
pub mod table;

pub use quota::QuotaStatus;
pub use resolver::{EntitlementResolver, Resolution};
pub use table::{EntitlementError, EntitlementRecord, EntitlementTable, UserClass};
