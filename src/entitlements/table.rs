//! Entitlement table: per user class quota and model allow-list.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ModelCatalog;

/// Errors raised while wiring entitlements at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntitlementError {
    #[error("invalid user class: {0}")]
    UnknownUserClass(String),
    #[error("no entitlement record for user class: {0}")]
    MissingRecord(UserClass),
    #[error("daily message quota must be positive for user class: {0}")]
    ZeroQuota(UserClass),
    #[error("entitlements reference models missing from the catalog: {}", format_dangling(.0))]
    DanglingIds(Vec<(UserClass, String)>),
}

fn format_dangling(dangling: &[(UserClass, String)]) -> String {
    dangling
        .iter()
        .map(|(class, id)| format!("{}:{}", class, id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Closed set of user classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserClass {
    /// Users without an account
    #[default]
    Guest,
    /// Users with an account
    Regular,
}

impl UserClass {
    pub const ALL: [UserClass; 2] = [UserClass::Guest, UserClass::Regular];
}

impl fmt::Display for UserClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Guest => "guest",
            Self::Regular => "regular",
        };
        f.write_str(s)
    }
}

impl FromStr for UserClass {
    type Err = EntitlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "guest" => Ok(Self::Guest),
            "regular" => Ok(Self::Regular),
            _ => Err(EntitlementError::UnknownUserClass(s.to_string())),
        }
    }
}

/// Quota and permitted models for one user class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementRecord {
    pub max_messages_per_day: u32,
    pub available_chat_model_ids: Vec<String>,
}

impl EntitlementRecord {
    pub fn new(max_messages_per_day: u32, ids: &[&str]) -> Self {
        Self {
            max_messages_per_day,
            available_chat_model_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Immutable map from user class to entitlement record.
#[derive(Debug, Clone)]
pub struct EntitlementTable {
    records: BTreeMap<UserClass, EntitlementRecord>,
}

impl EntitlementTable {
    /// Build a table. Every user class must have a record with a positive quota.
    pub fn new(records: BTreeMap<UserClass, EntitlementRecord>) -> Result<Self, EntitlementError> {
        if let Some(missing) = UserClass::ALL.iter().find(|c| !records.contains_key(c)) {
            return Err(EntitlementError::MissingRecord(*missing));
        }
        if let Some((class, _)) = records.iter().find(|(_, r)| r.max_messages_per_day == 0) {
            return Err(EntitlementError::ZeroQuota(*class));
        }
        Ok(Self { records })
    }

    /// The bundled entitlements.
    pub fn builtin() -> Self {
        let mut records = BTreeMap::new();
        records.insert(
            UserClass::Guest,
            EntitlementRecord::new(
                20,
                &[
                    // Google Gemini (default)
                    "gemini-2.0-flash-exp",
                    "gemini-1.5-flash",
                    // OpenAI
                    "gpt-4o-mini",
                    // Anthropic
                    "claude-3-5-haiku",
                ],
            ),
        );
        records.insert(
            UserClass::Regular,
            EntitlementRecord::new(
                100,
                &[
                    // Google Gemini
                    "gemini-2.0-flash-exp",
                    "gemini-1.5-pro",
                    "gemini-1.5-flash",
                    // OpenAI
                    "gpt-4o",
                    "gpt-4o-mini",
                    "gpt-4-turbo",
                    "o1",
                    "o1-mini",
                    // Anthropic
                    "claude-3-5-sonnet",
                    "claude-3-5-haiku",
                    "claude-3-opus",
                    // OpenRouter
                    "mistral-large",
                    "llama-3.3-70b",
                    "deepseek-chat",
                ],
            ),
        );
        Self { records }
    }

    /// Record for a user class. Total because the table covers every class.
    pub fn record(&self, class: UserClass) -> &EntitlementRecord {
        &self.records[&class]
    }

    pub fn iter(&self) -> impl Iterator<Item = (UserClass, &EntitlementRecord)> {
        self.records.iter().map(|(class, record)| (*class, record))
    }

    /// Entitled ids that do not exist in the catalog, per class.
    pub fn dangling_ids(&self, catalog: &ModelCatalog) -> Vec<(UserClass, String)> {
        self.iter()
            .flat_map(|(class, record)| {
                record
                    .available_chat_model_ids
                    .iter()
                    .filter(|id| !catalog.contains(id))
                    .map(move |id| (class, id.clone()))
            })
            .collect()
    }

    /// Check references against the catalog.
    ///
    /// Dangling ids are always logged. With `strict` they are fatal.
    pub fn validate(&self, catalog: &ModelCatalog, strict: bool) -> Result<(), EntitlementError> {
        let dangling = self.dangling_ids(catalog);
        if dangling.is_empty() {
            return Ok(());
        }

        for (class, id) in &dangling {
            tracing::warn!(
                user_class = %class,
                model = %id,
                "Entitlement references a model missing from the catalog"
            );
        }

        if strict {
            Err(EntitlementError::DanglingIds(dangling))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_class_round_trip() {
        for class in UserClass::ALL {
            assert_eq!(class.to_string().parse::<UserClass>(), Ok(class));
        }
        assert_eq!(" Regular ".parse::<UserClass>(), Ok(UserClass::Regular));
    }

    #[test]
    fn test_user_class_unknown_is_error() {
        assert_eq!(
            "premium".parse::<UserClass>(),
            Err(EntitlementError::UnknownUserClass("premium".to_string()))
        );
    }

    #[test]
    fn test_builtin_quotas() {
        let table = EntitlementTable::builtin();
        assert_eq!(table.record(UserClass::Guest).max_messages_per_day, 20);
        assert_eq!(table.record(UserClass::Regular).max_messages_per_day, 100);
    }

    #[test]
    fn test_builtin_has_no_dangling_ids() {
        let table = EntitlementTable::builtin();
        let catalog = ModelCatalog::builtin().unwrap();
        assert!(table.dangling_ids(&catalog).is_empty());
        assert!(table.validate(&catalog, true).is_ok());
    }

    #[test]
    fn test_regular_covers_whole_catalog_in_order() {
        let table = EntitlementTable::builtin();
        let catalog = ModelCatalog::builtin().unwrap();
        let ids: Vec<&str> = table
            .record(UserClass::Regular)
            .available_chat_model_ids
            .iter()
            .map(|s| s.as_str())
            .collect();
        assert_eq!(ids, catalog.ids().collect::<Vec<_>>());
    }

    fn table_with_dangling() -> EntitlementTable {
        let mut records = BTreeMap::new();
        records.insert(UserClass::Guest, EntitlementRecord::new(5, &["gpt-4o", "gpt-5"]));
        records.insert(UserClass::Regular, EntitlementRecord::new(10, &["o1"]));
        EntitlementTable::new(records).unwrap()
    }

    #[test]
    fn test_dangling_ids_reported() {
        let catalog = ModelCatalog::builtin().unwrap();
        let table = table_with_dangling();
        assert_eq!(
            table.dangling_ids(&catalog),
            vec![(UserClass::Guest, "gpt-5".to_string())]
        );
    }

    #[test]
    fn test_validate_lenient_vs_strict() {
        let catalog = ModelCatalog::builtin().unwrap();
        let table = table_with_dangling();
        assert!(table.validate(&catalog, false).is_ok());

        let err = table.validate(&catalog, true).unwrap_err();
        assert!(err.to_string().contains("guest:gpt-5"));
    }

    #[test]
    fn test_new_requires_every_class() {
        let mut records = BTreeMap::new();
        records.insert(UserClass::Guest, EntitlementRecord::new(5, &[]));
        assert_eq!(
            EntitlementTable::new(records).unwrap_err(),
            EntitlementError::MissingRecord(UserClass::Regular)
        );
    }

    #[test]
    fn test_new_rejects_zero_quota() {
        let mut records = BTreeMap::new();
        records.insert(UserClass::Guest, EntitlementRecord::new(5, &["gpt-4o-mini"]));
        records.insert(UserClass::Regular, EntitlementRecord::new(0, &["gpt-4o"]));
        let err = EntitlementTable::new(records).unwrap_err();
        assert_eq!(err, EntitlementError::ZeroQuota(UserClass::Regular));
        assert!(err.to_string().contains("regular"));
    }
}
