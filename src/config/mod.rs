//! Configuration management.

mod settings;

use std::path::PathBuf;

use crate::entitlements::UserClass;
use crate::providers::BindingMode;

pub use settings::{Settings, SettingsError};

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_SESSION: &str = "default";

/// Startup options, filled from the command line and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterConfig {
    pub user_class: UserClass,
    pub session: String,
    /// Database path; `None` uses the data directory
    pub db_path: Option<PathBuf>,
    pub bind: String,
    /// Fail startup when entitlements name models the catalog lacks
    pub strict_entitlements: bool,
    /// Bind role aliases to mock models
    pub test_mode: bool,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            user_class: UserClass::default(),
            session: DEFAULT_SESSION.to_string(),
            db_path: None,
            bind: DEFAULT_BIND.to_string(),
            strict_entitlements: false,
            test_mode: false,
        }
    }
}

impl RosterConfig {
    pub fn binding_mode(&self) -> BindingMode {
        if self.test_mode {
            BindingMode::Test
        } else {
            BindingMode::Live
        }
    }
}
