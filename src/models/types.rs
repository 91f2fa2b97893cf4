//! Model catalog types.
//!
//! This module provides:
//! - `Provider` enum for the upstream vendor families
//! - `ModelDescriptor` for a single catalog entry
//! - `CatalogError` for catalog construction and parsing failures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building or querying the catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate model id in catalog: {0}")]
    DuplicateId(String),
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
    #[error("Default model not found in catalog: {0}")]
    MissingDefault(String),
}

/// Upstream vendor family a model belongs to.
///
/// The declaration order is the display priority used by the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Google Gemini API
    Google,
    /// OpenAI API
    Openai,
    /// Anthropic API
    Anthropic,
    /// OpenRouter gateway
    Openrouter,
}

impl Provider {
    /// Every provider, in display priority order.
    pub const ALL: [Provider; 4] = [
        Provider::Google,
        Provider::Openai,
        Provider::Anthropic,
        Provider::Openrouter,
    ];

    /// Wire name used in JSON and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Openai => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Openrouter => "openrouter",
        }
    }

    /// Heading shown above this provider's models in the picker.
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Google => "Google Gemini (Default)",
            Provider::Openai => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Openrouter => "OpenRouter",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::Google => "GEMINI_API_KEY",
            Provider::Openai => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::Openrouter => "OPENROUTER_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "google" => Ok(Provider::Google),
            "openai" => Ok(Provider::Openai),
            "anthropic" => Ok(Provider::Anthropic),
            "openrouter" => Ok(Provider::Openrouter),
            _ => Err(CatalogError::UnknownProvider(s.to_string())),
        }
    }
}

/// A single model entry in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    /// Stable public identifier (e.g. "gpt-4o-mini")
    pub id: String,
    /// Human-readable display name
    pub name: String,
    /// Short capability summary shown in the picker
    pub description: String,
    /// Upstream vendor family
    pub provider: Provider,
    /// Advertised context window in tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u32>,
    /// Whether the model accepts image input
    #[serde(default, skip_serializing_if = "is_false")]
    pub supports_vision: bool,
    /// Whether the model is a dedicated reasoning model
    #[serde(default, skip_serializing_if = "is_false")]
    pub supports_reasoning: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ModelDescriptor {
    /// Create a descriptor with no advertised capabilities.
    pub fn new(id: &str, name: &str, description: &str, provider: Provider) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            provider,
            context_window: None,
            supports_vision: false,
            supports_reasoning: false,
        }
    }

    pub fn with_context_window(mut self, tokens: u32) -> Self {
        self.context_window = Some(tokens);
        self
    }

    pub fn with_vision(mut self) -> Self {
        self.supports_vision = true;
        self
    }

    pub fn with_reasoning(mut self) -> Self {
        self.supports_reasoning = true;
        self
    }
}
