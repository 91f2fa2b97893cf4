//! Provider binding table.
//!
//! Maps binding keys to model clients. Two keyspaces resolve here:
//! - public catalog ids (`gpt-4o-mini`), one binding per catalog entry
//! - internal role aliases (`title-model`), each pointing at a catalog id
//!
//! In test mode only the role aliases resolve, each to a [`MockModel`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serdes_ai_models::{openai::OpenAIChatModel, Model};
use thiserror::Error;
use tracing::{debug, error, info};

use super::mock::MockModel;
use super::roles::{live_role_targets, RoleAlias};
use crate::db::{resolve_api_key, Database};
use crate::models::{ModelCatalog, Provider};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Errors building or using the binding table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("No binding for model: {0}")]
    UnknownKey(String),
    #[error("Catalog model {0} has no upstream binding")]
    Unbound(String),
    #[error("Upstream binding references a model missing from the catalog: {0}")]
    NotInCatalog(String),
    #[error("Role {role} targets a model missing from the catalog: {target}")]
    DanglingRole { role: RoleAlias, target: String },
    #[error("API key {0} not found. Store it in the database or set the environment variable.")]
    MissingApiKey(String),
}

/// How bindings are addressed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingMode {
    Live,
    Test,
}

/// A concrete upstream model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamModel {
    pub provider: Provider,
    /// Model name the provider API expects
    pub model: String,
    /// Tag wrapping reasoning blocks in the output, if any
    pub reasoning_tag: Option<String>,
}

impl UpstreamModel {
    fn new(provider: Provider, model: &str) -> Self {
        Self {
            provider,
            model: model.to_string(),
            reasoning_tag: None,
        }
    }

    /// OpenAI-compatible endpoint for the provider. `None` is OpenAI itself.
    pub fn base_url(&self) -> Option<&'static str> {
        match self.provider {
            Provider::Google => Some(GEMINI_BASE_URL),
            Provider::Openai => None,
            Provider::Anthropic => Some(ANTHROPIC_BASE_URL),
            Provider::Openrouter => Some(OPENROUTER_BASE_URL),
        }
    }
}

/// What a binding key resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Live(UpstreamModel),
    Mock(MockModel),
}

/// A connected model ready for the inference pipeline.
pub enum BoundModel {
    Live {
        model: Arc<dyn Model>,
        reasoning_tag: Option<String>,
    },
    Mock(MockModel),
}

impl BoundModel {
    pub fn identifier(&self) -> String {
        match self {
            BoundModel::Live { model, .. } => model.identifier().to_string(),
            BoundModel::Mock(mock) => mock.identifier(),
        }
    }

    pub fn reasoning_tag(&self) -> Option<&str> {
        match self {
            BoundModel::Live { reasoning_tag, .. } => reasoning_tag.as_deref(),
            BoundModel::Mock(mock) if mock.role() == RoleAlias::ChatModelReasoning => Some("think"),
            BoundModel::Mock(_) => None,
        }
    }
}

/// Upstream model per catalog id.
fn upstream_models() -> Vec<(&'static str, UpstreamModel)> {
    vec![
        // Google Gemini
        ("gemini-2.0-flash-exp", UpstreamModel::new(Provider::Google, "gemini-2.0-flash-exp")),
        ("gemini-1.5-pro", UpstreamModel::new(Provider::Google, "gemini-1.5-pro-latest")),
        ("gemini-1.5-flash", UpstreamModel::new(Provider::Google, "gemini-1.5-flash-latest")),
        // OpenAI
        ("gpt-4o", UpstreamModel::new(Provider::Openai, "gpt-4o")),
        ("gpt-4o-mini", UpstreamModel::new(Provider::Openai, "gpt-4o-mini")),
        ("gpt-4-turbo", UpstreamModel::new(Provider::Openai, "gpt-4-turbo")),
        ("o1", UpstreamModel::new(Provider::Openai, "o1")),
        ("o1-mini", UpstreamModel::new(Provider::Openai, "o1-mini")),
        // Anthropic
        (
            "claude-3-5-sonnet",
            UpstreamModel::new(Provider::Anthropic, "claude-3-5-sonnet-20241022"),
        ),
        (
            "claude-3-5-haiku",
            UpstreamModel::new(Provider::Anthropic, "claude-3-5-haiku-20241022"),
        ),
        ("claude-3-opus", UpstreamModel::new(Provider::Anthropic, "claude-3-opus-20240229")),
        // OpenRouter
        (
            "mistral-large",
            UpstreamModel::new(Provider::Openrouter, "mistralai/mistral-large-2411"),
        ),
        (
            "llama-3.3-70b",
            UpstreamModel::new(Provider::Openrouter, "meta-llama/llama-3.3-70b-instruct"),
        ),
        ("deepseek-chat", UpstreamModel::new(Provider::Openrouter, "deepseek/deepseek-chat")),
    ]
}

/// Binding table over catalog ids and role aliases.
#[derive(Debug, Clone)]
pub struct ModelBindings {
    mode: BindingMode,
    entries: HashMap<String, Binding>,
    role_targets: BTreeMap<RoleAlias, String>,
}

impl ModelBindings {
    /// Live bindings for every catalog id plus the role aliases.
    ///
    /// Fails if the upstream table and the catalog disagree, or a role
    /// targets an id the catalog does not have.
    pub fn live(catalog: &ModelCatalog) -> Result<Self, BindingError> {
        let mut entries = HashMap::with_capacity(catalog.len() + RoleAlias::ALL.len());

        for (id, upstream) in upstream_models() {
            if !catalog.contains(id) {
                return Err(BindingError::NotInCatalog(id.to_string()));
            }
            entries.insert(id.to_string(), Binding::Live(upstream));
        }

        if let Some(unbound) = catalog.ids().find(|id| !entries.contains_key(*id)) {
            return Err(BindingError::Unbound(unbound.to_string()));
        }

        let mut role_targets = BTreeMap::new();
        for (role, target, reasoning_tag) in live_role_targets() {
            let Some(Binding::Live(upstream)) = entries.get(target) else {
                return Err(BindingError::DanglingRole {
                    role,
                    target: target.to_string(),
                });
            };
            let mut upstream = upstream.clone();
            upstream.reasoning_tag = reasoning_tag.map(str::to_string);
            entries.insert(role.to_string(), Binding::Live(upstream));
            role_targets.insert(role, target.to_string());
        }

        debug!(bindings = entries.len(), "Live model bindings built");

        Ok(Self {
            mode: BindingMode::Live,
            entries,
            role_targets,
        })
    }

    /// Mock bindings for the role aliases only.
    pub fn mock() -> Self {
        let entries = RoleAlias::ALL
            .into_iter()
            .map(|role| (role.to_string(), Binding::Mock(MockModel::new(role))))
            .collect();

        Self {
            mode: BindingMode::Test,
            entries,
            role_targets: BTreeMap::new(),
        }
    }

    /// Build the table for the requested mode.
    pub fn for_mode(mode: BindingMode, catalog: &ModelCatalog) -> Result<Self, BindingError> {
        match mode {
            BindingMode::Live => Self::live(catalog),
            BindingMode::Test => Ok(Self::mock()),
        }
    }

    pub fn mode(&self) -> BindingMode {
        self.mode
    }

    /// Look up a catalog id or role alias.
    pub fn resolve(&self, key: &str) -> Option<&Binding> {
        self.entries.get(key)
    }

    /// Catalog id a role points at. `None` in test mode.
    pub fn role_target(&self, role: RoleAlias) -> Option<&str> {
        self.role_targets.get(&role).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Turn a binding into a client.
    ///
    /// Every provider goes through the OpenAI-compatible client. The API key
    /// comes from the database key store first, then the environment.
    pub fn connect(&self, db: &Database, key: &str) -> Result<BoundModel, BindingError> {
        let binding = self
            .resolve(key)
            .ok_or_else(|| BindingError::UnknownKey(key.to_string()))?;

        let upstream = match binding {
            Binding::Mock(mock) => {
                debug!(key = %key, "Using mock model");
                return Ok(BoundModel::Mock(mock.clone()));
            }
            Binding::Live(upstream) => upstream,
        };

        let env_name = upstream.provider.api_key_env();
        let api_key = resolve_api_key(db, env_name).ok_or_else(|| {
            error!(key = %key, env = %env_name, "No API key for provider");
            BindingError::MissingApiKey(env_name.to_string())
        })?;

        let client = OpenAIChatModel::new(upstream.model.as_str(), api_key);
        let model: Arc<dyn Model> = match upstream.base_url() {
            Some(url) => Arc::new(client.with_base_url(url)),
            None => Arc::new(client),
        };

        info!(key = %key, upstream = %upstream.model, "Model ready");
        Ok(BoundModel::Live {
            model,
            reasoning_tag: upstream.reasoning_tag.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelDescriptor;
    use tempfile::TempDir;

    fn catalog() -> ModelCatalog {
        ModelCatalog::builtin().unwrap()
    }

    fn setup_test_db() -> (TempDir, Database) {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open_at(temp_dir.path().join("test.db")).unwrap();
        db.migrate().unwrap();
        (temp_dir, db)
    }

    #[test]
    fn test_live_binds_every_catalog_id() {
        let catalog = catalog();
        let bindings = ModelBindings::live(&catalog).unwrap();
        for id in catalog.ids() {
            assert!(
                matches!(bindings.resolve(id), Some(Binding::Live(_))),
                "{} should be bound",
                id
            );
        }
        assert_eq!(bindings.len(), catalog.len() + RoleAlias::ALL.len());
    }

    #[test]
    fn test_live_binding_provider_matches_catalog() {
        let catalog = catalog();
        let bindings = ModelBindings::live(&catalog).unwrap();
        for model in catalog.all() {
            let Some(Binding::Live(upstream)) = bindings.resolve(&model.id) else {
                panic!("missing binding for {}", model.id);
            };
            assert_eq!(upstream.provider, model.provider);
        }
    }

    #[test]
    fn test_live_upstream_names() {
        let bindings = ModelBindings::live(&catalog()).unwrap();
        let upstream = |key: &str| match bindings.resolve(key) {
            Some(Binding::Live(u)) => u.model.clone(),
            other => panic!("unexpected binding for {}: {:?}", key, other),
        };
        assert_eq!(upstream("gemini-1.5-pro"), "gemini-1.5-pro-latest");
        assert_eq!(upstream("claude-3-opus"), "claude-3-opus-20240229");
        assert_eq!(upstream("llama-3.3-70b"), "meta-llama/llama-3.3-70b-instruct");
    }

    #[test]
    fn test_live_roles_follow_targets() {
        let bindings = ModelBindings::live(&catalog()).unwrap();

        assert_eq!(bindings.role_target(RoleAlias::ChatModel), Some("gemini-2.0-flash-exp"));
        assert_eq!(bindings.role_target(RoleAlias::TitleModel), Some("gemini-1.5-flash"));
        assert_eq!(bindings.role_target(RoleAlias::ArtifactModel), Some("gemini-1.5-pro"));

        let Some(Binding::Live(reasoning)) = bindings.resolve("chat-model-reasoning") else {
            panic!("reasoning role should be bound");
        };
        assert_eq!(reasoning.model, "o1");
        assert_eq!(reasoning.reasoning_tag.as_deref(), Some("think"));

        let Some(Binding::Live(title)) = bindings.resolve("title-model") else {
            panic!("title role should be bound");
        };
        assert_eq!(title.model, "gemini-1.5-flash-latest");
        assert_eq!(title.reasoning_tag, None);
    }

    #[test]
    fn test_live_rejects_catalog_without_binding() {
        let mut models = crate::models::default_models();
        models.push(ModelDescriptor::new("gpt-5", "GPT-5", "New", Provider::Openai));
        let catalog = ModelCatalog::new(models, "gpt-4o").unwrap();

        assert_eq!(
            ModelBindings::live(&catalog).unwrap_err(),
            BindingError::Unbound("gpt-5".to_string())
        );
    }

    #[test]
    fn test_live_rejects_binding_outside_catalog() {
        let models: Vec<ModelDescriptor> = crate::models::default_models()
            .into_iter()
            .filter(|m| m.id != "deepseek-chat")
            .collect();
        let catalog = ModelCatalog::new(models, "gpt-4o").unwrap();

        assert_eq!(
            ModelBindings::live(&catalog).unwrap_err(),
            BindingError::NotInCatalog("deepseek-chat".to_string())
        );
    }

    #[test]
    fn test_mock_only_resolves_roles() {
        let bindings = ModelBindings::mock();
        assert_eq!(bindings.mode(), BindingMode::Test);
        assert_eq!(bindings.len(), 4);

        for role in RoleAlias::ALL {
            assert_eq!(
                bindings.resolve(role.as_str()),
                Some(&Binding::Mock(MockModel::new(role)))
            );
            assert_eq!(bindings.role_target(role), None);
        }
        assert!(bindings.resolve("gpt-4o").is_none());
    }

    #[test]
    fn test_for_mode() {
        let catalog = catalog();
        assert_eq!(
            ModelBindings::for_mode(BindingMode::Test, &catalog).unwrap().mode(),
            BindingMode::Test
        );
        assert_eq!(
            ModelBindings::for_mode(BindingMode::Live, &catalog).unwrap().mode(),
            BindingMode::Live
        );
    }

    #[test]
    fn test_upstream_base_urls() {
        assert_eq!(UpstreamModel::new(Provider::Openai, "gpt-4o").base_url(), None);
        assert_eq!(
            UpstreamModel::new(Provider::Google, "gemini-1.5-pro-latest").base_url(),
            Some(GEMINI_BASE_URL)
        );
        assert_eq!(
            UpstreamModel::new(Provider::Openrouter, "deepseek/deepseek-chat").base_url(),
            Some(OPENROUTER_BASE_URL)
        );
    }

    #[test]
    fn test_connect_unknown_key() {
        let (_temp, db) = setup_test_db();
        let bindings = ModelBindings::live(&catalog()).unwrap();
        assert!(matches!(
            bindings.connect(&db, "gpt-5"),
            Err(BindingError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_connect_mock() {
        let (_temp, db) = setup_test_db();
        let bindings = ModelBindings::mock();
        let bound = bindings.connect(&db, "chat-model-reasoning").unwrap();
        assert_eq!(bound.identifier(), "mock/chat-model-reasoning");
        assert_eq!(bound.reasoning_tag(), Some("think"));
    }

    #[test]
    fn test_connect_openrouter_uses_stored_key() {
        let (_temp, db) = setup_test_db();
        db.save_api_key("OPENROUTER_API_KEY", "or-test-key").unwrap();
        let bindings = ModelBindings::live(&catalog()).unwrap();

        let bound = bindings.connect(&db, "deepseek-chat").unwrap();
        assert!(bound.identifier().contains("deepseek/deepseek-chat"));
        assert_eq!(bound.reasoning_tag(), None);
    }

    #[test]
    fn test_connect_uses_stored_key_for_every_provider() {
        let (_temp, db) = setup_test_db();
        for provider in Provider::ALL {
            db.save_api_key(provider.api_key_env(), "stored-test-key").unwrap();
        }
        let bindings = ModelBindings::live(&catalog()).unwrap();

        for (key, upstream) in [
            ("gemini-1.5-pro", "gemini-1.5-pro-latest"),
            ("gpt-4o", "gpt-4o"),
            ("claude-3-5-haiku", "claude-3-5-haiku-20241022"),
        ] {
            let bound = bindings.connect(&db, key).unwrap();
            assert!(bound.identifier().contains(upstream), "{} should bind {}", key, upstream);
        }

        let reasoning = bindings.connect(&db, "chat-model-reasoning").unwrap();
        assert_eq!(reasoning.reasoning_tag(), Some("think"));
    }

    #[test]
    fn test_connect_missing_key() {
        let (_temp, db) = setup_test_db();
        std::env::remove_var("ANTHROPIC_API_KEY");
        let bindings = ModelBindings::live(&catalog()).unwrap();

        assert!(matches!(
            bindings.connect(&db, "claude-3-opus"),
            Err(BindingError::MissingApiKey(ref name)) if name == "ANTHROPIC_API_KEY"
        ));
    }
}
