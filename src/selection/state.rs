//! Chat model selection: fallback and optimistic updates.

use tracing::{debug, warn};

use crate::config::{Settings, SettingsError};
use crate::entitlements::Resolution;
use crate::models::{ModelCatalog, ModelDescriptor};

/// The model a session actually uses.
///
/// A stored id outside the resolved set (retired, or not entitled) falls
/// back to the catalog default.
pub fn effective_selection<'a>(
    catalog: &'a ModelCatalog,
    resolution: &Resolution<'a>,
    stored_id: Option<&str>,
) -> &'a ModelDescriptor {
    if let Some(id) = stored_id {
        if let Some(model) = resolution.available_models.iter().copied().find(|m| m.id == id) {
            return model;
        }
        debug!(model = %id, fallback = %catalog.default_id(), "Stored model not available");
    }
    catalog.default_model()
}

/// Selection shown to the user, with at most one unconfirmed change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    confirmed: String,
    pending: Option<String>,
}

impl SelectionState {
    pub fn new(confirmed: impl Into<String>) -> Self {
        Self {
            confirmed: confirmed.into(),
            pending: None,
        }
    }

    /// Id to display: the pending choice if any, else the confirmed one.
    pub fn displayed(&self) -> &str {
        self.pending.as_deref().unwrap_or(&self.confirmed)
    }

    pub fn confirmed(&self) -> &str {
        &self.confirmed
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Show a new choice before it is persisted.
    pub fn select(&mut self, id: impl Into<String>) {
        self.pending = Some(id.into());
    }

    pub fn commit(&mut self) {
        if let Some(id) = self.pending.take() {
            self.confirmed = id;
        }
    }

    pub fn revert(&mut self) {
        if let Some(id) = self.pending.take() {
            warn!(model = %id, restored = %self.confirmed, "Selection not saved, reverting");
        }
    }

    /// Select, persist, then commit or revert depending on the outcome.
    pub fn apply<E>(
        &mut self,
        id: &str,
        persist: impl FnOnce(&str) -> Result<(), E>,
    ) -> Result<(), E> {
        self.select(id);
        match persist(id) {
            Ok(()) => {
                self.commit();
                Ok(())
            }
            Err(e) => {
                self.revert();
                Err(e)
            }
        }
    }

    /// Display name for the picker trigger.
    pub fn trigger_label<'a>(&self, catalog: &'a ModelCatalog) -> &'a str {
        catalog
            .find_by_id(self.displayed())
            .unwrap_or_else(|| catalog.default_model())
            .name
            .as_str()
    }
}

/// Load the selection state for a session from settings.
pub fn load_session_selection(
    settings: &Settings<'_>,
    session: &str,
    catalog: &ModelCatalog,
    resolution: &Resolution<'_>,
) -> SelectionState {
    let stored = settings.selected_model(session);
    let model = effective_selection(catalog, resolution, stored.as_deref());
    SelectionState::new(model.id.as_str())
}

/// Apply a choice and persist it for the session.
pub fn save_session_selection(
    settings: &Settings<'_>,
    session: &str,
    state: &mut SelectionState,
    model_id: &str,
) -> Result<(), SettingsError> {
    state.apply(model_id, |id| settings.set_selected_model(session, id))
}
