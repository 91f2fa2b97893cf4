//! Provider bindings: catalog ids and role aliases to model clients.

mod bindings;
mod mock;
mod reasoning;
mod roles;

pub use bindings::{
    Binding, BindingError, BindingMode, BoundModel, ModelBindings, UpstreamModel,
    ANTHROPIC_BASE_URL, GEMINI_BASE_URL, OPENROUTER_BASE_URL,
};
pub use mock::MockModel;
pub use reasoning::{extract_reasoning, ExtractedReasoning};
pub use roles::RoleAlias;
