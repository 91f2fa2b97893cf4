//! Model selection presentation.
//!
//! Groups entitled models by provider for the picker and tracks the chosen
//! model per session.

mod menu;
mod state;

pub use menu::{build_menu, group_by_provider, MenuEntry, ProviderGroup};
pub use state::{
    effective_selection, load_session_selection, save_session_selection, SelectionState,
};
