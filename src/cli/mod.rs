//! Command-line interface: model listing, picker and key management.

pub mod commands;
pub mod keys;
pub mod model_picker;

pub use commands::{clear_selection, render_models, render_settings, show_models, show_settings};
pub use keys::{api_key_status, remove_api_key, render_api_keys, set_api_key, store_api_key, KeySource};
pub use model_picker::{pick_model, picker_items};
