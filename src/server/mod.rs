//! HTTP listing and selection API.

mod routes;
mod serve;

pub use routes::{router, AppState, ModelsResponse, SelectionRequest};
pub use serve::{serve, serve_until_ctrl_c, ServeHandle};
