//! Route handlers for the roster HTTP API.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::config::Settings;
use crate::db::{Database, UsageRepository};
use crate::entitlements::{EntitlementError, QuotaStatus, UserClass};
use crate::models::{ModelDescriptor, Provider};
use crate::roster::Roster;
use crate::selection::effective_selection;

/// Shared state for all handlers.
pub struct AppState {
    pub roster: Roster,
    pub db: Mutex<Database>,
}

impl AppState {
    pub fn new(roster: Roster, db: Database) -> Self {
        Self {
            roster,
            db: Mutex::new(db),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/models", get(list_models))
        .route("/api/entitlements/{user_class}", get(get_entitlements))
        .route("/api/selection", put(put_selection))
        .route(
            "/api/selection/{session}",
            get(get_selection).delete(delete_selection),
        )
        .route("/api/usage/{user_id}", get(get_usage).post(record_usage))
        .with_state(state)
}

type ApiResponse = (StatusCode, Json<serde_json::Value>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiResponse {
    let message: String = message.into();
    (status, Json(serde_json::json!({ "error": message })))
}

fn json_response<T: Serialize>(value: &T) -> ApiResponse {
    match serde_json::to_value(value) {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => {
            error!(error = %e, "Failed to serialize response");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Serialization failed")
        }
    }
}

/// Parse an optional `user_class` query value, defaulting to guest.
fn parse_user_class(raw: Option<&str>) -> Result<UserClass, ApiResponse> {
    match raw {
        None => Ok(UserClass::default()),
        Some(raw) => raw
            .parse()
            .map_err(|e: EntitlementError| error_response(StatusCode::BAD_REQUEST, e.to_string())),
    }
}

#[derive(Debug, Deserialize)]
pub struct ModelsQuery {
    pub provider: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DefaultModel {
    pub provider: Provider,
    pub model: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ModelsResponse<'a> {
    Filtered {
        provider: String,
        models: Vec<&'a ModelDescriptor>,
    },
    All {
        models: &'a [ModelDescriptor],
        providers: Vec<Provider>,
        default: DefaultModel,
    },
}

/// GET /api/models - list the catalog, optionally for one provider.
///
/// An unknown provider echoes back with an empty list.
pub async fn list_models(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ModelsQuery>,
) -> ApiResponse {
    let catalog = state.roster.catalog();

    let response = match params.provider {
        Some(provider) => {
            let models = catalog.find_by_provider_name(&provider);
            debug!(provider = %provider, count = models.len(), "Listing models for provider");
            ModelsResponse::Filtered { provider, models }
        }
        None => {
            let default = catalog.default_model();
            ModelsResponse::All {
                models: catalog.all(),
                providers: catalog.providers(),
                default: DefaultModel {
                    provider: default.provider,
                    model: default.id.clone(),
                },
            }
        }
    };

    json_response(&response)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EntitlementsResponse<'a> {
    user_class: UserClass,
    max_messages_per_day: u32,
    available_models: Vec<&'a ModelDescriptor>,
}

/// GET /api/entitlements/{user_class} - quota and models for a class.
pub async fn get_entitlements(
    State(state): State<Arc<AppState>>,
    Path(user_class): Path<String>,
) -> ApiResponse {
    let class: UserClass = match user_class.parse() {
        Ok(class) => class,
        Err(_) => {
            return error_response(
                StatusCode::NOT_FOUND,
                format!("Unknown user class: {}", user_class),
            );
        }
    };

    let resolution = state.roster.resolver().resolve(class);
    json_response(&EntitlementsResponse {
        user_class: class,
        max_messages_per_day: resolution.max_messages_per_day,
        available_models: resolution.available_models,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    /// Omitted to start a new session
    pub session: Option<String>,
    pub model_id: String,
}

/// PUT /api/selection - persist a model choice for a session.
pub async fn put_selection(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectionRequest>,
) -> ApiResponse {
    if !state.roster.catalog().contains(&req.model_id) {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Unknown model: {}", req.model_id),
        );
    }

    let session = req
        .session
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let db = state.db.lock().await;
    if let Err(e) = Settings::new(&db).set_selected_model(&session, &req.model_id) {
        error!(session = %session, error = %e, "Failed to save selection");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save selection");
    }

    debug!(session = %session, model = %req.model_id, "Selection saved");
    (
        StatusCode::OK,
        Json(serde_json::json!({ "session": session, "modelId": req.model_id })),
    )
}

#[derive(Debug, Deserialize)]
pub struct UserClassQuery {
    pub user_class: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectionResponse<'a> {
    session: String,
    user_class: UserClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    stored_model_id: Option<String>,
    fallback: bool,
    model: &'a ModelDescriptor,
}

/// GET /api/selection/{session} - the model a session will use.
pub async fn get_selection(
    State(state): State<Arc<AppState>>,
    Path(session): Path<String>,
    Query(params): Query<UserClassQuery>,
) -> ApiResponse {
    let class = match parse_user_class(params.user_class.as_deref()) {
        Ok(class) => class,
        Err(resp) => return resp,
    };

    let stored = {
        let db = state.db.lock().await;
        Settings::new(&db).selected_model(&session)
    };

    let resolution = state.roster.resolver().resolve(class);
    let model = effective_selection(state.roster.catalog(), &resolution, stored.as_deref());

    json_response(&SelectionResponse {
        fallback: stored.as_deref().is_some_and(|id| id != model.id),
        session,
        user_class: class,
        stored_model_id: stored,
        model,
    })
}

/// DELETE /api/selection/{session} - forget a session's stored model.
pub async fn delete_selection(
    State(state): State<Arc<AppState>>,
    Path(session): Path<String>,
) -> ApiResponse {
    let db = state.db.lock().await;
    if let Err(e) = Settings::new(&db).clear_selected_model(&session) {
        error!(session = %session, error = %e, "Failed to clear selection");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to clear selection");
    }

    debug!(session = %session, "Selection cleared");
    (
        StatusCode::OK,
        Json(serde_json::json!({ "session": session, "cleared": true })),
    )
}

/// GET /api/usage/{user_id} - today's quota status.
pub async fn get_usage(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<UserClassQuery>,
) -> ApiResponse {
    let class = match parse_user_class(params.user_class.as_deref()) {
        Ok(class) => class,
        Err(resp) => return resp,
    };
    let limit = state.roster.resolver().resolve(class).max_messages_per_day;

    let db = state.db.lock().await;
    match UsageRepository::new(&db).quota_status(&user_id, limit) {
        Ok(status) => json_response(&status),
        Err(e) => {
            error!(user = %user_id, error = %e, "Failed to read usage");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read usage")
        }
    }
}

/// POST /api/usage/{user_id} - count one message against today's quota.
///
/// Refused with 429 once the class limit is reached.
pub async fn record_usage(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<UserClassQuery>,
) -> ApiResponse {
    let class = match parse_user_class(params.user_class.as_deref()) {
        Ok(class) => class,
        Err(resp) => return resp,
    };
    let limit = state.roster.resolver().resolve(class).max_messages_per_day;

    let db = state.db.lock().await;
    let usage = UsageRepository::new(&db);

    let status = match usage.quota_status(&user_id, limit) {
        Ok(status) => status,
        Err(e) => {
            error!(user = %user_id, error = %e, "Failed to read usage");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read usage");
        }
    };
    if !status.can_send() {
        warn!(user = %user_id, user_class = %class, limit, "Daily message quota exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": "Daily message quota exceeded",
                "used": status.used,
                "limit": status.limit,
            })),
        );
    }

    match usage.record_message(&user_id) {
        Ok(used) => json_response(&QuotaStatus::new(used, limit)),
        Err(e) => {
            error!(user = %user_id, error = %e, "Failed to record usage");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to record usage")
        }
    }
}
