//! Axum route handlers for the admin API.

use axum::{
    extract::{Path, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::admin::session::{expired_session_cookie, session_cookie, session_id, AdminSession};
use crate::errors::AppError;
use crate::models::resume::StoredResume;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/v1/admin/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.username != state.config.admin_username || req.password != state.config.admin_password {
        warn!("Rejected admin login for '{}'", req.username);
        return Err(AppError::Unauthorized(
            "Invalid credentials, please try again.".to_string(),
        ));
    }

    let id = state.sessions.create().await;
    info!("Admin logged in");
    Ok((
        [(SET_COOKIE, session_cookie(id))],
        Json(json!({ "status": "logged_in" })),
    ))
}

/// POST /api/v1/admin/logout
pub async fn handle_logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(id) = session_id(&headers) {
        state.sessions.remove(id).await;
    }
    (
        [(SET_COOKIE, expired_session_cookie())],
        Json(json!({ "message": "You have been logged out." })),
    )
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredResume>>, AppError> {
    Ok(Json(state.store.find_all().await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredResume>, AppError> {
    state
        .store
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_by_id(id).await? {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    info!("Deleted resume {id}");
    Ok(StatusCode::NO_CONTENT)
}
