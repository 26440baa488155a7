pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::admin::handlers as admin;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume parsing
        .route(
            "/api/v1/resumes/parse",
            post(resume::handle_parse).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Admin session
        .route("/api/v1/admin/login", post(admin::handle_login))
        .route("/api/v1/admin/logout", post(admin::handle_logout))
        // Stored resumes (admin only)
        .route("/api/v1/resumes", get(admin::handle_list_resumes))
        .route(
            "/api/v1/resumes/:id",
            get(admin::handle_get_resume).delete(admin::handle_delete_resume),
        )
        .with_state(state)
}
