//! In-process admin sessions keyed by a random id carried in a cookie.

use std::collections::HashSet;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "ats_session";

#[derive(Clone, Default)]
pub struct SessionStore {
    ids: Arc<RwLock<HashSet<Uuid>>>,
}

impl SessionStore {
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.ids.write().await.insert(id);
        id
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.ids.read().await.contains(&id)
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.ids.write().await.remove(&id)
    }
}

pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; HttpOnly; SameSite=Strict; Path=/")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0")
}

/// Reads the session id from any `Cookie` header on the request.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value).ok())
}

/// Extractor that only succeeds for a logged-in admin.
pub struct AdminSession;

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        match session_id(&parts.headers) {
            Some(id) if state.sessions.contains(id).await => Ok(AdminSession),
            _ => Err(AppError::Unauthorized("Authentication required".to_string())),
        }
    }
}
