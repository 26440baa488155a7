use std::sync::Arc;

use crate::admin::session::SessionStore;
use crate::config::Config;
use crate::resume::pipeline::ResumePipeline;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup except the admin session set.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ResumePipeline>,
    /// Pluggable document store. Default: PgResumeStore.
    pub store: Arc<dyn ResumeStore>,
    pub sessions: SessionStore,
    pub config: Config,
}
