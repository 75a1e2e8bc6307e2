use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::templates::TemplateRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Built once at startup; read-only afterwards.
    pub registry: Arc<TemplateRegistry>,
}
