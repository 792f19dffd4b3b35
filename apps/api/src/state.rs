use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::auth::session::SessionStore;
use crate::config::Config;
use crate::profile::extraction::ProfileExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Redis-backed login sessions.
    pub sessions: SessionStore,
    /// Certificate storage.
    pub s3: S3Client,
    pub config: Config,
    /// Resume extractor. Gemini in production, swapped for a canned one in tests.
    pub extractor: Arc<dyn ProfileExtractor>,
}
