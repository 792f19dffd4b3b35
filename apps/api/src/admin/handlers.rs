use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::admin::directory::search_students;
use crate::admin::drives::{post_drive, DrivePosted, DriveRequest};
use crate::admin::roster::{import_roster, parse_roster_csv, ImportReport};
use crate::auth::session::AdminSession;
use crate::errors::AppError;
use crate::models::student::DirectoryEntryRow;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DirectoryQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct DirectoryResponse {
    pub students: Vec<DirectoryEntryRow>,
}

/// GET /api/v1/admin/students?q=
pub async fn handle_search_students(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(params): Query<DirectoryQuery>,
) -> Result<Json<DirectoryResponse>, AppError> {
    let students = search_students(&state.db, &params.q).await?;
    Ok(Json(DirectoryResponse { students }))
}

/// POST /api/v1/admin/students/import
pub async fn handle_import_roster(
    State(state): State<AppState>,
    admin: AdminSession,
    body: String,
) -> Result<Json<ImportReport>, AppError> {
    let parsed = parse_roster_csv(&body);
    if parsed.entries.is_empty() && parsed.errors.is_empty() {
        return Err(AppError::Validation("roster is empty".to_string()));
    }
    tracing::info!("Roster import started by {}", admin.email);
    Ok(Json(import_roster(&state.db, parsed).await?))
}

/// POST /api/v1/admin/drives
pub async fn handle_post_drive(
    State(state): State<AppState>,
    admin: AdminSession,
    Json(req): Json<DriveRequest>,
) -> Result<(StatusCode, Json<DrivePosted>), AppError> {
    let posted = post_drive(&state.db, &admin.email, &req).await?;
    Ok((StatusCode::CREATED, Json(posted)))
}
