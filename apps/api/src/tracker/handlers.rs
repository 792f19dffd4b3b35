use axum::{extract::State, Json};
use serde::Serialize;

use crate::auth::session::StudentSession;
use crate::errors::AppError;
use crate::state::AppState;
use crate::tracker::models::ApplicationView;
use crate::tracker::store::list_applications;

#[derive(Debug, Serialize)]
pub struct ApplicationsResponse {
    pub applications: Vec<ApplicationView>,
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    session: StudentSession,
) -> Result<Json<ApplicationsResponse>, AppError> {
    let applications = list_applications(&state.db, session.student_id).await?;
    Ok(Json(ApplicationsResponse { applications }))
}
