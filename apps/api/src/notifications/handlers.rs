use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::session::StudentSession;
use crate::errors::AppError;
use crate::notifications::models::{NotificationAction, NotificationBoard, NotificationsResponse};
use crate::notifications::store::{list_notifications, record_response};
use crate::state::AppState;

/// GET /api/v1/notifications
pub async fn handle_list_notifications(
    State(state): State<AppState>,
    session: StudentSession,
) -> Result<Json<NotificationsResponse>, AppError> {
    let notifications = list_notifications(&state.db, session.student_id).await?;
    let board = NotificationBoard::from_notifications(notifications);
    Ok(Json(board.view(Utc::now())))
}

async fn respond(
    state: &AppState,
    student_id: Uuid,
    id: Uuid,
    action: NotificationAction,
) -> Result<NotificationsResponse, AppError> {
    let notifications = list_notifications(&state.db, student_id).await?;
    let mut board = NotificationBoard::from_notifications(notifications);
    let updated = board.respond(id, action)?.clone();
    record_response(&state.db, student_id, &updated).await?;
    Ok(board.view(Utc::now()))
}

/// POST /api/v1/notifications/:id/accept
pub async fn handle_accept(
    State(state): State<AppState>,
    session: StudentSession,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationsResponse>, AppError> {
    Ok(Json(
        respond(&state, session.student_id, id, NotificationAction::Accept).await?,
    ))
}

/// POST /api/v1/notifications/:id/reject
pub async fn handle_reject(
    State(state): State<AppState>,
    session: StudentSession,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationsResponse>, AppError> {
    Ok(Json(
        respond(&state, session.student_id, id, NotificationAction::Reject).await?,
    ))
}
