use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::login::{check_credentials, normalize_email, Portal};
use crate::auth::session::{Session, SessionToken};
use crate::errors::AppError;
use crate::models::student::{AdminLoginRow, StudentLoginRow};
use crate::state::AppState;

// Seeded rows may carry mixed-case emails; the bound value is already lowercased.
const STUDENT_LOOKUP: &str = "SELECT * FROM student_login WHERE lower(email) = $1";
const ADMIN_LOOKUP: &str = "SELECT * FROM admin_login WHERE lower(email) = $1";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<Uuid>,
}

impl LoginRequest {
    fn validate(&self) -> Result<String, AppError> {
        let email = normalize_email(&self.email);
        if email.is_empty() {
            return Err(AppError::Validation("email cannot be empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(AppError::Validation("password cannot be empty".to_string()));
        }
        Ok(email)
    }
}

/// POST /api/v1/auth/student/login
pub async fn handle_student_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = req.validate()?;

    let row: Option<StudentLoginRow> = sqlx::query_as(STUDENT_LOOKUP)
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;

    check_credentials(
        Portal::Student,
        row.as_ref().map(|r| r.password_hash.as_str()),
        &req.password,
    )?;
    // check_credentials only succeeds when a row was found
    let row = row.ok_or(AppError::Unauthorized)?;

    let token = state
        .sessions
        .create(&Session::Student {
            student_id: row.id,
            email: row.email.clone(),
        })
        .await?;
    info!("Student {} signed in", row.id);

    Ok(Json(LoginResponse {
        token,
        expires_in: state.sessions.ttl_secs(),
        email: row.email,
        student_id: Some(row.id),
    }))
}

/// POST /api/v1/auth/admin/login
pub async fn handle_admin_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = req.validate()?;

    let row: Option<AdminLoginRow> = sqlx::query_as(ADMIN_LOOKUP)
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;

    check_credentials(
        Portal::Admin,
        row.as_ref().map(|r| r.password_hash.as_str()),
        &req.password,
    )?;

    let row = row.ok_or(AppError::Unauthorized)?;

    // The stored spelling is kept so drives reference the admin_login key.
    let token = state
        .sessions
        .create(&Session::Admin {
            email: row.email.clone(),
        })
        .await?;
    info!("Admin {} signed in", row.email);

    Ok(Json(LoginResponse {
        token,
        expires_in: state.sessions.ttl_secs(),
        email: row.email,
        student_id: None,
    }))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<StatusCode, AppError> {
    state.sessions.delete(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}
