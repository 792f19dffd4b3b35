use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::session::StudentSession;
use crate::errors::AppError;
use crate::profile::certificates::{certificates_with_links, preview_link, store_certificate};
use crate::profile::extraction::extract_profile;
use crate::profile::models::{Certificate, ExtractedProfile, StudentProfile};
use crate::profile::persist::{assemble_profile, insert_profile, latest_profile};
use crate::profile::render::render_profile_card;
use crate::profile::section_parser::{extract_text, parse_resume_text, ParsedSections};
use crate::profile::upload::read_upload;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeProcessedResponse {
    pub profile_id: Uuid,
    pub profile: ExtractedProfile,
    pub message: String,
}

/// POST /api/v1/profile/resume
///
/// Runs the full pipeline: encode → extract → persist.
pub async fn handle_process_resume(
    State(state): State<AppState>,
    session: StudentSession,
    mut multipart: Multipart,
) -> Result<Json<ResumeProcessedResponse>, AppError> {
    let upload = read_upload(&mut multipart, "resume").await?;
    let profile = extract_profile(state.extractor.as_ref(), &upload).await?;
    let profile_id = insert_profile(&state.db, session.student_id, &profile).await?;

    Ok(Json(ResumeProcessedResponse {
        profile_id,
        profile,
        message: "Your profile has been updated with the extracted information.".to_string(),
    }))
}

/// POST /api/v1/profile/resume/parse
///
/// Rule-based preview from the document's text layer. Nothing is stored.
pub async fn handle_parse_resume(
    _session: StudentSession,
    mut multipart: Multipart,
) -> Result<Json<ParsedSections>, AppError> {
    let upload = read_upload(&mut multipart, "resume").await?;
    let text = extract_text(upload.content_type.as_deref(), &upload.bytes).await?;
    Ok(Json(parse_resume_text(&text)))
}

async fn load_profile(state: &AppState, student_id: Uuid) -> Result<StudentProfile, AppError> {
    let row = latest_profile(&state.db, student_id).await?;
    let certificates = certificates_with_links(
        &state.db,
        &state.s3,
        &state.config.s3_bucket,
        student_id,
        state.config.certificate_link_ttl_secs,
    )
    .await?;
    Ok(assemble_profile(student_id, row, certificates))
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    session: StudentSession,
) -> Result<Json<StudentProfile>, AppError> {
    Ok(Json(load_profile(&state, session.student_id).await?))
}

/// GET /api/v1/profile/card
pub async fn handle_profile_card(
    State(state): State<AppState>,
    session: StudentSession,
) -> Result<impl IntoResponse, AppError> {
    let profile = load_profile(&state, session.student_id).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        render_profile_card(&profile),
    ))
}

/// POST /api/v1/profile/certificates
pub async fn handle_upload_certificate(
    State(state): State<AppState>,
    session: StudentSession,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Certificate>), AppError> {
    let upload = read_upload(&mut multipart, "certificate").await?;
    let row = store_certificate(
        &state.db,
        &state.s3,
        &state.config.s3_bucket,
        session.student_id,
        upload,
    )
    .await?;
    let certificate = preview_link(
        &state.s3,
        &state.config.s3_bucket,
        &row,
        state.config.certificate_link_ttl_secs,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(certificate)))
}
