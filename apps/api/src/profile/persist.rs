//! Profile Persister — one insert per successful extraction.

use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::student::StudentProfileRow;
use crate::profile::models::{Certificate, ExtractedProfile, StudentProfile};

/// Inserts the extracted profile as the student's newest row.
/// No idempotency key: a retried submission adds another row.
pub async fn insert_profile(
    pool: &PgPool,
    student_id: Uuid,
    profile: &ExtractedProfile,
) -> Result<Uuid, AppError> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO student_profiles
            (student_id, name, academics, skills, experience, projects, achievements)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(student_id)
    .bind(&profile.name)
    .bind(Json(&profile.academic_history))
    .bind(&profile.skills)
    .bind(Json(&profile.experience))
    .bind(Json(&profile.projects))
    .bind(Json(&profile.achievements))
    .fetch_one(pool)
    .await
    .map_err(AppError::ProfileNotSaved)?;

    info!("Stored profile {id} for student {student_id}");
    Ok(id)
}

/// The student's most recent profile row, if any.
pub async fn latest_profile(
    pool: &PgPool,
    student_id: Uuid,
) -> Result<Option<StudentProfileRow>, AppError> {
    Ok(sqlx::query_as::<_, StudentProfileRow>(
        r#"
        SELECT * FROM student_profiles
        WHERE student_id = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(student_id)
    .fetch_optional(pool)
    .await?)
}

/// Combines the latest extraction (if any) with the student's certificates.
pub fn assemble_profile(
    student_id: Uuid,
    row: Option<StudentProfileRow>,
    certificates: Vec<Certificate>,
) -> StudentProfile {
    let mut profile = match row {
        Some(row) => StudentProfile {
            student_id,
            complete: true,
            name: row.name,
            academic_history: row.academics.0,
            skills: row.skills,
            experience: row.experience.0,
            projects: row.projects.0,
            achievements: row.achievements.0,
            certificates: vec![],
            updated_at: Some(row.created_at),
        },
        None => StudentProfile::empty(student_id),
    };
    profile.certificates = certificates;
    profile
}
