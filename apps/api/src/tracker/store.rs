use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::placement::ApplicationRow;
use crate::tracker::models::{initial_stages, ApplicationView};

/// Opens an application at stage `Applied`. Runs inside the caller's
/// transaction so it commits together with whatever triggered it.
pub async fn insert_application(
    tx: &mut Transaction<'_, Postgres>,
    student_id: Uuid,
    drive_id: Option<Uuid>,
    company: &str,
    position: &str,
    applied_date: NaiveDate,
) -> Result<Uuid, AppError> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO applications (student_id, drive_id, company, position, applied_date, stages)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(student_id)
    .bind(drive_id)
    .bind(company)
    .bind(position)
    .bind(applied_date)
    .bind(Json(initial_stages(applied_date)))
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}

pub async fn list_applications(
    pool: &PgPool,
    student_id: Uuid,
) -> Result<Vec<ApplicationView>, AppError> {
    let rows = sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE student_id = $1 ORDER BY applied_date DESC, created_at DESC",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ApplicationView::from).collect())
}

pub async fn count_applications(pool: &PgPool, student_id: Uuid) -> Result<i64, AppError> {
    Ok(
        sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE student_id = $1")
            .bind(student_id)
            .fetch_one(pool)
            .await?,
    )
}
