use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::placement::NotificationRow;
use crate::notifications::models::{Notification, NotificationStatus, TransitionError};
use crate::tracker::store::insert_application;

/// A student's notifications: most recently answered first, then pending
/// ones newest first.
pub async fn list_notifications(
    pool: &PgPool,
    student_id: Uuid,
) -> Result<Vec<Notification>, AppError> {
    let rows = sqlx::query_as::<_, NotificationRow>(
        r#"
        SELECT * FROM notifications
        WHERE student_id = $1
        ORDER BY processed_at DESC NULLS LAST, created_at DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Notification::try_from).collect()
}

pub async fn count_pending(pool: &PgPool, student_id: Uuid) -> Result<i64, AppError> {
    Ok(sqlx::query_scalar(
        "SELECT COUNT(*) FROM notifications WHERE student_id = $1 AND status = 'pending'",
    )
    .bind(student_id)
    .fetch_one(pool)
    .await?)
}

/// Writes a processed notification. The update only matches while the row is
/// still pending, so a concurrent second response is refused. Accepting also
/// opens an application for the drive in the same transaction.
pub async fn record_response(
    pool: &PgPool,
    student_id: Uuid,
    notification: &Notification,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE notifications
        SET status = $1, processed_at = now()
        WHERE id = $2 AND student_id = $3 AND status = 'pending'
        "#,
    )
    .bind(notification.status.as_str())
    .bind(notification.id)
    .bind(student_id)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(TransitionError::AlreadyProcessed.into());
    }

    if notification.status == NotificationStatus::Accepted {
        let application_id = insert_application(
            &mut tx,
            student_id,
            Some(notification.drive_id),
            &notification.company_name,
            &notification.position,
            Utc::now().date_naive(),
        )
        .await?;
        info!(
            "Student {student_id} applied to {} via notification {} (application {application_id})",
            notification.company_name, notification.id
        );
    }

    tx.commit().await?;
    Ok(())
}
