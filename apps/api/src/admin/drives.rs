use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::placement::DriveRow;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveRequest {
    pub company_name: String,
    pub position: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct DrivePosted {
    pub drive: DriveRow,
    pub notified: u64,
}

impl DriveRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.company_name.trim().is_empty() {
            return Err(AppError::Validation("companyName cannot be empty".to_string()));
        }
        if self.position.trim().is_empty() {
            return Err(AppError::Validation("position cannot be empty".to_string()));
        }
        Ok(())
    }

    /// The text shown on the notification card.
    pub fn notification_message(&self) -> String {
        match self.message.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => format!(
                "{} is hiring for {}. Accept to apply.",
                self.company_name.trim(),
                self.position.trim()
            ),
        }
    }
}

/// Stores the drive and gives every student on the roster a pending
/// notification for it, all in one transaction.
pub async fn post_drive(
    pool: &PgPool,
    admin_email: &str,
    req: &DriveRequest,
) -> Result<DrivePosted, AppError> {
    req.validate()?;
    let message = req.notification_message();
    let mut tx = pool.begin().await?;

    let drive = sqlx::query_as::<_, DriveRow>(
        r#"
        INSERT INTO drives (company_name, position, message, deadline, created_by)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(req.company_name.trim())
    .bind(req.position.trim())
    .bind(&message)
    .bind(req.deadline)
    .bind(admin_email)
    .fetch_one(&mut *tx)
    .await?;

    let notified = sqlx::query(
        r#"
        INSERT INTO notifications (student_id, drive_id, message, company_name, position, deadline)
        SELECT id, $1, $2, $3, $4, $5 FROM student_login
        "#,
    )
    .bind(drive.id)
    .bind(&drive.message)
    .bind(&drive.company_name)
    .bind(&drive.position)
    .bind(drive.deadline)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;
    info!(
        "Drive {} ({} / {}) posted by {admin_email}, {notified} students notified",
        drive.id, drive.company_name, drive.position
    );

    Ok(DrivePosted { drive, notified })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(message: Option<&str>) -> DriveRequest {
        DriveRequest {
            company_name: " Tech Corp ".into(),
            position: "Software Engineer".into(),
            message: message.map(str::to_string),
            deadline: None,
        }
    }

    #[test]
    fn test_default_message() {
        assert_eq!(
            request(None).notification_message(),
            "Tech Corp is hiring for Software Engineer. Accept to apply."
        );
        assert_eq!(
            request(Some("  ")).notification_message(),
            "Tech Corp is hiring for Software Engineer. Accept to apply."
        );
        assert_eq!(request(Some("Apply by Friday")).notification_message(), "Apply by Friday");
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let mut req = request(None);
        assert!(req.validate().is_ok());
        req.position = " ".into();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_request_is_camel_case() {
        let req: DriveRequest = serde_json::from_str(
            r#"{"companyName":"Tech Corp","position":"SDE","deadline":"2024-02-01"}"#,
        )
        .unwrap();
        assert_eq!(req.deadline, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert!(req.message.is_none());
    }
}
