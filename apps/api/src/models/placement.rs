use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::tracker::models::StageEntry;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DriveRow {
    pub id: Uuid,
    pub company_name: String,
    pub position: String,
    pub message: String,
    pub deadline: Option<NaiveDate>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub drive_id: Uuid,
    pub message: String,
    pub status: String,
    pub company_name: String,
    pub position: String,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub drive_id: Option<Uuid>,
    pub company: String,
    pub position: String,
    pub applied_date: NaiveDate,
    pub stages: Json<Vec<StageEntry>>,
    pub created_at: DateTime<Utc>,
}
