use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::profile::models::{AcademicRecord, Achievement, ExperienceRecord, ProjectRecord};

#[derive(Debug, Clone, FromRow)]
pub struct AdminLoginRow {
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct StudentLoginRow {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub branch: Option<String>,
    pub placement_status: String,
    pub created_at: DateTime<Utc>,
}

/// One extraction result. Rows are append-only; the newest per student wins.
#[derive(Debug, Clone, FromRow)]
pub struct StudentProfileRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub name: String,
    pub academics: Json<Vec<AcademicRecord>>,
    pub skills: Vec<String>,
    pub experience: Json<Vec<ExperienceRecord>>,
    pub projects: Json<Vec<ProjectRecord>>,
    pub achievements: Json<Vec<Achievement>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CertificateRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub name: String,
    pub content_type: String,
    pub s3_key: String,
    pub upload_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A student as listed in the admin directory.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DirectoryEntryRow {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub branch: Option<String>,
    pub placement_status: String,
    pub skills: Vec<String>,
    pub has_profile: bool,
}
