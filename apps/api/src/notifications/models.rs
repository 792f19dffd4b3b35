//! Notification status transitions and the pending/processed board.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::placement::NotificationRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Accepted => "accepted",
            NotificationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(NotificationStatus::Pending),
            "accepted" => Some(NotificationStatus::Accepted),
            "rejected" => Some(NotificationStatus::Rejected),
            _ => None,
        }
    }

    /// Accepted and rejected are terminal; only a pending notification moves.
    pub fn apply(self, action: NotificationAction) -> Result<Self, TransitionError> {
        match self {
            NotificationStatus::Pending => Ok(action.target()),
            _ => Err(TransitionError::AlreadyProcessed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    Accept,
    Reject,
}

impl NotificationAction {
    fn target(self) -> NotificationStatus {
        match self {
            NotificationAction::Accept => NotificationStatus::Accepted,
            NotificationAction::Reject => NotificationStatus::Rejected,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Notification not found")]
    NotFound,

    #[error("Notification already processed")]
    AlreadyProcessed,
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::NotFound => AppError::NotFound(e.to_string()),
            TransitionError::AlreadyProcessed => AppError::Conflict(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub drive_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub status: NotificationStatus,
    pub company_name: String,
    pub position: String,
    pub deadline: Option<NaiveDate>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = AppError;

    fn try_from(row: NotificationRow) -> Result<Self, AppError> {
        let status = NotificationStatus::parse(&row.status).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "Notification {} has unknown status '{}'",
                row.id,
                row.status
            ))
        })?;
        Ok(Notification {
            id: row.id,
            drive_id: row.drive_id,
            message: row.message,
            created_at: row.created_at,
            status,
            company_name: row.company_name,
            position: row.position,
            deadline: row.deadline,
            processed_at: row.processed_at,
        })
    }
}

/// A student's notifications split the way the inbox shows them.
#[derive(Debug, Clone, Default)]
pub struct NotificationBoard {
    pub pending: Vec<Notification>,
    pub processed: Vec<Notification>,
}

impl NotificationBoard {
    /// Pending keeps the given order; processed is most recently answered first.
    pub fn from_notifications(notifications: Vec<Notification>) -> Self {
        let (pending, mut processed): (Vec<_>, Vec<_>) = notifications
            .into_iter()
            .partition(|n| n.status == NotificationStatus::Pending);
        processed.sort_by(|a, b| b.processed_at.cmp(&a.processed_at));
        Self { pending, processed }
    }

    /// Moves a pending notification to `processed` with its new status.
    /// Returns the updated notification.
    pub fn respond(
        &mut self,
        id: Uuid,
        action: NotificationAction,
    ) -> Result<&Notification, TransitionError> {
        let Some(idx) = self.pending.iter().position(|n| n.id == id) else {
            return Err(if self.processed.iter().any(|n| n.id == id) {
                TransitionError::AlreadyProcessed
            } else {
                TransitionError::NotFound
            });
        };
        let mut notification = self.pending.remove(idx);
        notification.status = notification.status.apply(action)?;
        notification.processed_at = Some(Utc::now());
        self.processed.insert(0, notification);
        Ok(&self.processed[0])
    }

    pub fn view(&self, now: DateTime<Utc>) -> NotificationsResponse {
        NotificationsResponse {
            pending: self.pending.iter().map(|n| NotificationView::new(n, now)).collect(),
            processed: self
                .processed
                .iter()
                .map(|n| NotificationView::new(n, now))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationView {
    pub id: Uuid,
    pub drive_id: Uuid,
    pub message: String,
    /// Relative age, e.g. "2 hours ago".
    pub timestamp: String,
    pub created_at: DateTime<Utc>,
    pub status: NotificationStatus,
    pub company_name: String,
    pub position: String,
    pub deadline: Option<NaiveDate>,
}

impl NotificationView {
    fn new(n: &Notification, now: DateTime<Utc>) -> Self {
        Self {
            id: n.id,
            drive_id: n.drive_id,
            message: n.message.clone(),
            timestamp: humanize_age(n.created_at, now),
            created_at: n.created_at,
            status: n.status,
            company_name: n.company_name.clone(),
            position: n.position.clone(),
            deadline: n.deadline,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationsResponse {
    pub pending: Vec<NotificationView>,
    pub processed: Vec<NotificationView>,
}

pub fn humanize_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(then);
    let (n, unit) = if age.num_days() >= 1 {
        (age.num_days(), "day")
    } else if age.num_hours() >= 1 {
        (age.num_hours(), "hour")
    } else if age.num_minutes() >= 1 {
        (age.num_minutes(), "minute")
    } else {
        return "just now".to_string();
    };
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}
