use axum::{extract::State, Json};
use serde::Serialize;

use crate::auth::session::StudentSession;
use crate::errors::AppError;
use crate::notifications::store::count_pending;
use crate::profile::persist::latest_profile;
use crate::state::AppState;
use crate::tracker::store::count_applications;

pub const INCOMPLETE_PROFILE_MESSAGE: &str =
    "Your profile is not complete. Please upload your resume.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub email: String,
    pub profile_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_message: Option<&'static str>,
    pub pending_notifications: i64,
    pub applications: i64,
}

impl DashboardResponse {
    pub fn new(email: String, profile_complete: bool, pending: i64, applications: i64) -> Self {
        Self {
            email,
            profile_complete,
            profile_message: (!profile_complete).then_some(INCOMPLETE_PROFILE_MESSAGE),
            pending_notifications: pending,
            applications,
        }
    }
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    session: StudentSession,
) -> Result<Json<DashboardResponse>, AppError> {
    let profile = latest_profile(&state.db, session.student_id).await?;
    let pending = count_pending(&state.db, session.student_id).await?;
    let applications = count_applications(&state.db, session.student_id).await?;
    Ok(Json(DashboardResponse::new(
        session.email,
        profile.is_some(),
        pending,
        applications,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_profile_carries_message() {
        let v = serde_json::to_value(DashboardResponse::new("a@uni.edu".into(), false, 2, 0)).unwrap();
        assert_eq!(v["profileComplete"], false);
        assert_eq!(v["profileMessage"], INCOMPLETE_PROFILE_MESSAGE);
        assert_eq!(v["pendingNotifications"], 2);
    }

    #[test]
    fn test_complete_profile_omits_message() {
        let v = serde_json::to_value(DashboardResponse::new("a@uni.edu".into(), true, 0, 3)).unwrap();
        assert!(v.get("profileMessage").is_none());
        assert_eq!(v["applications"], 3);
    }
}
