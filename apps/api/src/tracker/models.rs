//! Application stage timelines and the current-stage badge.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::placement::ApplicationRow;

/// A named step of the placement pipeline, plus `Rejected` as an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Applied,
    Shortlisted,
    Interviewed,
    Offered,
    Placed,
    Rejected,
}

/// The timeline every application starts with, in order.
pub const PIPELINE: [Stage; 5] = [
    Stage::Applied,
    Stage::Shortlisted,
    Stage::Interviewed,
    Stage::Offered,
    Stage::Placed,
];

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Applied => "Applied",
            Stage::Shortlisted => "Shortlisted",
            Stage::Interviewed => "Interviewed",
            Stage::Offered => "Offered",
            Stage::Placed => "Placed",
            Stage::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Completed,
    Current,
    Rejected,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageEntry {
    pub name: Stage,
    pub status: StageStatus,
    pub date: Option<NaiveDate>,
}

/// Fresh timeline: `Applied` is current, everything after it pending.
pub fn initial_stages(applied: NaiveDate) -> Vec<StageEntry> {
    PIPELINE
        .iter()
        .map(|&name| {
            if name == Stage::Applied {
                StageEntry {
                    name,
                    status: StageStatus::Current,
                    date: Some(applied),
                }
            } else {
                StageEntry {
                    name,
                    status: StageStatus::Pending,
                    date: None,
                }
            }
        })
        .collect()
}

/// Rejected anywhere wins; then the current stage; then the furthest
/// completed stage; an empty timeline counts as Applied.
pub fn current_stage(stages: &[StageEntry]) -> Stage {
    if stages.iter().any(|s| s.status == StageStatus::Rejected) {
        return Stage::Rejected;
    }
    if let Some(s) = stages.iter().rev().find(|s| s.status == StageStatus::Current) {
        return s.name;
    }
    stages
        .iter()
        .rev()
        .find(|s| s.status == StageStatus::Completed)
        .map(|s| s.name)
        .unwrap_or(Stage::Applied)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Outline,
    Secondary,
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub variant: BadgeVariant,
}

/// The badge label is always the stage name itself.
pub fn badge_for(stage: Stage) -> Badge {
    let variant = match stage {
        Stage::Applied => BadgeVariant::Outline,
        Stage::Shortlisted | Stage::Interviewed => BadgeVariant::Secondary,
        Stage::Offered | Stage::Placed => BadgeVariant::Default,
        Stage::Rejected => BadgeVariant::Destructive,
    };
    Badge {
        label: stage.as_str(),
        variant,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub applied_date: NaiveDate,
    pub current_stage: Stage,
    pub badge: Badge,
    pub stages: Vec<StageEntry>,
}

impl From<ApplicationRow> for ApplicationView {
    fn from(row: ApplicationRow) -> Self {
        let stages = row.stages.0;
        let current = current_stage(&stages);
        Self {
            id: row.id,
            company: row.company,
            position: row.position,
            applied_date: row.applied_date,
            current_stage: current,
            badge: badge_for(current),
            stages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;

    fn d(y: i32, m: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, day)
    }

    fn timeline(statuses: [(StageStatus, Option<NaiveDate>); 5]) -> Vec<StageEntry> {
        PIPELINE
            .iter()
            .zip(statuses)
            .map(|(&name, (status, date))| StageEntry { name, status, date })
            .collect()
    }

    fn application(company: &str, stages: Vec<StageEntry>) -> ApplicationRow {
        ApplicationRow {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            drive_id: None,
            company: company.to_string(),
            position: "Engineer".to_string(),
            applied_date: stages[0].date.unwrap(),
            stages: Json(stages),
            created_at: Utc::now(),
        }
    }

    use super::StageStatus::{Completed as C, Current as Cur, Pending as P, Rejected as R};

    fn sample_applications() -> Vec<ApplicationRow> {
        vec![
            application(
                "Global Tech Inc",
                timeline([
                    (C, d(2024, 1, 15)),
                    (C, d(2024, 1, 18)),
                    (Cur, d(2024, 1, 22)),
                    (P, None),
                    (P, None),
                ]),
            ),
            application(
                "InnovateLabs",
                timeline([
                    (C, d(2024, 1, 10)),
                    (C, d(2024, 1, 12)),
                    (C, d(2024, 1, 16)),
                    (Cur, d(2024, 1, 20)),
                    (P, None),
                ]),
            ),
            application(
                "DataFlow Inc",
                timeline([
                    (C, d(2024, 1, 8)),
                    (C, d(2024, 1, 10)),
                    (R, d(2024, 1, 14)),
                    (P, None),
                    (P, None),
                ]),
            ),
            application(
                "CloudSystems",
                timeline([(Cur, d(2024, 1, 20)), (P, None), (P, None), (P, None), (P, None)]),
            ),
        ]
    }

    #[test]
    fn test_badges_match_current_stage_literals() {
        let views: Vec<ApplicationView> = sample_applications()
            .into_iter()
            .map(ApplicationView::from)
            .collect();
        let labels: Vec<&str> = views.iter().map(|v| v.badge.label).collect();
        assert_eq!(labels, vec!["Interviewed", "Offered", "Rejected", "Applied"]);
        for v in &views {
            assert_eq!(v.badge.label, v.current_stage.as_str());
        }
        assert_eq!(views[2].badge.variant, BadgeVariant::Destructive);
        assert_eq!(views[3].badge.variant, BadgeVariant::Outline);
    }

    #[test]
    fn test_current_stage_serializes_as_literal() {
        let view = ApplicationView::from(sample_applications().remove(1));
        let v = serde_json::to_value(&view).unwrap();
        assert_eq!(v["currentStage"], "Offered");
        assert_eq!(v["badge"]["label"], "Offered");
        assert_eq!(v["stages"][3]["status"], "current");
        assert_eq!(v["stages"][4]["date"], serde_json::Value::Null);
    }

    #[test]
    fn test_initial_stages() {
        let stages = initial_stages(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());
        assert_eq!(stages.len(), 5);
        assert_eq!(stages[0].status, StageStatus::Current);
        assert!(stages[1..].iter().all(|s| s.status == StageStatus::Pending && s.date.is_none()));
        assert_eq!(current_stage(&stages), Stage::Applied);
    }

    #[test]
    fn test_all_completed_means_placed() {
        let stages = timeline([
            (C, d(2024, 1, 1)),
            (C, d(2024, 1, 2)),
            (C, d(2024, 1, 3)),
            (C, d(2024, 1, 4)),
            (C, d(2024, 1, 5)),
        ]);
        assert_eq!(current_stage(&stages), Stage::Placed);
        assert_eq!(current_stage(&[]), Stage::Applied);
    }
}
