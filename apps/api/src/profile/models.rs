use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicRecord {
    pub degree: String,
    pub institution: String,
    /// Free text such as "8.5/10". The model may answer a number or null.
    #[serde(default, deserialize_with = "de_cgpa")]
    pub cgpa: Option<String>,
    #[serde(default)]
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceRecord {
    pub role: String,
    pub company: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub title: String,
    /// Comma-separated technologies.
    #[serde(default)]
    pub tech: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// The structured object returned by one extraction.
/// Every list is present even when the resume has no such section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de_list")]
    pub academic_history: Vec<AcademicRecord>,
    #[serde(default, deserialize_with = "de_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "de_list")]
    pub experience: Vec<ExperienceRecord>,
    #[serde(default, deserialize_with = "de_list")]
    pub projects: Vec<ProjectRecord>,
    #[serde(default, deserialize_with = "de_list")]
    pub achievements: Vec<Achievement>,
}

impl ExtractedProfile {
    /// Trims the name and reduces skills to a set, keeping first-seen order.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        let mut seen = std::collections::HashSet::new();
        self.skills = self
            .skills
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
            .collect();
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: Uuid,
    pub name: String,
    pub upload_date: NaiveDate,
    /// Short-lived preview link.
    pub reference: String,
}

/// Profile as shown to the student: latest extraction plus certificates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub student_id: Uuid,
    pub complete: bool,
    pub name: String,
    pub academic_history: Vec<AcademicRecord>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceRecord>,
    pub projects: Vec<ProjectRecord>,
    pub achievements: Vec<Achievement>,
    pub certificates: Vec<Certificate>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StudentProfile {
    /// An empty profile: what a student sees before their first extraction.
    pub fn empty(student_id: Uuid) -> Self {
        Self {
            student_id,
            complete: false,
            name: String::new(),
            academic_history: vec![],
            skills: vec![],
            experience: vec![],
            projects: vec![],
            achievements: vec![],
            certificates: vec![],
            updated_at: None,
        }
    }
}

/// An explicit `null` list reads as empty.
fn de_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn de_cgpa<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cgpa_accepts_string_number_and_null() {
        let records: Vec<AcademicRecord> = serde_json::from_value(json!([
            {"degree": "B.Tech", "institution": "A", "cgpa": "8.5/10", "year": "2024"},
            {"degree": "M.Tech", "institution": "B", "cgpa": 9.1, "year": "2026"},
            {"degree": "B.S. in CS", "institution": "C", "cgpa": null, "year": "2022"},
            {"degree": "Diploma", "institution": "D"}
        ]))
        .unwrap();
        assert_eq!(records[0].cgpa.as_deref(), Some("8.5/10"));
        assert_eq!(records[1].cgpa.as_deref(), Some("9.1"));
        assert_eq!(records[2].cgpa, None);
        assert_eq!(records[3].cgpa, None);
        assert_eq!(records[3].year, "");
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let p: ExtractedProfile = serde_json::from_value(json!({"name": "Jane Doe"})).unwrap();
        assert!(p.academic_history.is_empty());
        assert!(p.projects.is_empty());
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["achievements"], json!([]));
        assert_eq!(v["academicHistory"], json!([]));
    }

    #[test]
    fn test_null_lists_read_as_empty() {
        let p: ExtractedProfile = serde_json::from_value(json!({
            "name": "Asha Rao",
            "academicHistory": null,
            "skills": ["Python"],
            "experience": null,
            "projects": null,
            "achievements": null
        }))
        .unwrap();
        assert_eq!(p.skills, vec!["Python"]);
        assert!(p.academic_history.is_empty());
        assert!(p.experience.is_empty());
        assert!(p.projects.is_empty());
        assert!(p.achievements.is_empty());
    }

    #[test]
    fn test_normalized_dedups_skills_case_insensitively() {
        let p = ExtractedProfile {
            name: "  Jane Doe ".into(),
            academic_history: vec![],
            skills: vec!["React".into(), "react".into(), " ".into(), "Rust".into()],
            experience: vec![],
            projects: vec![],
            achievements: vec![],
        }
        .normalized();
        assert_eq!(p.name, "Jane Doe");
        assert_eq!(p.skills, vec!["React", "Rust"]);
    }
}
