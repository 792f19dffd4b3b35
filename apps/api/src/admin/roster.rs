//! CSV roster import: `email,name` per line, name optional.

use std::collections::HashSet;

use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::login::normalize_email;
use crate::auth::password::{generate_one_time_password, hash_password_blocking};
use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterLineError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ParsedRoster {
    pub entries: Vec<RosterEntry>,
    pub errors: Vec<RosterLineError>,
}

/// A student created by the import, with the password they sign in with first.
#[derive(Debug, Serialize)]
pub struct ImportedStudent {
    pub email: String,
    pub name: Option<String>,
    pub one_time_password: String,
}

#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub imported: Vec<ImportedStudent>,
    pub skipped: Vec<String>,
    pub errors: Vec<RosterLineError>,
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
        && !domain.contains('@')
}

pub fn parse_roster_csv(body: &str) -> ParsedRoster {
    let mut parsed = ParsedRoster::default();
    let mut seen = HashSet::new();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    for (idx, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                parsed.errors.push(RosterLineError {
                    line: e.position().map_or(idx + 1, |p| p.line() as usize),
                    message: format!("unreadable line: {e}"),
                });
                continue;
            }
        };
        let line_no = record.position().map_or(idx + 1, |p| p.line() as usize);

        if record.iter().all(str::is_empty) {
            continue;
        }
        let email_field = record.get(0).unwrap_or_default();
        let name_field = record.get(1).unwrap_or_default();

        if parsed.entries.is_empty()
            && parsed.errors.is_empty()
            && email_field.eq_ignore_ascii_case("email")
        {
            continue;
        }

        let email = normalize_email(email_field);
        if !is_plausible_email(&email) {
            parsed.errors.push(RosterLineError {
                line: line_no,
                message: format!("invalid email '{email_field}'"),
            });
            continue;
        }
        if !seen.insert(email.clone()) {
            parsed.errors.push(RosterLineError {
                line: line_no,
                message: format!("duplicate email '{email}'"),
            });
            continue;
        }

        parsed.entries.push(RosterEntry {
            email,
            name: (!name_field.is_empty()).then(|| name_field.to_string()),
        });
    }

    parsed
}

/// Inserts every new roster entry with a hashed one-time password.
/// Emails already on the roster, in any letter case, are left untouched and
/// reported as skipped. Hashing runs on the blocking pool.
pub async fn import_roster(pool: &PgPool, parsed: ParsedRoster) -> Result<ImportReport, AppError> {
    let mut imported = Vec::new();
    let mut skipped = Vec::new();

    for entry in parsed.entries {
        let password = generate_one_time_password();
        let hash = hash_password_blocking(password.clone()).await?;

        let inserted: Option<uuid::Uuid> = sqlx::query_scalar(
            r#"
            INSERT INTO student_login (email, name, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&entry.email)
        .bind(&entry.name)
        .bind(&hash)
        .fetch_optional(pool)
        .await?;

        match inserted {
            Some(_) => imported.push(ImportedStudent {
                email: entry.email,
                name: entry.name,
                one_time_password: password,
            }),
            None => skipped.push(entry.email),
        }
    }

    if !parsed.errors.is_empty() {
        warn!("Roster import rejected {} line(s)", parsed.errors.len());
    }
    info!(
        "Roster import: {} added, {} already present",
        imported.len(),
        skipped.len()
    );

    Ok(ImportReport {
        imported,
        skipped,
        errors: parsed.errors,
    })
}
