use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::student::DirectoryEntryRow;

/// Escapes LIKE wildcards so the query is matched as a plain substring.
pub fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Students whose name, email or branch contains `query`, case-insensitive.
/// Skills come from each student's newest profile row.
pub async fn search_students(
    pool: &PgPool,
    query: &str,
) -> Result<Vec<DirectoryEntryRow>, AppError> {
    let rows = sqlx::query_as::<_, DirectoryEntryRow>(
        r#"
        SELECT s.id, s.email, s.name, s.branch, s.placement_status,
               COALESCE(p.skills, ARRAY[]::TEXT[]) AS skills,
               (p.id IS NOT NULL) AS has_profile
        FROM student_login s
        LEFT JOIN LATERAL (
            SELECT id, skills FROM student_profiles
            WHERE student_id = s.id
            ORDER BY created_at DESC
            LIMIT 1
        ) p ON TRUE
        WHERE s.name ILIKE $1 OR s.email ILIKE $1 OR s.branch ILIKE $1
        ORDER BY s.name NULLS LAST, s.email
        "#,
    )
    .bind(like_pattern(query))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_matches_everything() {
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("   "), "%%");
    }

    #[test]
    fn test_wildcards_escaped() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_plain_query_wrapped() {
        assert_eq!(like_pattern(" Computer "), "%Computer%");
    }
}
