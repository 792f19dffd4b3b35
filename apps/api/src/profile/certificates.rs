//! Certificate uploads: object storage plus short-lived preview links.

use std::time::Duration;

use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::student::CertificateRow;
use crate::profile::encoding::MediaType;
use crate::profile::models::Certificate;
use crate::profile::upload::Upload;

/// Replaces anything outside `[A-Za-z0-9._-]` so the name is safe in a key.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "certificate".to_string()
    } else {
        cleaned
    }
}

pub fn certificate_key(student_id: Uuid, certificate_id: Uuid, file_name: &str) -> String {
    format!(
        "certificates/{student_id}/{certificate_id}/{}",
        sanitize_file_name(file_name)
    )
}

/// Uploads the file to S3 and records it for the student.
pub async fn store_certificate(
    pool: &PgPool,
    s3: &aws_sdk_s3::Client,
    s3_bucket: &str,
    student_id: Uuid,
    upload: Upload,
) -> Result<CertificateRow, AppError> {
    let media_type = MediaType::resolve(upload.content_type.as_deref(), &upload.bytes)?;
    if upload.bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let id = Uuid::new_v4();
    let s3_key = certificate_key(student_id, id, &upload.file_name);

    s3.put_object()
        .bucket(s3_bucket)
        .key(&s3_key)
        .body(ByteStream::from(upload.bytes))
        .content_type(media_type.as_mime())
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Certificate upload failed: {e}")))?;

    info!("Uploaded certificate to s3://{}/{}", s3_bucket, s3_key);

    let row: CertificateRow = sqlx::query_as(
        r#"
        INSERT INTO certificates (id, student_id, name, content_type, s3_key)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(student_id)
    .bind(&upload.file_name)
    .bind(media_type.as_mime())
    .bind(&s3_key)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn list_certificates(
    pool: &PgPool,
    student_id: Uuid,
) -> Result<Vec<CertificateRow>, AppError> {
    Ok(sqlx::query_as::<_, CertificateRow>(
        "SELECT * FROM certificates WHERE student_id = $1 ORDER BY created_at ASC",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?)
}

/// Presigns a GET for the stored object. No network call is made.
pub async fn preview_link(
    s3: &aws_sdk_s3::Client,
    s3_bucket: &str,
    row: &CertificateRow,
    ttl_secs: u64,
) -> Result<Certificate, AppError> {
    let presigning = PresigningConfig::expires_in(Duration::from_secs(ttl_secs))
        .map_err(|e| AppError::S3(format!("Invalid preview link lifetime: {e}")))?;
    let request = s3
        .get_object()
        .bucket(s3_bucket)
        .key(&row.s3_key)
        .presigned(presigning)
        .await
        .map_err(|e| AppError::S3(format!("Failed to presign certificate link: {e}")))?;

    Ok(Certificate {
        id: row.id,
        name: row.name.clone(),
        upload_date: row.upload_date,
        reference: request.uri().to_string(),
    })
}

/// Preview links for every certificate, in upload order.
pub async fn certificates_with_links(
    pool: &PgPool,
    s3: &aws_sdk_s3::Client,
    s3_bucket: &str,
    student_id: Uuid,
    ttl_secs: u64,
) -> Result<Vec<Certificate>, AppError> {
    let rows = list_certificates(pool, student_id).await?;
    let mut certificates = Vec::with_capacity(rows.len());
    for row in &rows {
        certificates.push(preview_link(s3, s3_bucket, row, ttl_secs).await?);
    }
    Ok(certificates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_safe_names() {
        assert_eq!(sanitize_file_name("aws-cloud_practitioner.pdf"), "aws-cloud_practitioner.pdf");
    }

    #[test]
    fn test_sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\My Cert (1).png"), "My_Cert__1_.png");
        assert_eq!(sanitize_file_name(".."), "certificate");
    }

    #[test]
    fn test_certificate_key_layout() {
        let student = Uuid::nil();
        let cert = Uuid::nil();
        assert_eq!(
            certificate_key(student, cert, "hackathon.jpg"),
            format!("certificates/{student}/{cert}/hackathon.jpg")
        );
    }
}
