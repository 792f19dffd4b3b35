use axum::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// One file pulled out of a multipart form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Reads the field named `field_name`, skipping any others.
pub async fn read_upload(multipart: &mut Multipart, field_name: &str) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?
    {
        if field.name() != Some(field_name) {
            continue;
        }
        let file_name = field.file_name().unwrap_or(field_name).to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        debug!(
            "Received upload '{file_name}' ({} bytes, {:?})",
            bytes.len(),
            content_type
        );
        return Ok(Upload {
            file_name,
            content_type,
            bytes,
        });
    }
    Err(AppError::Validation(format!("No '{field_name}' file provided")))
}
