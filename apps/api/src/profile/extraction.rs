//! Extraction Client — one round trip to the generative model per resume.
//!
//! `AppState` holds an `Arc<dyn ProfileExtractor>`; production uses
//! `GeminiExtractor`, tests substitute a canned backend.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{Content, GenerateContentRequest, GenerationConfig, LlmClient, Part};
use crate::profile::encoding::{encode_file, EncodedFile, MediaType};
use crate::profile::models::ExtractedProfile;
use crate::profile::prompts::{few_shot_output, EXTRACTION_INSTRUCTION, FEW_SHOT_INPUT};
use crate::profile::schema::{missing_fields, profile_schema};
use crate::profile::upload::Upload;

#[async_trait]
pub trait ProfileExtractor: Send + Sync {
    /// Returns the model's raw JSON object for the encoded document.
    async fn extract(&self, file: &EncodedFile) -> Result<Value, AppError>;
}

pub struct GeminiExtractor {
    llm: LlmClient,
}

impl GeminiExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ProfileExtractor for GeminiExtractor {
    async fn extract(&self, file: &EncodedFile) -> Result<Value, AppError> {
        let request = build_extraction_request(file);
        self.llm
            .generate_json::<Value>(&request)
            .await
            .map_err(|e| AppError::Llm(format!("Resume extraction failed: {e}")))
    }
}

/// Instruction + few-shot pair + the document, constrained by the profile schema.
pub fn build_extraction_request(file: &EncodedFile) -> GenerateContentRequest {
    let example = serde_json::to_string_pretty(&few_shot_output()).unwrap_or_default();
    GenerateContentRequest {
        contents: vec![
            Content::user(vec![
                Part::text(EXTRACTION_INSTRUCTION),
                Part::text(FEW_SHOT_INPUT),
            ]),
            Content::model(vec![Part::text(example)]),
            Content::user(vec![Part::inline(
                file.media_type.as_mime(),
                file.payload.clone(),
            )]),
        ],
        generation_config: GenerationConfig::json_with_schema(profile_schema()),
    }
}

/// Turns the model's object into a profile. Omitted lists become empty lists;
/// a missing name means the extraction failed.
pub fn interpret_extraction(raw: Value) -> Result<ExtractedProfile, AppError> {
    if !raw.is_object() {
        return Err(AppError::UnprocessableEntity(
            "Could not parse the extracted data from the API response.".to_string(),
        ));
    }
    let missing = missing_fields(&raw);
    if !missing.is_empty() {
        warn!("Extraction omitted fields {missing:?}; filling with empty values");
    }

    let profile: ExtractedProfile = serde_json::from_value(raw).map_err(|e| {
        AppError::UnprocessableEntity(format!("Extracted data does not match the profile shape: {e}"))
    })?;
    let profile = profile.normalized();

    if profile.name.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Could not find a name in the resume.".to_string(),
        ));
    }
    Ok(profile)
}

/// Validates and encodes the upload, then runs one extraction.
pub async fn extract_profile(
    extractor: &dyn ProfileExtractor,
    upload: &Upload,
) -> Result<ExtractedProfile, AppError> {
    let media_type = MediaType::resolve(upload.content_type.as_deref(), &upload.bytes)?;
    let encoded = encode_file(media_type, &upload.bytes)?;
    info!(
        "Extracting profile from '{}' ({})",
        upload.file_name,
        media_type.as_mime()
    );
    let raw = extractor.extract(&encoded).await?;
    interpret_extraction(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::schema::REQUIRED_FIELDS;
    use bytes::Bytes;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedExtractor {
        response: Value,
        calls: AtomicUsize,
    }

    impl CannedExtractor {
        fn new(response: Value) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ProfileExtractor for CannedExtractor {
        async fn extract(&self, file: &EncodedFile) -> Result<Value, AppError> {
            assert!(!file.payload.is_empty());
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    fn pdf_upload() -> Upload {
        Upload {
            file_name: "resume.pdf".into(),
            content_type: Some("application/pdf".into()),
            bytes: Bytes::from_static(b"%PDF-1.4 resume"),
        }
    }

    #[test]
    fn test_request_carries_few_shot_pair_and_document() {
        let file = encode_file(MediaType::Pdf, b"%PDF-1.4 resume").unwrap();
        let request = build_extraction_request(&file);
        let v = serde_json::to_value(&request).unwrap();

        let roles: Vec<&str> = v["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, vec!["user", "model", "user"]);

        let example: Value =
            serde_json::from_str(v["contents"][1]["parts"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(example, few_shot_output());

        let inline = &v["contents"][2]["parts"][0]["inlineData"];
        assert_eq!(inline["mimeType"], "application/pdf");
        assert_eq!(inline["data"], file.payload.as_str());
        assert_eq!(v["generationConfig"]["responseSchema"], profile_schema());
    }

    #[test]
    fn test_few_shot_contract_has_every_required_field() {
        let profile = interpret_extraction(few_shot_output()).unwrap();
        let v = serde_json::to_value(&profile).unwrap();
        for field in REQUIRED_FIELDS {
            assert!(v.get(field).is_some(), "{field} missing");
        }
        assert_eq!(v["experience"], json!([]));
        assert_eq!(v["projects"], json!([]));
        assert_eq!(v["achievements"], json!([]));
    }

    #[test]
    fn test_omitted_sections_become_empty_lists() {
        let profile = interpret_extraction(json!({
            "name": "Asha Rao",
            "skills": ["Python"]
        }))
        .unwrap();
        assert!(profile.academic_history.is_empty());
        assert!(profile.experience.is_empty());
        assert!(profile.achievements.is_empty());
    }

    #[test]
    fn test_null_sections_become_empty_lists() {
        let profile = interpret_extraction(json!({
            "name": "Asha Rao",
            "academicHistory": [{"degree": "B.Tech", "institution": "NIT", "cgpa": null, "year": "2024"}],
            "skills": ["Python"],
            "experience": null,
            "projects": null,
            "achievements": null
        }))
        .unwrap();
        assert_eq!(profile.academic_history.len(), 1);
        assert!(profile.experience.is_empty());
        assert!(profile.projects.is_empty());
        assert!(profile.achievements.is_empty());
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let err = interpret_extraction(json!({"skills": ["Go"]})).unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(interpret_extraction(json!(["not", "an", "object"])).is_err());
    }

    #[tokio::test]
    async fn test_extract_profile_calls_backend_once() {
        let extractor = CannedExtractor::new(few_shot_output());
        let profile = extract_profile(&extractor, &pdf_upload()).await.unwrap();
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.skills, vec!["JavaScript", "React"]);
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unsupported_upload_never_reaches_backend() {
        let extractor = CannedExtractor::new(few_shot_output());
        let upload = Upload {
            file_name: "resume.docx".into(),
            content_type: Some(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document".into(),
            ),
            bytes: Bytes::from_static(b"PK\x03\x04"),
        };
        let err = extract_profile(&extractor, &upload).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    }
}
