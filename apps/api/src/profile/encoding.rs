//! File Encoder — turns an uploaded document into the base64 payload of its
//! data-URL encoding.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Serialize;
use thiserror::Error;

use crate::errors::AppError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Please upload a PDF or Image file.")]
    Unsupported(String),

    #[error("Uploaded file is empty")]
    Empty,

    #[error("Not a base64 data URL")]
    NotDataUrl,
}

impl From<EncodeError> for AppError {
    fn from(e: EncodeError) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Document types a resume or certificate may be uploaded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaType {
    Pdf,
    Jpeg,
    Png,
}

impl MediaType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        // Ignore parameters such as "; charset=binary"
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(MediaType::Pdf),
            "image/jpeg" | "image/jpg" => Some(MediaType::Jpeg),
            "image/png" => Some(MediaType::Png),
            _ => None,
        }
    }

    /// Detects the type from the file's magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"%PDF") {
            Some(MediaType::Pdf)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(MediaType::Jpeg)
        } else if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(MediaType::Png)
        } else {
            None
        }
    }

    /// Trusts a supported declared type; otherwise falls back to sniffing.
    pub fn resolve(declared: Option<&str>, bytes: &[u8]) -> Result<Self, EncodeError> {
        declared
            .and_then(MediaType::from_mime)
            .or_else(|| MediaType::sniff(bytes))
            .ok_or_else(|| EncodeError::Unsupported(declared.unwrap_or("unknown").to_string()))
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
        }
    }
}

/// A document ready to be sent inline to the extraction model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFile {
    pub media_type: MediaType,
    /// Base64 payload, data-URL prefix stripped.
    pub payload: String,
}

pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Returns the payload portion of a `data:<mime>;base64,<payload>` URL.
pub fn data_url_payload(data_url: &str) -> Result<&str, EncodeError> {
    let (header, payload) = data_url.split_once(',').ok_or(EncodeError::NotDataUrl)?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(EncodeError::NotDataUrl);
    }
    Ok(payload)
}

/// Encodes a file. The same bytes always yield the same payload.
pub fn encode_file(media_type: MediaType, bytes: &[u8]) -> Result<EncodedFile, EncodeError> {
    if bytes.is_empty() {
        return Err(EncodeError::Empty);
    }
    let data_url = to_data_url(media_type.as_mime(), bytes);
    let payload = data_url_payload(&data_url)?.to_string();
    Ok(EncodedFile {
        media_type,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDF_BYTES: &[u8] = b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n";

    #[test]
    fn test_encoding_is_deterministic() {
        let a = encode_file(MediaType::Pdf, PDF_BYTES).unwrap();
        let b = encode_file(MediaType::Pdf, PDF_BYTES).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_payload_has_no_data_url_prefix() {
        let encoded = encode_file(MediaType::Png, &[0x89, b'P', b'N', b'G', 1, 2, 3]).unwrap();
        assert!(!encoded.payload.starts_with("data:"));
        assert!(!encoded.payload.contains(','));
        let decoded = BASE64.decode(&encoded.payload).unwrap();
        assert_eq!(decoded, vec![0x89, b'P', b'N', b'G', 1, 2, 3]);
    }

    #[test]
    fn test_data_url_payload() {
        assert_eq!(data_url_payload("data:image/png;base64,QUJD").unwrap(), "QUJD");
        assert_eq!(
            data_url_payload("data:image/png,QUJD"),
            Err(EncodeError::NotDataUrl)
        );
        assert_eq!(data_url_payload("QUJD"), Err(EncodeError::NotDataUrl));
    }

    #[test]
    fn test_empty_file_rejected() {
        assert_eq!(encode_file(MediaType::Pdf, b""), Err(EncodeError::Empty));
    }

    #[test]
    fn test_resolve_prefers_declared_type() {
        assert_eq!(
            MediaType::resolve(Some("image/jpeg"), PDF_BYTES).unwrap(),
            MediaType::Jpeg
        );
    }

    #[test]
    fn test_resolve_sniffs_octet_stream() {
        assert_eq!(
            MediaType::resolve(Some("application/octet-stream"), PDF_BYTES).unwrap(),
            MediaType::Pdf
        );
        assert_eq!(
            MediaType::resolve(None, &[0xFF, 0xD8, 0xFF, 0xE0]).unwrap(),
            MediaType::Jpeg
        );
    }

    #[test]
    fn test_resolve_rejects_unknown() {
        let err = MediaType::resolve(Some("text/csv"), b"email,name").unwrap_err();
        assert_eq!(err.to_string(), "Please upload a PDF or Image file.");
    }

    #[test]
    fn test_from_mime_ignores_parameters() {
        assert_eq!(
            MediaType::from_mime("application/PDF; charset=binary"),
            Some(MediaType::Pdf)
        );
    }
}
