//! Inline file payload used when a document cannot be stored.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct FileMetadata {
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: usize,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

impl FileMetadata {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, size_bytes: usize) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            size_bytes,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// File bytes carried base64-encoded in a JSON body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct FileContent {
    pub metadata: FileMetadata,
    pub data: String,
}

impl FileContent {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, data: &[u8]) -> Self {
        Self {
            metadata: FileMetadata::new(filename, mime_type, data.len()),
            data: BASE64.encode(data),
        }
    }

    pub fn pdf(filename: impl Into<String>, data: &[u8]) -> Self {
        Self::new(filename, PDF_MIME, data)
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.data)
    }

    /// `data:` URI for clients that open the file directly.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.metadata.mime_type, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_content() {
        let content = FileContent::pdf("Planner.pdf", b"%PDF-1.5 test");
        assert_eq!(content.metadata.mime_type, PDF_MIME);
        assert_eq!(content.metadata.size_bytes, 13);
        assert_eq!(content.decode().unwrap(), b"%PDF-1.5 test");
        assert!(content.to_data_uri().starts_with("data:application/pdf;base64,"));
    }

    #[test]
    fn test_serializes_snake_case() {
        let json = serde_json::to_value(FileContent::pdf("a.pdf", b"x")).unwrap();
        assert_eq!(json["metadata"]["mime_type"], "application/pdf");
        assert_eq!(json["metadata"]["size_bytes"], 1);
        assert!(json["metadata"].get("mimeType").is_none());
    }
}
