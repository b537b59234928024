//! Getting a generated document to the user: stored with a signed URL, or
//! inline when storage is unavailable.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::content::FileContent;
use super::generators::GeneratedDocument;
use crate::storage::ObjectStorage;

/// Lifetime of signed download links.
pub const SIGNED_URL_TTL_SECS: u64 = 60 * 60;

/// `<user_id>/<timestamp_millis>-<filename>`
pub fn storage_path(user_id: &str, filename: &str, now: DateTime<Utc>) -> String {
    let owner = sanitize_filename::sanitize(user_id);
    let owner = if owner.is_empty() { "anonymous".to_string() } else { owner };
    format!("{}/{}-{}", owner, now.timestamp_millis(), filename)
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "delivery", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Stored {
        filename: String,
        path: String,
        url: String,
        expires_in: u64,
        page_count: usize,
    },
    Inline {
        filename: String,
        page_count: usize,
        file: FileContent,
    },
}

impl DeliveryOutcome {
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }

    fn inline(doc: &GeneratedDocument) -> Self {
        Self::Inline {
            filename: doc.filename.clone(),
            page_count: doc.page_count,
            file: FileContent::pdf(&doc.filename, &doc.pdf),
        }
    }
}

/// Upload and sign; any storage failure degrades to an inline payload.
pub async fn deliver(
    storage: &(dyn ObjectStorage + Send + Sync),
    user_id: &str,
    doc: &GeneratedDocument,
    now: DateTime<Utc>,
) -> DeliveryOutcome {
    let path = storage_path(user_id, &doc.filename, now);

    if let Err(e) = storage.upload_file(&path, &doc.pdf).await {
        log::warn!("Storing {} failed, returning inline payload: {}", path, e);
        return DeliveryOutcome::inline(doc);
    }

    match storage.create_signed_url(&path, SIGNED_URL_TTL_SECS).await {
        Ok(url) => DeliveryOutcome::Stored {
            filename: doc.filename.clone(),
            path,
            url,
            expires_in: SIGNED_URL_TTL_SECS,
            page_count: doc.page_count,
        },
        Err(e) => {
            log::warn!("Signing {} failed, returning inline payload: {}", path, e);
            // Nobody can reach the object without a link.
            if let Err(e) = storage.delete_file(&path).await {
                log::warn!("Removing unreachable {} failed: {}", path, e);
            }
            DeliveryOutcome::inline(doc)
        }
    }
}
