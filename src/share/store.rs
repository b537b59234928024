use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::{AccessLogEntry, DeviceType, ShareLink, UpdateShareLinkRequest};

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share link not found")]
    NotFound,
    #[error("no shareable sections selected")]
    NoSections,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence of share links and their access log.
#[async_trait]
pub trait ShareStore: Send + Sync {
    async fn create_link(&self, link: &ShareLink) -> Result<(), ShareError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<ShareLink>, ShareError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShareLink>, ShareError>;

    async fn list_for_plan(&self, plan_id: Uuid) -> Result<Vec<ShareLink>, ShareError>;

    /// Apply the present fields of `changes`; `None` when the link does not exist.
    async fn update_link(
        &self,
        id: Uuid,
        changes: &UpdateShareLinkRequest,
    ) -> Result<Option<ShareLink>, ShareError>;

    async fn record_access(
        &self,
        link_id: Uuid,
        device_type: DeviceType,
        at: DateTime<Utc>,
    ) -> Result<(), ShareError>;

    async fn access_log(&self, link_id: Uuid) -> Result<Vec<AccessLogEntry>, ShareError>;

    /// Number of entries removed.
    async fn clear_access_log(&self, link_id: Uuid) -> Result<u64, ShareError>;
}
