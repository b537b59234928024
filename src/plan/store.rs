use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::PlanRecord;
use crate::revision::models::Revision;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("plan {0} not found")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence of plan records.
#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn fetch_plan(&self, plan_id: Uuid) -> Result<Option<PlanRecord>, StoreError>;

    /// Replace the canonical revision array in the plan payload.
    async fn save_revisions(&self, plan_id: Uuid, revisions: &[Revision]) -> Result<(), StoreError>;

    async fn touch_last_signed(&self, plan_id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError>;

    async fn update_completion(&self, plan_id: Uuid, percent: i32) -> Result<(), StoreError>;
}
