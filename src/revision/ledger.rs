use std::collections::HashMap;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::migration::normalize;
use super::models::{Revision, SignRequest};
use crate::plan::store::{PlanStore, StoreError};
use crate::validation::{ValidationErrors, Validator};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("plan {0} not found")]
    PlanNotFound(Uuid),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => LedgerError::PlanNotFound(id),
            other => LedgerError::Store(other),
        }
    }
}

type PlanLock = Arc<tokio::sync::Mutex<()>>;

/// Append-only revision history of plans.
///
/// Appends to the same plan are serialized within this process; the stored
/// maximum is re-read under the lock right before a number is assigned.
pub struct RevisionLedger {
    store: Arc<dyn PlanStore>,
    locks: parking_lot::Mutex<HashMap<Uuid, PlanLock>>,
}

impl RevisionLedger {
    pub fn new(store: Arc<dyn PlanStore>) -> Self {
        Self {
            store,
            locks: parking_lot::Mutex::new(HashMap::new()),
        }
    }

    pub async fn list(&self, plan_id: Uuid) -> Result<Vec<Revision>, LedgerError> {
        let plan = self
            .store
            .fetch_plan(plan_id)
            .await?
            .ok_or(LedgerError::PlanNotFound(plan_id))?;
        Ok(normalize(&plan.data))
    }

    /// Revision with the highest number, not the last one appended.
    pub async fn latest(&self, plan_id: Uuid) -> Result<Option<Revision>, LedgerError> {
        let revisions = self.list(plan_id).await?;
        Ok(revisions.into_iter().max_by_key(|r| r.revision_number))
    }

    pub async fn append(&self, plan_id: Uuid, request: SignRequest) -> Result<Revision, LedgerError> {
        request.validate().map_err(LedgerError::Validation)?;

        let lock = self.lock_for(plan_id);
        let result = {
            let _guard = lock.lock().await;
            self.append_locked(plan_id, request).await
        };
        drop(lock);
        self.prune_locks();

        let revision = result?;

        let now = Utc::now();
        if let Err(e) = self.store.touch_last_signed(plan_id, now).await {
            log::error!(
                "Revision {} of plan {} stored but last_signed_at update failed: {}",
                revision.revision_number,
                plan_id,
                e
            );
        }

        Ok(revision)
    }

    async fn append_locked(&self, plan_id: Uuid, request: SignRequest) -> Result<Revision, LedgerError> {
        let plan = self
            .store
            .fetch_plan(plan_id)
            .await?
            .ok_or(LedgerError::PlanNotFound(plan_id))?;

        let mut revisions = normalize(&plan.data);
        let next = revisions.iter().map(|r| r.revision_number).max().unwrap_or(0) + 1;
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let revision = Revision {
            id: Uuid::new_v4().to_string(),
            revision_number: next,
            signer_name: Some(request.signer_name.trim().to_string()),
            signature_image: request.signature_image,
            signed_at: Some(now.clone()),
            change_note: request
                .change_note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            created_at: Some(now),
        };
        revisions.push(revision.clone());

        self.store.save_revisions(plan_id, &revisions).await?;
        log::info!("Plan {} signed, revision {}", plan_id, next);

        Ok(revision)
    }

    fn lock_for(&self, plan_id: Uuid) -> PlanLock {
        self.locks.lock().entry(plan_id).or_default().clone()
    }

    /// Drop locks nobody is holding or waiting on.
    fn prune_locks(&self) {
        self.locks.lock().retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    #[cfg(test)]
    fn lock_count(&self) -> usize {
        self.locks.lock().len()
    }
}
