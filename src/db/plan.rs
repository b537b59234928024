//! Plan persistence over the `plans` table

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::plan::models::PlanRecord;
use crate::plan::store::{PlanStore, StoreError};
use crate::revision::models::Revision;

pub struct PgPlanStore {
    pool: PgPool,
}

impl PgPlanStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanStore for PgPlanStore {
    async fn fetch_plan(&self, plan_id: Uuid) -> Result<Option<PlanRecord>, StoreError> {
        let plan = sqlx::query_as::<_, PlanRecord>(
            r#"
            SELECT id, user_id, organization_id, percent_complete, last_signed_at,
                   COALESCE(data, '{}'::jsonb) AS data, created_at, updated_at
            FROM plans
            WHERE id = $1
            "#,
        )
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(plan)
    }

    /// Only the canonical key is rewritten; legacy signature keys stay as they were.
    async fn save_revisions(&self, plan_id: Uuid, revisions: &[Revision]) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE plans
            SET data = jsonb_set(COALESCE(data, '{}'::jsonb), '{signature_revisions}', $2, true),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(plan_id)
        .bind(Json(revisions))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(plan_id));
        }
        Ok(())
    }

    async fn touch_last_signed(&self, plan_id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query("UPDATE plans SET last_signed_at = $2 WHERE id = $1")
            .bind(plan_id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_completion(&self, plan_id: Uuid, percent: i32) -> Result<(), StoreError> {
        sqlx::query("UPDATE plans SET percent_complete = $2 WHERE id = $1 AND percent_complete <> $2")
            .bind(plan_id)
            .bind(percent)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
