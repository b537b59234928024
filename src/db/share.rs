//! Share link persistence over `share_links` and `share_link_access`

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::share::models::{AccessLogEntry, DeviceType, ShareLink, UpdateShareLinkRequest};
use crate::share::store::{ShareError, ShareStore};

const LINK_COLUMNS: &str = "id, plan_id, token, enabled, include_archived_versions, sections, created_at";

pub struct PgShareStore {
    pool: PgPool,
}

impl PgShareStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareStore for PgShareStore {
    async fn create_link(&self, link: &ShareLink) -> Result<(), ShareError> {
        sqlx::query(
            r#"
            INSERT INTO share_links (id, plan_id, token, enabled, include_archived_versions, sections, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(link.id)
        .bind(link.plan_id)
        .bind(&link.token)
        .bind(link.enabled)
        .bind(link.include_archived_versions)
        .bind(link.sections.clone())
        .bind(link.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ShareLink>, ShareError> {
        let query = format!("SELECT {} FROM share_links WHERE token = $1", LINK_COLUMNS);
        let link = sqlx::query_as::<_, ShareLink>(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(link)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShareLink>, ShareError> {
        let query = format!("SELECT {} FROM share_links WHERE id = $1", LINK_COLUMNS);
        let link = sqlx::query_as::<_, ShareLink>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(link)
    }

    async fn list_for_plan(&self, plan_id: Uuid) -> Result<Vec<ShareLink>, ShareError> {
        let query = format!(
            "SELECT {} FROM share_links WHERE plan_id = $1 ORDER BY created_at DESC",
            LINK_COLUMNS
        );
        let links = sqlx::query_as::<_, ShareLink>(&query)
            .bind(plan_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(links)
    }

    async fn update_link(
        &self,
        id: Uuid,
        changes: &UpdateShareLinkRequest,
    ) -> Result<Option<ShareLink>, ShareError> {
        let query = format!(
            r#"
            UPDATE share_links
            SET enabled = COALESCE($2, enabled),
                include_archived_versions = COALESCE($3, include_archived_versions),
                sections = COALESCE($4, sections)
            WHERE id = $1
            RETURNING {}
            "#,
            LINK_COLUMNS
        );
        let link = sqlx::query_as::<_, ShareLink>(&query)
            .bind(id)
            .bind(changes.enabled)
            .bind(changes.include_archived_versions)
            .bind(changes.sections.clone())
            .fetch_optional(&self.pool)
            .await?;
        Ok(link)
    }

    async fn record_access(
        &self,
        link_id: Uuid,
        device_type: DeviceType,
        at: DateTime<Utc>,
    ) -> Result<(), ShareError> {
        sqlx::query(
            "INSERT INTO share_link_access (share_link_id, accessed_at, device_type) VALUES ($1, $2, $3)",
        )
        .bind(link_id)
        .bind(at)
        .bind(device_type.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn access_log(&self, link_id: Uuid) -> Result<Vec<AccessLogEntry>, ShareError> {
        let rows: Vec<(DateTime<Utc>, String)> = sqlx::query_as(
            "SELECT accessed_at, device_type FROM share_link_access WHERE share_link_id = $1 ORDER BY accessed_at",
        )
        .bind(link_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(accessed_at, device)| AccessLogEntry {
                accessed_at,
                device_type: device.parse().unwrap_or(DeviceType::Unknown),
            })
            .collect())
    }

    async fn clear_access_log(&self, link_id: Uuid) -> Result<u64, ShareError> {
        let result = sqlx::query("DELETE FROM share_link_access WHERE share_link_id = $1")
            .bind(link_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
