#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::{json, Value};
use uuid::Uuid;

use legacy_planner_server::config::ComposerConfig;
use legacy_planner_server::plan::models::PlanRecord;
use legacy_planner_server::plan::store::{PlanStore, StoreError};
use legacy_planner_server::revision::models::Revision;
use legacy_planner_server::share::models::{AccessLogEntry, DeviceType, ShareLink, UpdateShareLinkRequest};
use legacy_planner_server::share::store::{ShareError, ShareStore};
use legacy_planner_server::storage::ObjectStorage;
use legacy_planner_server::AppState;

pub const JWT_SECRET: &str = "test-jwt-secret";

/// In-memory plan table
#[derive(Default)]
pub struct MemoryPlanStore {
    plans: Mutex<HashMap<Uuid, PlanRecord>>,
    pub fail_touch: AtomicBool,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, owner: Uuid, data: Value) -> Uuid {
        let id = Uuid::new_v4();
        self.plans.lock().insert(
            id,
            PlanRecord {
                id,
                user_id: owner,
                organization_id: None,
                percent_complete: 0,
                last_signed_at: None,
                data,
                created_at: Some(Utc::now()),
                updated_at: None,
            },
        );
        id
    }

    pub fn get(&self, id: Uuid) -> Option<PlanRecord> {
        self.plans.lock().get(&id).cloned()
    }
}

#[async_trait]
impl PlanStore for MemoryPlanStore {
    async fn fetch_plan(&self, plan_id: Uuid) -> Result<Option<PlanRecord>, StoreError> {
        Ok(self.get(plan_id))
    }

    async fn save_revisions(&self, plan_id: Uuid, revisions: &[Revision]) -> Result<(), StoreError> {
        let value = serde_json::to_value(revisions)?;
        let mut plans = self.plans.lock();
        let plan = plans.get_mut(&plan_id).ok_or(StoreError::NotFound(plan_id))?;
        if !plan.data.is_object() {
            plan.data = json!({});
        }
        if let Value::Object(map) = &mut plan.data {
            map.insert("signature_revisions".to_string(), value);
        }
        Ok(())
    }

    async fn touch_last_signed(&self, plan_id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        if self.fail_touch.load(Ordering::SeqCst) {
            return Err(StoreError::NotFound(plan_id));
        }
        if let Some(plan) = self.plans.lock().get_mut(&plan_id) {
            plan.last_signed_at = Some(at);
        }
        Ok(())
    }

    async fn update_completion(&self, plan_id: Uuid, percent: i32) -> Result<(), StoreError> {
        if let Some(plan) = self.plans.lock().get_mut(&plan_id) {
            plan.percent_complete = percent;
        }
        Ok(())
    }
}

/// In-memory share links and access log
#[derive(Default)]
pub struct MemoryShareStore {
    links: Mutex<HashMap<Uuid, ShareLink>>,
    access: Mutex<Vec<(Uuid, AccessLogEntry)>>,
}

impl MemoryShareStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    async fn create_link(&self, link: &ShareLink) -> Result<(), ShareError> {
        self.links.lock().insert(link.id, link.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ShareLink>, ShareError> {
        Ok(self.links.lock().values().find(|l| l.token == token).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShareLink>, ShareError> {
        Ok(self.links.lock().get(&id).cloned())
    }

    async fn list_for_plan(&self, plan_id: Uuid) -> Result<Vec<ShareLink>, ShareError> {
        Ok(self
            .links
            .lock()
            .values()
            .filter(|l| l.plan_id == plan_id)
            .cloned()
            .collect())
    }

    async fn update_link(
        &self,
        id: Uuid,
        changes: &UpdateShareLinkRequest,
    ) -> Result<Option<ShareLink>, ShareError> {
        let mut links = self.links.lock();
        let Some(link) = links.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(enabled) = changes.enabled {
            link.enabled = enabled;
        }
        if let Some(archived) = changes.include_archived_versions {
            link.include_archived_versions = archived;
        }
        if let Some(sections) = &changes.sections {
            link.sections = sections.clone();
        }
        Ok(Some(link.clone()))
    }

    async fn record_access(
        &self,
        link_id: Uuid,
        device_type: DeviceType,
        at: DateTime<Utc>,
    ) -> Result<(), ShareError> {
        self.access.lock().push((
            link_id,
            AccessLogEntry {
                accessed_at: at,
                device_type,
            },
        ));
        Ok(())
    }

    async fn access_log(&self, link_id: Uuid) -> Result<Vec<AccessLogEntry>, ShareError> {
        Ok(self
            .access
            .lock()
            .iter()
            .filter(|(id, _)| *id == link_id)
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    async fn clear_access_log(&self, link_id: Uuid) -> Result<u64, ShareError> {
        let mut access = self.access.lock();
        let before = access.len();
        access.retain(|(id, _)| *id != link_id);
        Ok((before - access.len()) as u64)
    }
}

/// Mock implementation of ObjectStorage for testing
#[derive(Default)]
pub struct MockObjectStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
    fail_uploads: AtomicBool,
    fail_signing: AtomicBool,
}

impl MockObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose uploads are always rejected.
    pub fn unavailable() -> Self {
        let storage = Self::default();
        storage.fail_uploads.store(true, Ordering::SeqCst);
        storage
    }

    /// Storage that accepts uploads but cannot sign URLs.
    pub fn unsignable() -> Self {
        let storage = Self::default();
        storage.fail_signing.store(true, Ordering::SeqCst);
        storage
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.lock().keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStorage for MockObjectStorage {
    async fn upload_file(&self, filename: &str, file_data: &[u8]) -> Result<(), String> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err("Upload failed with status 503 Service Unavailable".to_string());
        }
        self.files
            .lock()
            .insert(filename.to_string(), file_data.to_vec());
        Ok(())
    }

    async fn download_file(&self, filename: &str) -> Result<Vec<u8>, String> {
        self.files
            .lock()
            .get(filename)
            .cloned()
            .ok_or_else(|| format!("{} not found", filename))
    }

    async fn delete_file(&self, filename: &str) -> Result<(), String> {
        self.files.lock().remove(filename);
        Ok(())
    }

    async fn create_signed_url(&self, filename: &str, expires_in_secs: u64) -> Result<String, String> {
        if self.fail_signing.load(Ordering::SeqCst) {
            return Err("Signing failed with status 500".to_string());
        }
        Ok(format!(
            "http://test.example.com/storage/v1/object/sign/test-bucket/{}?token=t&expires={}",
            filename, expires_in_secs
        ))
    }
}

pub struct TestContext {
    pub plans: Arc<MemoryPlanStore>,
    pub shares: Arc<MemoryShareStore>,
    pub storage: Arc<MockObjectStorage>,
    pub state: web::Data<AppState>,
}

pub fn test_context(storage: MockObjectStorage) -> TestContext {
    let plans = Arc::new(MemoryPlanStore::new());
    let shares = Arc::new(MemoryShareStore::new());
    let storage = Arc::new(storage);

    let state = AppState::with_components(
        plans.clone(),
        shares.clone(),
        storage.clone(),
        ComposerConfig::default(),
        JWT_SECRET,
        reqwest::Client::new(),
    )
    .expect("Failed to create AppState");

    TestContext {
        plans,
        shares,
        storage,
        state: web::Data::new(state),
    }
}

pub fn bearer(state: &AppState, user_id: Uuid) -> (&'static str, String) {
    let token = state
        .jwt
        .issue(&user_id.to_string(), 300)
        .expect("Failed to issue token");
    ("Authorization", format!("Bearer {}", token))
}

pub fn jane_doe_plan() -> Value {
    json!({
        "personal_profile": {
            "full_name": "Jane Doe",
            "first_name": "Jane",
            "last_name": "Doe"
        },
        "notify_contacts": [
            {"name": "John Doe", "relationship": "executor", "contact": "555-1234"}
        ]
    })
}
