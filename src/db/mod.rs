//! Database module - AppState and the Postgres stores
//!
//! - `plan` - plan payloads and revision persistence
//! - `share` - share links and their access log

mod plan;
mod share;

pub use plan::PgPlanStore;
pub use share::PgShareStore;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::JwtVerifier;
use crate::config::{AppConfig, ComposerConfig};
use crate::document::assets::LogoLoader;
use crate::metrics::Metrics;
use crate::plan::PlanStore;
use crate::revision::RevisionLedger;
use crate::share::ShareStore;
use crate::storage::{ObjectStorage, SupabaseStorage};

const METRICS_NAMESPACE: &str = "legacy_planner";

#[derive(Clone)]
pub struct AppState {
    pub plans: Arc<dyn PlanStore>,
    pub shares: Arc<dyn ShareStore>,
    pub storage: Arc<dyn ObjectStorage + Send + Sync>,
    pub ledger: Arc<RevisionLedger>,
    pub logos: LogoLoader,
    pub composer: ComposerConfig,
    pub jwt: JwtVerifier,
    pub metrics: Metrics,
    pub http_client: reqwest::Client,
}

fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(900))
        .timeout(Duration::from_secs(30))
        .user_agent("legacy-planner-server/1.0")
        .build()
}

impl AppState {
    pub async fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(900))
            .max_lifetime(Duration::from_secs(1800))
            .connect(&config.database_url)
            .await?;

        let client = http_client()?;
        let storage = Arc::new(SupabaseStorage::new(config.supabase.clone(), client.clone()));

        Self::with_components(
            Arc::new(PgPlanStore::new(pool.clone())),
            Arc::new(PgShareStore::new(pool)),
            storage,
            config.composer.clone(),
            &config.jwt_secret,
            client,
        )
    }

    /// Assemble the state from already-built collaborators.
    pub fn with_components(
        plans: Arc<dyn PlanStore>,
        shares: Arc<dyn ShareStore>,
        storage: Arc<dyn ObjectStorage + Send + Sync>,
        composer: ComposerConfig,
        jwt_secret: &str,
        http_client: reqwest::Client,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let metrics = Metrics::new(METRICS_NAMESPACE)?;

        Ok(AppState {
            ledger: Arc::new(RevisionLedger::new(plans.clone())),
            plans,
            shares,
            storage,
            logos: LogoLoader::new(http_client.clone()),
            composer,
            jwt: JwtVerifier::new(jwt_secret),
            metrics,
            http_client,
        })
    }
}
