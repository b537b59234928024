use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::revision::models::Revision;

/// Read-only capability over part of a plan.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ShareLink {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub token: String,
    pub enabled: bool,
    pub include_archived_versions: bool,
    /// Plan binder section ids visible through the link.
    pub sections: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
    Unknown,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Desktop => "desktop",
            DeviceType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = std::convert::Infallible;

    /// Unrecognized values read back as `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "mobile" => DeviceType::Mobile,
            "tablet" => DeviceType::Tablet,
            "desktop" => DeviceType::Desktop,
            _ => DeviceType::Unknown,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AccessLogEntry {
    pub accessed_at: DateTime<Utc>,
    pub device_type: DeviceType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct AccessSummary {
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub total_views: u64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateShareLinkRequest {
    pub sections: Vec<String>,
    #[serde(default)]
    pub include_archived_versions: bool,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateShareLinkRequest {
    pub enabled: Option<bool>,
    pub include_archived_versions: Option<bool>,
    pub sections: Option<Vec<String>>,
}

/// Share link as shown to the plan owner.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShareLinkResponse {
    #[serde(flatten)]
    pub link: ShareLink,
    pub access: AccessSummary,
}

/// What an unauthenticated viewer receives.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SharedPlanView {
    pub plan_id: Uuid,
    pub sections: Vec<String>,
    #[schema(value_type = Object)]
    pub data: Value,
    pub revisions: Vec<Revision>,
}

/// Owner-facing access history of one link.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccessReport {
    pub summary: AccessSummary,
    pub entries: Vec<AccessLogEntry>,
}
