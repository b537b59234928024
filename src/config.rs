//! Application configuration, loaded once at startup from the environment.
//!
//! The composer only ever sees a [`ComposerConfig`] passed in at call time.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::SupabaseConfig;

const DEFAULT_PROVIDER_NAME: &str = "Legacy Planner";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Account billing state. Trial accounts always get the draft watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingMode {
    #[default]
    Active,
    Trial,
}

impl FromStr for BillingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" | "paid" => Ok(Self::Active),
            "trial" => Ok(Self::Trial),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub table_of_contents: bool,
    pub will_preparation: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            table_of_contents: true,
            will_preparation: true,
        }
    }
}

/// Branding and behavior switches for document generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposerConfig {
    pub provider_name: String,
    pub logo_url: Option<String>,
    pub billing_mode: BillingMode,
    pub features: FeatureFlags,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            provider_name: DEFAULT_PROVIDER_NAME.to_string(),
            logo_url: None,
            billing_mode: BillingMode::default(),
            features: FeatureFlags::default(),
        }
    }
}

impl ComposerConfig {
    pub fn forces_draft(&self) -> bool {
        self.billing_mode == BillingMode::Trial
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = FeatureFlags::default();
        let billing_mode = match env::var("BILLING_MODE") {
            Ok(raw) => raw.parse().map_err(|value| ConfigError::Invalid {
                key: "BILLING_MODE",
                value,
            })?,
            Err(_) => BillingMode::default(),
        };

        Ok(Self {
            provider_name: env::var("PROVIDER_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROVIDER_NAME.to_string()),
            logo_url: env::var("PROVIDER_LOGO_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            billing_mode,
            features: FeatureFlags {
                table_of_contents: env_flag("FEATURE_TABLE_OF_CONTENTS", defaults.table_of_contents)?,
                will_preparation: env_flag("FEATURE_WILL_PREPARATION", defaults.will_preparation)?,
            },
        })
    }
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
        }),
    }
}

fn env_flag(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(raw) => parse_flag(key, &raw),
        Err(_) => Ok(default),
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub supabase: SupabaseConfig,
    pub composer: ComposerConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Build the configuration from process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw.clone(),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            database_url: required("SUPABASE_DATABASE_URL")?,
            jwt_secret: required("SUPABASE_JWT_SECRET")?,
            supabase: SupabaseConfig::from_env()?,
            composer: ComposerConfig::from_env()?,
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
                port,
            },
        })
    }
}
