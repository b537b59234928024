//! Token minting, visitor device detection and the filtered shared view.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::models::{AccessLogEntry, AccessSummary, DeviceType, ShareLink, SharedPlanView};
use crate::document::fields::{is_allowed, redact, resolve, Block};
use crate::document::generators::plan_binder::PLAN_BINDER_SECTIONS;
use crate::revision::migration::normalize;

lazy_static! {
    static ref TABLET_UA: Regex = Regex::new(r"(?i)ipad|tablet|kindle|silk|playbook").unwrap();
    static ref ANDROID_UA: Regex = Regex::new(r"(?i)android").unwrap();
    static ref MOBILE_UA: Regex =
        Regex::new(r"(?i)mobi|iphone|ipod|android|blackberry|windows phone|opera mini").unwrap();
    static ref DESKTOP_UA: Regex = Regex::new(r"(?i)windows nt|macintosh|x11|linux|cros").unwrap();
}

/// 64 hex characters of randomness.
pub fn generate_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

pub fn detect_device(user_agent: Option<&str>) -> DeviceType {
    let ua = match user_agent.map(str::trim) {
        Some(ua) if !ua.is_empty() => ua,
        _ => return DeviceType::Unknown,
    };

    let mobile = MOBILE_UA.is_match(ua);
    // Android tablets omit the "Mobile" token.
    let android_tablet = ANDROID_UA.is_match(ua) && !ua.to_lowercase().contains("mobi");

    if TABLET_UA.is_match(ua) || android_tablet {
        DeviceType::Tablet
    } else if mobile {
        DeviceType::Mobile
    } else if DESKTOP_UA.is_match(ua) {
        DeviceType::Desktop
    } else {
        DeviceType::Unknown
    }
}

pub fn summarize(log: &[AccessLogEntry]) -> AccessSummary {
    AccessSummary {
        last_accessed_at: log.iter().map(|e| e.accessed_at).max(),
        total_views: log.len() as u64,
    }
}

/// Binder section ids a link may expose.
pub fn shareable_sections() -> Vec<&'static str> {
    PLAN_BINDER_SECTIONS.iter().map(|s| s.id).collect()
}

/// Known section ids from `requested`, in binder order, without duplicates.
pub fn normalize_sections(requested: &[String]) -> Vec<String> {
    PLAN_BINDER_SECTIONS
        .iter()
        .filter(|section| requested.iter().any(|id| id.eq_ignore_ascii_case(section.id)))
        .map(|section| section.id.to_string())
        .collect()
}

fn section_keys(section_ids: &[String]) -> Vec<&'static str> {
    PLAN_BINDER_SECTIONS
        .iter()
        .filter(|section| section_ids.iter().any(|id| id == section.id))
        .flat_map(|section| section.blocks.iter())
        .filter_map(|block| match block {
            Block::Field(field) => Some(field.key),
            Block::List(list) => Some(list.key),
            _ => None,
        })
        .filter(|key| is_allowed(key))
        .collect()
}

fn insert_path(target: &mut Map<String, Value>, dotted_path: &str, value: Value) {
    let mut segments = dotted_path.split('.').peekable();
    let mut node = target;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            node.insert(segment.to_string(), value);
            return;
        }
        let child = node
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        node = match child {
            Value::Object(map) => map,
            _ => return,
        };
    }
}

/// Read-only projection of a plan through a share link.
pub fn shared_view(link: &ShareLink, plan_data: &Value) -> SharedPlanView {
    let mut data = Map::new();
    for key in section_keys(&link.sections) {
        if let Some(value) = resolve(plan_data, key) {
            insert_path(&mut data, key, redact(value));
        }
    }

    let mut revisions = normalize(plan_data);
    if !link.include_archived_versions {
        revisions = revisions
            .into_iter()
            .max_by_key(|r| r.revision_number)
            .into_iter()
            .collect();
    }

    SharedPlanView {
        plan_id: link.plan_id,
        sections: link.sections.clone(),
        data: Value::Object(data),
        revisions,
    }
}
