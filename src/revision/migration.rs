//! Upgrading stored revision payloads to the canonical `signature_revisions` array.
//!
//! Plans written by older clients carry their signatures in one of several
//! shapes. [`StoredRevisions::detect`] picks exactly one of them, first match
//! wins, and [`StoredRevisions::into_canonical`] maps it to [`Revision`]s.
//! Adding a shape means adding a variant and its arm in both functions.

use serde_json::{Map, Value};
use uuid::Uuid;

use super::models::Revision;

/// Payload key of the canonical revision array.
pub const CANONICAL_KEY: &str = "signature_revisions";

const SIGNER_KEYS: &[&str] = &["signer_name", "prepared_by", "signed_by", "name"];
const IMAGE_KEYS: &[&str] = &["signature_image", "signature_png", "signature", "image"];
const SIGNED_AT_KEYS: &[&str] = &["signed_at", "date", "timestamp", "signed_date"];
const NOTE_KEYS: &[&str] = &["change_note", "note", "notes", "reason"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoredRevisions<'a> {
    /// `signature_revisions: [...]`, already canonical or nearly so.
    Canonical(&'a [Value]),
    /// `signature.revisions: [...]`, numbered by position.
    NestedRevisions(&'a [Value]),
    /// `signature.current: {...}`, a single signature.
    CurrentSignature(&'a Value),
    /// Top-level `revisions: [...]`, numbered by position.
    TopLevel(&'a [Value]),
    Empty,
}

fn non_empty_array(value: Option<&Value>) -> Option<&[Value]> {
    match value {
        Some(Value::Array(items)) if !items.is_empty() => Some(items.as_slice()),
        _ => None,
    }
}

impl<'a> StoredRevisions<'a> {
    pub fn detect(data: &'a Value) -> Self {
        if let Some(items) = non_empty_array(data.get(CANONICAL_KEY)) {
            return Self::Canonical(items);
        }

        let signature = data.get("signature");
        if let Some(items) = non_empty_array(signature.and_then(|s| s.get("revisions"))) {
            return Self::NestedRevisions(items);
        }
        if let Some(current) = signature.and_then(|s| s.get("current")).filter(|c| c.is_object()) {
            return Self::CurrentSignature(current);
        }

        if let Some(items) = non_empty_array(data.get("revisions")) {
            return Self::TopLevel(items);
        }

        Self::Empty
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Self::Canonical(_) => "canonical",
            Self::NestedRevisions(_) => "signature.revisions",
            Self::CurrentSignature(_) => "signature.current",
            Self::TopLevel(_) => "revisions",
            Self::Empty => "empty",
        }
    }

    pub fn into_canonical(self) -> Vec<Revision> {
        match self {
            Self::Canonical(items) => {
                let (mut numbered, unnumbered): (Vec<_>, Vec<_>) = objects(items)
                    .map(|obj| (obj.get("revision_number").and_then(number_of), obj))
                    .partition(|(number, _)| number.is_some());
                numbered.sort_by_key(|(number, _)| *number);

                // Stored numbers survive unless they collide; later entries
                // then move up so numbering stays strictly increasing.
                let mut last = 0;
                numbered
                    .into_iter()
                    .chain(unnumbered)
                    .map(|(number, obj)| {
                        last = number.map_or(last + 1, |n| n.max(last + 1));
                        from_object(obj, last)
                    })
                    .collect()
            }
            Self::NestedRevisions(items) | Self::TopLevel(items) => objects(items)
                .enumerate()
                .map(|(i, obj)| from_object(obj, i as u32 + 1))
                .collect(),
            Self::CurrentSignature(current) => current
                .as_object()
                .map(|obj| vec![from_object(obj, 1)])
                .unwrap_or_default(),
            Self::Empty => Vec::new(),
        }
    }
}

/// Canonical revision list of a plan payload, whatever shape it was stored in.
pub fn normalize(data: &Value) -> Vec<Revision> {
    StoredRevisions::detect(data).into_canonical()
}

fn objects(items: &[Value]) -> impl Iterator<Item = &Map<String, Value>> {
    items.iter().filter_map(Value::as_object)
}

fn number_of(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// First alias holding a non-empty scalar, rendered as a string.
fn first_of(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Images are only ever taken from strings.
fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    })
}

fn from_object(obj: &Map<String, Value>, revision_number: u32) -> Revision {
    Revision {
        id: first_of(obj, &["id"]).unwrap_or_else(|| Uuid::new_v4().to_string()),
        revision_number,
        signer_name: first_of(obj, SIGNER_KEYS),
        signature_image: first_string(obj, IMAGE_KEYS),
        signed_at: first_of(obj, SIGNED_AT_KEYS),
        change_note: first_of(obj, NOTE_KEYS),
        created_at: first_of(obj, &["created_at"]),
    }
}
