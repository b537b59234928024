use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::document::fields::{display_value, resolve};

/// Row of the `plans` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PlanRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub percent_complete: i32,
    pub last_signed_at: Option<DateTime<Utc>>,
    /// Nested plan payload, see [`PlanData`].
    #[schema(value_type = Object)]
    pub data: Value,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PlanRecord {
    pub fn is_owned_by(&self, user_id: &Uuid) -> bool {
        self.user_id == *user_id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PersonalProfile {
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub preferred_name: Option<String>,
    pub birthplace: Option<String>,
    pub marital_status: Option<String>,
    pub spouse_name: Option<String>,
    pub children_names: Option<String>,
    pub parents_names: Option<String>,
    pub siblings_names: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub religion: Option<String>,
    pub military_branch: Option<String>,
    pub military_rank: Option<String>,
    pub service_dates: Option<String>,
    pub discharge: Option<String>,
    /// Accepted on input, never echoed back.
    #[serde(skip_serializing)]
    pub ssn: Option<String>,
    #[serde(skip_serializing)]
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Contact {
    pub name: Option<String>,
    #[serde(alias = "role")]
    pub relationship: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FuneralPreferences {
    pub disposition: Option<String>,
    pub service_type: Option<String>,
    pub location: Option<String>,
    pub officiant: Option<String>,
    pub music: Option<String>,
    pub readings: Option<String>,
    pub obituary_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PlanNotes {
    pub funeral: Option<String>,
    pub legal: Option<String>,
    pub financial: Option<String>,
    pub property: Option<String>,
    pub pets: Option<String>,
    pub digital: Option<String>,
    pub messages: Option<String>,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct WillPreparation {
    pub executor: Option<String>,
    pub alternate_executor: Option<String>,
    pub guardian: Option<String>,
    pub alternate_guardian: Option<String>,
    pub specific_gifts: Option<String>,
    pub residuary: Option<String>,
}

/// Typed view over the plan payload, published in the API schema.
///
/// Line-item collections are kept as raw objects; each is a flat record of
/// optional fields rendered through the layout's item format. Unknown keys
/// (revision payloads included) are preserved in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PlanData {
    pub personal_profile: PersonalProfile,
    pub notify_contacts: Vec<Contact>,
    pub professional_contacts: Vec<Contact>,
    pub funeral_preferences: FuneralPreferences,
    #[schema(value_type = Vec<Object>)]
    pub bank_accounts: Vec<Map<String, Value>>,
    #[schema(value_type = Vec<Object>)]
    pub investments: Vec<Map<String, Value>>,
    #[schema(value_type = Vec<Object>)]
    pub debts: Vec<Map<String, Value>>,
    #[schema(value_type = Vec<Object>)]
    pub insurance_policies: Vec<Map<String, Value>>,
    #[schema(value_type = Vec<Object>)]
    pub properties: Vec<Map<String, Value>>,
    #[schema(value_type = Vec<Object>)]
    pub vehicles: Vec<Map<String, Value>>,
    #[schema(value_type = Vec<Object>)]
    pub pets: Vec<Map<String, Value>>,
    #[schema(value_type = Vec<Object>)]
    pub businesses: Vec<Map<String, Value>>,
    #[schema(value_type = Vec<Object>)]
    pub social_accounts: Vec<Map<String, Value>>,
    #[schema(value_type = Vec<Object>)]
    pub phones: Vec<Map<String, Value>>,
    pub notes: PlanNotes,
    pub will_preparation: WillPreparation,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// Planner areas counted by [`completion_percentage`]; an area is answered
/// when any of its keys holds a value.
const COMPLETION_AREAS: &[&[&str]] = &[
    &["personal_profile.full_name", "personal_profile.first_name"],
    &[
        "personal_profile.spouse_name",
        "personal_profile.children_names",
        "personal_profile.parents_names",
    ],
    &["notify_contacts"],
    &["professional_contacts"],
    &["funeral_preferences.disposition", "funeral_preferences.service_type", "notes.funeral"],
    &["bank_accounts", "investments", "insurance_policies"],
    &["properties", "vehicles", "notes.property"],
    &["pets", "notes.pets"],
    &["social_accounts", "phones", "notes.digital"],
    &["notes.legal"],
    &["notes.messages"],
    &["notes.instructions"],
];

fn answered(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().any(answered),
        Value::Object(map) => map.values().any(answered),
        other => display_value(other).is_some(),
    }
}

/// Share of planner areas with at least one answer, 0 to 100.
///
/// Reads the raw payload the way the composer does, so values in an
/// unexpected shape still count.
pub fn completion_percentage(data: &Value) -> u8 {
    let done = COMPLETION_AREAS
        .iter()
        .filter(|keys| keys.iter().filter_map(|key| resolve(data, key)).any(answered))
        .count();
    ((done * 100) / COMPLETION_AREAS.len()) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plan_data_keeps_extra_keys() {
        let value = json!({
            "personal_profile": {"full_name": "Jane Doe", "ssn": "123-45-6789"},
            "signature": {"current": {"signer_name": "Jane"}},
            "pets": [{"name": "Rex", "species": "dog"}]
        });
        let data: PlanData = serde_json::from_value(value).unwrap();
        assert_eq!(data.personal_profile.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(data.pets.len(), 1);
        assert!(data.extra.contains_key("signature"));
    }

    #[test]
    fn test_privacy_fields_not_serialized() {
        let value = json!({"personal_profile": {"full_name": "Jane", "ssn": "123-45-6789", "date_of_birth": "1950-01-01"}});
        let data: PlanData = serde_json::from_value(value).unwrap();
        let out = serde_json::to_string(&data).unwrap();
        assert!(!out.contains("123-45-6789"));
        assert!(!out.contains("1950-01-01"));
    }

    #[test]
    fn test_contact_accepts_role_alias() {
        let contact: Contact = serde_json::from_value(json!({"name": "Ann", "role": "attorney"})).unwrap();
        assert_eq!(contact.relationship.as_deref(), Some("attorney"));
    }

    #[test]
    fn test_completion_percentage() {
        assert_eq!(completion_percentage(&json!({})), 0);
        assert_eq!(completion_percentage(&json!(null)), 0);
        let data = json!({
            "personal_profile": {"full_name": "Jane"},
            "notify_contacts": [{"name": "John"}],
            "notes": {"legal": "Will at Smith & Co."}
        });
        assert_eq!(completion_percentage(&data), 25);
    }

    #[test]
    fn test_completion_ignores_blank_answers() {
        let data = json!({
            "personal_profile": {"full_name": "  "},
            "notify_contacts": [{}, {"name": ""}],
            "pets": []
        });
        assert_eq!(completion_percentage(&data), 0);
    }

    #[test]
    fn test_completion_tolerates_untyped_values() {
        let as_text = json!({
            "personal_profile": {"full_name": "Jane", "children_names": "Ann, Bob"},
            "notify_contacts": [{"name": "John", "contact": "555-1234"}]
        });
        let as_list = json!({
            "personal_profile": {"full_name": "Jane", "children_names": ["Ann", "Bob"]},
            "notify_contacts": [{"name": "John", "contact": 5551234}]
        });
        assert_eq!(completion_percentage(&as_text), 25);
        assert_eq!(completion_percentage(&as_list), 25);
    }
}
