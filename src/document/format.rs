//! Display formatting for list items, names and dates.

use chrono::NaiveDate;
use serde_json::Value;

use super::fields::{display_value, is_allowed, resolve_allowed, ItemFormat, ListSpec};

/// Keys tried, in order, for each part of a contact line.
const CONTACT_NAME_KEYS: &[&str] = &["name", "full_name"];
const CONTACT_RELATION_KEYS: &[&str] = &["relationship", "role"];
const CONTACT_REACH_KEYS: &[&str] = &["contact", "phone", "email"];

fn first_present(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter(|key| is_allowed(key))
        .find_map(|key| item.get(*key).and_then(display_value))
}

/// `Name - (relationship) - contact`, skipping absent parts.
pub fn format_contact(item: &Value) -> Option<String> {
    if item.is_string() {
        return display_value(item);
    }

    let parts: Vec<String> = [
        first_present(item, CONTACT_NAME_KEYS),
        first_present(item, CONTACT_RELATION_KEYS).map(|r| format!("({r})")),
        first_present(item, CONTACT_REACH_KEYS),
    ]
    .into_iter()
    .flatten()
    .collect();

    (!parts.is_empty()).then(|| parts.join(" - "))
}

pub fn format_item(item: &Value, format: ItemFormat) -> Option<String> {
    match format {
        ItemFormat::Contact => format_contact(item),
        ItemFormat::Join(keys) => {
            if !item.is_object() {
                return display_value(item);
            }
            let parts: Vec<String> = keys
                .iter()
                .filter(|key| is_allowed(key))
                .filter_map(|key| item.get(*key).and_then(display_value))
                .collect();
            (!parts.is_empty()).then(|| parts.join(" - "))
        }
    }
}

/// Render items for display, keeping at most `spec.cap` of them.
///
/// Items that render to nothing are skipped. When more than `cap` remain, the
/// last line is `and N more`.
pub fn format_list(items: &[Value], spec: &ListSpec) -> Vec<String> {
    let mut rendered: Vec<String> = items
        .iter()
        .filter_map(|item| format_item(item, spec.format))
        .collect();

    if rendered.len() > spec.cap {
        let hidden = rendered.len() - spec.cap;
        rendered.truncate(spec.cap);
        rendered.push(format!("and {hidden} more"));
    }
    rendered
}

/// Owner's display name from `personal_profile`.
pub fn full_name(record: &Value) -> Option<String> {
    if let Some(name) = resolve_allowed(record, "personal_profile.full_name").and_then(display_value) {
        return Some(name);
    }
    let (first, last) = name_parts(record);
    match (first, last) {
        (Some(f), Some(l)) => Some(format!("{f} {l}")),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

/// `(first, last)` from explicit fields, falling back to splitting `full_name`.
pub fn name_parts(record: &Value) -> (Option<String>, Option<String>) {
    let first = resolve_allowed(record, "personal_profile.first_name").and_then(display_value);
    let last = resolve_allowed(record, "personal_profile.last_name").and_then(display_value);
    if first.is_some() || last.is_some() {
        return (first, last);
    }

    let Some(full) = resolve_allowed(record, "personal_profile.full_name").and_then(display_value)
    else {
        return (None, None);
    };
    let mut words: Vec<&str> = full.split_whitespace().collect();
    match words.len() {
        0 => (None, None),
        1 => (Some(words[0].to_string()), None),
        _ => {
            let last = words.pop().map(str::to_string);
            (Some(words[0].to_string()), last)
        }
    }
}

/// e.g. `January 5, 2025`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CONTACTS: ListSpec = ListSpec::new("notify_contacts", "Notify", 3, ItemFormat::Contact);

    #[test]
    fn test_contact_line_format() {
        let item = json!({"name": "John Doe", "relationship": "executor", "contact": "555-1234"});
        assert_eq!(
            format_contact(&item),
            Some("John Doe - (executor) - 555-1234".to_string())
        );
    }

    #[test]
    fn test_contact_line_skips_missing_parts() {
        assert_eq!(
            format_contact(&json!({"name": "Ann", "contact": ""})),
            Some("Ann".to_string())
        );
        assert_eq!(
            format_contact(&json!({"role": "attorney", "email": "a@b.com"})),
            Some("(attorney) - a@b.com".to_string())
        );
        assert_eq!(format_contact(&json!({})), None);
    }

    #[test]
    fn test_list_exactly_at_cap_has_no_marker() {
        let items: Vec<Value> = (1..=3).map(|i| json!({"name": format!("P{i}")})).collect();
        let lines = format_list(&items, &CONTACTS);
        assert_eq!(lines, vec!["P1", "P2", "P3"]);
    }

    #[test]
    fn test_list_one_over_cap_has_marker() {
        let items: Vec<Value> = (1..=4).map(|i| json!({"name": format!("P{i}")})).collect();
        let lines = format_list(&items, &CONTACTS);
        assert_eq!(lines, vec!["P1", "P2", "P3", "and 1 more"]);
    }

    #[test]
    fn test_join_format_skips_denied_keys() {
        let spec = ListSpec::new(
            "businesses",
            "Businesses",
            5,
            ItemFormat::Join(&["name", "owner_ssn", "role"]),
        );
        let items = vec![json!({"name": "Acme", "owner_ssn": "123", "role": "Founder"})];
        assert_eq!(format_list(&items, &spec), vec!["Acme - Founder"]);
    }

    #[test]
    fn test_name_parts() {
        let record = json!({"personal_profile": {"full_name": "Jane Q Doe"}});
        assert_eq!(
            name_parts(&record),
            (Some("Jane".to_string()), Some("Doe".to_string()))
        );
        let explicit = json!({"personal_profile": {"first_name": "Jane", "last_name": "Doe"}});
        assert_eq!(full_name(&explicit), Some("Jane Doe".to_string()));
        assert_eq!(full_name(&json!({})), None);
    }

    #[test]
    fn test_long_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_long_date(date), "January 5, 2025");
    }
}
