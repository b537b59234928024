//! Field and section configuration for generated documents.
//!
//! Layouts are `const` data. A visual change ships as a new [`LayoutVersion`]
//! instead of editing an existing one, so documents generated from an older
//! version stay reproducible.
//!
//! Privacy is enforced here and only here: every key goes through
//! [`is_allowed`] before it is resolved or drawn.

use serde_json::{Map, Value};

use super::layout::{BODY_FONT_SIZE, CONTENT_WIDTH, LINE_SPACING};

/// Key fragments that never reach a generated document or a shared view.
pub const PRIVACY_DENY_LIST: &[&str] = &[
    "ssn",
    "social_security",
    "dob",
    "date_of_birth",
    "birth_date",
    "government_id",
];

/// Identifier of one frozen layout revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutVersion(pub &'static str);

impl LayoutVersion {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

/// A single labelled value drawn from the plan record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Dotted path into the plan record, e.g. `personal_profile.full_name`.
    pub key: &'static str,
    pub label: &'static str,
    /// Offset from the left content margin.
    pub x: f32,
    pub width: f32,
    /// Vertical footprint reserved for the value on the current page.
    pub height: f32,
    pub font_size: f32,
    pub multiline: bool,
    /// Ruled lines drawn in place of an empty value.
    pub blank_lines: u8,
}

impl FieldSpec {
    /// Single-line field spanning the content width.
    pub const fn line(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            x: 0.0,
            width: CONTENT_WIDTH,
            height: BODY_FONT_SIZE * LINE_SPACING,
            font_size: BODY_FONT_SIZE,
            multiline: false,
            blank_lines: 1,
        }
    }

    /// Wrapping field whose footprint holds `lines` lines of body text.
    pub const fn text_area(key: &'static str, label: &'static str, lines: u8) -> Self {
        Self {
            key,
            label,
            x: 0.0,
            width: CONTENT_WIDTH,
            height: lines as f32 * BODY_FONT_SIZE * LINE_SPACING,
            font_size: BODY_FONT_SIZE,
            multiline: true,
            blank_lines: lines,
        }
    }

    /// Place the field at a horizontal offset with a narrower width.
    pub const fn at(self, x: f32, width: f32) -> Self {
        Self { x, width, ..self }
    }

    pub const fn sized(self, font_size: f32) -> Self {
        Self { font_size, ..self }
    }

    /// Number of wrapped lines that fit inside the declared footprint.
    pub fn lines_in_footprint(&self) -> usize {
        let per_line = self.font_size * LINE_SPACING;
        if per_line <= 0.0 {
            return 1;
        }
        ((self.height / per_line).floor() as usize).max(1)
    }
}

/// How one element of an array-valued field is turned into a line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemFormat {
    /// `Name - (relationship) - contact`
    Contact,
    /// Present values of the listed keys joined with ` - `.
    Join(&'static [&'static str]),
}

/// Array-valued field rendered as a capped list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub cap: usize,
    pub format: ItemFormat,
    /// Ruled lines drawn when the list is empty.
    pub blank_lines: u8,
}

impl ListSpec {
    pub const fn new(key: &'static str, label: &'static str, cap: usize, format: ItemFormat) -> Self {
        Self {
            key,
            label,
            cap,
            format,
            blank_lines: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

/// Building block of a section, drawn in declaration order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Block {
    Field(FieldSpec),
    List(ListSpec),
    /// Static checklist text with one checkbox per item.
    Checklist(&'static [&'static str]),
    /// Static body text.
    Paragraph(&'static str),
    Faq(&'static [FaqEntry]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub blocks: &'static [Block],
}

/// Frozen description of one document type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentLayout {
    pub version: LayoutVersion,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub sections: &'static [SectionSpec],
}

impl DocumentLayout {
    pub fn section_ids(&self) -> Vec<&'static str> {
        self.sections.iter().map(|s| s.id).collect()
    }

    /// Sections to render, in layout order. Unknown ids in `subset` are ignored.
    pub fn select(&self, subset: Option<&[String]>) -> Vec<&'static SectionSpec> {
        match subset {
            None => self.sections.iter().collect(),
            Some(ids) => self
                .sections
                .iter()
                .filter(|section| ids.iter().any(|id| id.eq_ignore_ascii_case(section.id)))
                .collect(),
        }
    }
}

/// Case-insensitive substring check against [`PRIVACY_DENY_LIST`].
pub fn is_allowed(field_key: &str) -> bool {
    let lowered = field_key.to_lowercase();
    !PRIVACY_DENY_LIST
        .iter()
        .any(|denied| lowered.contains(denied))
}

/// Walk a dotted path through nested objects (and numeric array indexes).
///
/// Returns `None` as soon as an intermediate key is missing or the node is not
/// traversable. An empty path or an empty segment resolves to `None`.
pub fn resolve<'a>(record: &'a Value, dotted_path: &str) -> Option<&'a Value> {
    if dotted_path.is_empty() {
        return None;
    }

    dotted_path
        .split('.')
        .try_fold(record, |node, segment| match node {
            _ if segment.is_empty() => None,
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Resolve a key only when the privacy predicate lets it through.
pub fn resolve_allowed<'a>(record: &'a Value, dotted_path: &str) -> Option<&'a Value> {
    if !is_allowed(dotted_path) {
        return None;
    }
    resolve(record, dotted_path)
}

/// Printable text for a scalar (or array of scalars). Blank strings are `None`.
pub fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("Yes".to_string()),
        Value::Bool(false) => Some("No".to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter(|item| !item.is_array() && !item.is_object())
                .filter_map(display_value)
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

/// Copy of `value` with every denied key removed at every depth.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let cleaned: Map<String, Value> = map
                .iter()
                .filter(|(key, _)| is_allowed(key))
                .map(|(key, inner)| (key.clone(), redact(inner)))
                .collect();
            Value::Object(cleaned)
        }
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_nested_path() {
        let record = json!({"personal_profile": {"full_name": "Jane Doe"}});
        assert_eq!(
            resolve(&record, "personal_profile.full_name"),
            Some(&json!("Jane Doe"))
        );
    }

    #[test]
    fn test_resolve_missing_intermediate_is_none() {
        let record = json!({"personal_profile": null, "notes": "text"});
        assert_eq!(resolve(&record, "personal_profile.full_name"), None);
        assert_eq!(resolve(&record, "missing.deeper.path"), None);
        assert_eq!(resolve(&record, "notes.funeral"), None);
        assert_eq!(resolve(&record, ""), None);
        assert_eq!(resolve(&record, "notes..x"), None);
    }

    #[test]
    fn test_resolve_array_index() {
        let record = json!({"pets": [{"name": "Rex"}]});
        assert_eq!(resolve(&record, "pets.0.name"), Some(&json!("Rex")));
        assert_eq!(resolve(&record, "pets.3.name"), None);
        assert_eq!(resolve(&record, "pets.first.name"), None);
    }

    #[test]
    fn test_is_allowed_substring_case_insensitive() {
        assert!(!is_allowed("personal_profile.ssn"));
        assert!(!is_allowed("Personal_Profile.SSN"));
        assert!(!is_allowed("personal_profile.date_of_birth"));
        assert!(!is_allowed("spouse_dob"));
        assert!(!is_allowed("DOB"));
        assert!(is_allowed("personal_profile.full_name"));
        assert!(is_allowed("personal_profile.birthplace"));
        assert!(is_allowed("businesses"));
    }

    #[test]
    fn test_resolve_allowed_blocks_denied_keys() {
        let record = json!({"personal_profile": {"ssn": "123-45-6789"}});
        assert_eq!(resolve_allowed(&record, "personal_profile.ssn"), None);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("  ")), None);
        assert_eq!(display_value(&json!(" Jane ")), Some("Jane".to_string()));
        assert_eq!(display_value(&json!(42)), Some("42".to_string()));
        assert_eq!(display_value(&json!(true)), Some("Yes".to_string()));
        assert_eq!(
            display_value(&json!(["Ann", "", "Bob"])),
            Some("Ann, Bob".to_string())
        );
        assert_eq!(display_value(&json!({"a": 1})), None);
    }

    #[test]
    fn test_redact_removes_denied_keys_recursively() {
        let record = json!({
            "personal_profile": {"full_name": "Jane", "ssn": "1", "date_of_birth": "1950-01-01"},
            "contacts": [{"name": "John", "dob": "x"}]
        });
        let cleaned = redact(&record);
        assert_eq!(
            cleaned,
            json!({"personal_profile": {"full_name": "Jane"}, "contacts": [{"name": "John"}]})
        );
    }

    #[test]
    fn test_lines_in_footprint() {
        let field = FieldSpec::text_area("notes.legal", "Legal", 4);
        assert_eq!(field.lines_in_footprint(), 4);
        assert_eq!(FieldSpec::line("a", "A").lines_in_footprint(), 1);
    }

    const SECTIONS: &[SectionSpec] = &[
        SectionSpec { id: "one", title: "One", blocks: &[] },
        SectionSpec { id: "two", title: "Two", blocks: &[] },
        SectionSpec { id: "three", title: "Three", blocks: &[] },
    ];

    const LAYOUT: DocumentLayout = DocumentLayout {
        version: LayoutVersion("test.1"),
        title: "Test",
        subtitle: "",
        sections: SECTIONS,
    };

    #[test]
    fn test_select_keeps_layout_order_and_ignores_unknown() {
        let subset = vec!["three".to_string(), "bogus".to_string(), "one".to_string()];
        let ids: Vec<&str> = LAYOUT.select(Some(&subset)).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["one", "three"]);
        assert_eq!(LAYOUT.select(None).len(), 3);
    }
}
