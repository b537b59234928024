//! Short reference guide: the handful of facts a family needs first.

use super::traits::Generator;
use super::DocumentKind;
use crate::document::fields::{
    Block, DocumentLayout, FieldSpec, ItemFormat, LayoutVersion, ListSpec, SectionSpec,
};

pub const LAYOUT_VERSION: LayoutVersion = LayoutVersion("reference-guide.2024-06");

pub const REFERENCE_GUIDE_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        id: "key-contacts",
        title: "Key Contacts",
        blocks: &[
            Block::List(ListSpec::new(
                "professional_contacts",
                "Executor, attorney and advisors",
                5,
                ItemFormat::Contact,
            )),
            Block::List(ListSpec::new(
                "notify_contacts",
                "Call first",
                5,
                ItemFormat::Contact,
            )),
        ],
    },
    SectionSpec {
        id: "wishes",
        title: "Funeral Wishes at a Glance",
        blocks: &[
            Block::Field(FieldSpec::line("funeral_preferences.disposition", "Burial or cremation")),
            Block::Field(FieldSpec::line("funeral_preferences.service_type", "Service")),
            Block::Field(FieldSpec::line("funeral_preferences.location", "Location")),
        ],
    },
    SectionSpec {
        id: "where-to-find",
        title: "Where to Find Things",
        blocks: &[
            Block::Field(FieldSpec::line("personal_profile.discharge", "Military papers")),
            Block::Field(FieldSpec::text_area("notes.legal", "Will and legal documents", 3)),
            Block::Field(FieldSpec::text_area("notes.instructions", "Other instructions", 4)),
        ],
    },
    SectionSpec {
        id: "accounts",
        title: "Accounts Summary",
        blocks: &[
            Block::List(ListSpec::new(
                "bank_accounts",
                "Banks",
                4,
                ItemFormat::Join(&["institution", "account_type"]),
            )),
            Block::List(ListSpec::new(
                "insurance_policies",
                "Insurance",
                4,
                ItemFormat::Join(&["provider", "policy_type"]),
            )),
            Block::List(ListSpec::new(
                "pets",
                "Pets",
                4,
                ItemFormat::Join(&["name", "caretaker"]),
            )),
        ],
    },
];

pub static REFERENCE_GUIDE_LAYOUT: DocumentLayout = DocumentLayout {
    version: LAYOUT_VERSION,
    title: "Quick Reference Guide",
    subtitle: "The essentials, on a few pages",
    sections: REFERENCE_GUIDE_SECTIONS,
};

pub struct ReferenceGuideGenerator;

impl Generator for ReferenceGuideGenerator {
    fn kind(&self) -> DocumentKind {
        DocumentKind::ReferenceGuide
    }

    fn layout(&self) -> &'static DocumentLayout {
        &REFERENCE_GUIDE_LAYOUT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComposerConfig;
    use crate::document::generators::{GenerateOptions, GenerationContext};
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    #[test]
    fn test_call_first_list_is_capped() {
        let config = ComposerConfig::default();
        let ctx = GenerationContext {
            config: &config,
            logo: None,
            generated_on: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };
        let contacts: Vec<Value> = (1..=7)
            .map(|i| json!({"name": format!("Friend {}", i), "contact": "555-0000"}))
            .collect();
        let data = json!({"notify_contacts": contacts});

        let doc = ReferenceGuideGenerator.compose(&data, &GenerateOptions::default(), &ctx);
        let text = doc.all_text();
        assert!(text.contains("Friend 5 - 555-0000"));
        assert!(!text.contains("Friend 6"));
        assert!(text.contains("and 2 more"));
    }
}
