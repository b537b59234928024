//! The complete planner binder.

use super::common::ComposeStyle;
use super::traits::Generator;
use super::{DocumentKind, GenerationContext};
use crate::document::fields::{
    Block, DocumentLayout, FieldSpec, ItemFormat, LayoutVersion, ListSpec, SectionSpec,
};

pub const LAYOUT_VERSION: LayoutVersion = LayoutVersion("plan-binder.2024-06");

const CONTACT_CAP: usize = 12;
const ASSET_CAP: usize = 10;

pub const PLAN_BINDER_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        id: "personal",
        title: "Personal Information",
        blocks: &[
            Block::Field(FieldSpec::line("personal_profile.full_name", "Full legal name")),
            Block::Field(FieldSpec::line("personal_profile.preferred_name", "Preferred name")),
            Block::Field(FieldSpec::line("personal_profile.birthplace", "Place of birth")),
            Block::Field(FieldSpec::line("personal_profile.marital_status", "Marital status")),
            Block::Field(FieldSpec::line("personal_profile.address", "Home address")),
            Block::Field(FieldSpec::line("personal_profile.phone", "Phone")),
            Block::Field(FieldSpec::line("personal_profile.email", "Email")),
            Block::Field(FieldSpec::line("personal_profile.religion", "Religion or faith")),
        ],
    },
    SectionSpec {
        id: "family",
        title: "Family",
        blocks: &[
            Block::Field(FieldSpec::line("personal_profile.spouse_name", "Spouse or partner")),
            Block::Field(FieldSpec::text_area("personal_profile.children_names", "Children", 2)),
            Block::Field(FieldSpec::text_area("personal_profile.parents_names", "Parents", 2)),
            Block::Field(FieldSpec::text_area("personal_profile.siblings_names", "Siblings", 2)),
        ],
    },
    SectionSpec {
        id: "military",
        title: "Military Service",
        blocks: &[
            Block::Field(FieldSpec::line("personal_profile.military_branch", "Branch")),
            Block::Field(FieldSpec::line("personal_profile.military_rank", "Rank")),
            Block::Field(FieldSpec::line("personal_profile.service_dates", "Dates of service")),
            Block::Field(FieldSpec::line("personal_profile.discharge", "Discharge papers location")),
        ],
    },
    SectionSpec {
        id: "contacts",
        title: "People to Notify",
        blocks: &[
            Block::List(ListSpec::new(
                "notify_contacts",
                "Family and friends",
                CONTACT_CAP,
                ItemFormat::Contact,
            )),
            Block::List(ListSpec::new(
                "professional_contacts",
                "Professionals (attorney, advisor, executor)",
                CONTACT_CAP,
                ItemFormat::Contact,
            )),
        ],
    },
    SectionSpec {
        id: "funeral",
        title: "Funeral and Memorial Wishes",
        blocks: &[
            Block::Field(FieldSpec::line("funeral_preferences.disposition", "Burial or cremation")),
            Block::Field(FieldSpec::line("funeral_preferences.service_type", "Type of service")),
            Block::Field(FieldSpec::line("funeral_preferences.location", "Location")),
            Block::Field(FieldSpec::line("funeral_preferences.officiant", "Officiant")),
            Block::Field(FieldSpec::text_area("funeral_preferences.music", "Music", 2)),
            Block::Field(FieldSpec::text_area("funeral_preferences.readings", "Readings", 2)),
            Block::Field(FieldSpec::text_area("funeral_preferences.obituary_notes", "Obituary notes", 4)),
            Block::Field(FieldSpec::text_area("notes.funeral", "Other wishes", 6)),
        ],
    },
    SectionSpec {
        id: "financial",
        title: "Financial Accounts",
        blocks: &[
            Block::List(ListSpec::new(
                "bank_accounts",
                "Bank accounts",
                ASSET_CAP,
                ItemFormat::Join(&["institution", "account_type", "location"]),
            )),
            Block::List(ListSpec::new(
                "investments",
                "Investments and retirement",
                ASSET_CAP,
                ItemFormat::Join(&["institution", "account_type", "advisor"]),
            )),
            Block::List(ListSpec::new(
                "debts",
                "Debts and loans",
                ASSET_CAP,
                ItemFormat::Join(&["creditor", "debt_type", "amount"]),
            )),
            Block::List(ListSpec::new(
                "insurance_policies",
                "Insurance policies",
                ASSET_CAP,
                ItemFormat::Join(&["provider", "policy_type", "beneficiary", "agent"]),
            )),
            Block::Field(FieldSpec::text_area("notes.financial", "Financial notes", 4)),
        ],
    },
    SectionSpec {
        id: "property",
        title: "Property and Vehicles",
        blocks: &[
            Block::List(ListSpec::new(
                "properties",
                "Real estate",
                ASSET_CAP,
                ItemFormat::Join(&["address", "property_type", "ownership"]),
            )),
            Block::List(ListSpec::new(
                "vehicles",
                "Vehicles",
                ASSET_CAP,
                ItemFormat::Join(&["year", "make", "model", "title_location"]),
            )),
            Block::Field(FieldSpec::text_area("notes.property", "Property notes", 4)),
        ],
    },
    SectionSpec {
        id: "pets",
        title: "Pets",
        blocks: &[
            Block::List(ListSpec::new(
                "pets",
                "Pets and their caretakers",
                ASSET_CAP,
                ItemFormat::Join(&["name", "species", "caretaker", "instructions"]),
            )),
            Block::Field(FieldSpec::text_area("notes.pets", "Care instructions", 4)),
        ],
    },
    SectionSpec {
        id: "business",
        title: "Business Interests",
        blocks: &[Block::List(ListSpec::new(
            "businesses",
            "Businesses",
            ASSET_CAP,
            ItemFormat::Join(&["name", "role", "ownership", "contact"]),
        ))],
    },
    SectionSpec {
        id: "digital",
        title: "Digital Life",
        blocks: &[
            Block::List(ListSpec::new(
                "social_accounts",
                "Online accounts",
                ASSET_CAP,
                ItemFormat::Join(&["platform", "username", "wishes"]),
            )),
            Block::List(ListSpec::new(
                "phones",
                "Phones and devices",
                ASSET_CAP,
                ItemFormat::Join(&["carrier", "owner", "unlock_location"]),
            )),
            Block::Field(FieldSpec::text_area("notes.digital", "Digital notes", 4)),
        ],
    },
    SectionSpec {
        id: "legal",
        title: "Legal Documents",
        blocks: &[Block::Field(FieldSpec::text_area(
            "notes.legal",
            "Will, trusts and powers of attorney",
            6,
        ))],
    },
    SectionSpec {
        id: "messages",
        title: "Messages to Loved Ones",
        blocks: &[Block::Field(FieldSpec::text_area("notes.messages", "Messages", 12))],
    },
    SectionSpec {
        id: "instructions",
        title: "Final Instructions",
        blocks: &[Block::Field(FieldSpec::text_area(
            "notes.instructions",
            "Instructions for my family",
            10,
        ))],
    },
];

pub static PLAN_BINDER_LAYOUT: DocumentLayout = DocumentLayout {
    version: LAYOUT_VERSION,
    title: "My End-of-Life Plan",
    subtitle: "Wishes, contacts and important information for the people I love",
    sections: PLAN_BINDER_SECTIONS,
};

pub struct PlanBinderGenerator;

impl Generator for PlanBinderGenerator {
    fn kind(&self) -> DocumentKind {
        DocumentKind::PlanBinder
    }

    fn layout(&self) -> &'static DocumentLayout {
        &PLAN_BINDER_LAYOUT
    }

    fn style(&self, ctx: &GenerationContext<'_>) -> ComposeStyle {
        ComposeStyle {
            contents: ctx.config.features.table_of_contents,
            page_per_section: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComposerConfig;
    use crate::document::fields::is_allowed;
    use crate::document::generators::GenerateOptions;
    use crate::document::layout::PageKind;
    use chrono::NaiveDate;
    use serde_json::json;

    fn ctx(config: &ComposerConfig) -> GenerationContext<'_> {
        GenerationContext {
            config,
            logo: None,
            generated_on: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        }
    }

    #[test]
    fn test_layout_never_names_denied_keys() {
        for section in PLAN_BINDER_SECTIONS {
            for block in section.blocks {
                match block {
                    Block::Field(f) => assert!(is_allowed(f.key), "{}", f.key),
                    Block::List(l) => assert!(is_allowed(l.key), "{}", l.key),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_contents_page_follows_cover() {
        let config = ComposerConfig::default();
        let doc = PlanBinderGenerator.compose(&json!({}), &GenerateOptions::default(), &ctx(&config));
        assert_eq!(doc.pages[0].kind, PageKind::Cover);
        assert_eq!(doc.pages[1].kind, PageKind::Contents);
        assert_eq!(
            doc.section_ids(),
            vec![
                "personal", "family", "military", "contacts", "funeral", "financial",
                "property", "pets", "business", "digital", "legal", "messages", "instructions",
            ]
        );
        assert!(doc.page_text(1).contains("Personal Information"));
    }

    #[test]
    fn test_contents_page_disabled_by_flag() {
        let mut config = ComposerConfig::default();
        config.features.table_of_contents = false;
        let doc = PlanBinderGenerator.compose(&json!({}), &GenerateOptions::default(), &ctx(&config));
        assert!(doc.pages.iter().all(|p| p.kind != PageKind::Contents));
    }

    #[test]
    fn test_section_subset_keeps_binder_order() {
        let config = ComposerConfig::default();
        let options = GenerateOptions {
            draft: false,
            sections: Some(vec!["pets".into(), "unknown".into(), "personal".into()]),
        };
        let doc = PlanBinderGenerator.compose(&json!({}), &options, &ctx(&config));
        assert_eq!(doc.section_ids(), vec!["personal", "pets"]);
    }
}
