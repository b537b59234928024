//! Will preparation documents: a summary of the plan, a blank outline to
//! work through, and a packet to bring to the attorney.

use super::common::ComposeStyle;
use super::traits::Generator;
use super::{DocumentKind, GenerationContext};
use crate::document::fields::{
    Block, DocumentLayout, FieldSpec, ItemFormat, LayoutVersion, ListSpec, SectionSpec,
};

pub const SUMMARY_VERSION: LayoutVersion = LayoutVersion("will-prep-summary.2024-06");
pub const OUTLINE_VERSION: LayoutVersion = LayoutVersion("will-prep-outline.2024-06");
pub const ATTORNEY_PACKET_VERSION: LayoutVersion = LayoutVersion("attorney-packet.2024-06");

const DISCLAIMER: &str = "This document helps you organize information before meeting \
with an attorney. It is not a will and has no legal effect.";

const TESTATOR: Block = Block::Field(FieldSpec::line("personal_profile.full_name", "Testator"));
const ADDRESS: Block = Block::Field(FieldSpec::line("personal_profile.address", "Residence"));
const SPOUSE: Block = Block::Field(FieldSpec::line("personal_profile.spouse_name", "Spouse"));
const CHILDREN: Block =
    Block::Field(FieldSpec::text_area("personal_profile.children_names", "Children", 2));

const ASSET_LISTS: &[Block] = &[
    Block::List(ListSpec::new(
        "properties",
        "Real estate",
        8,
        ItemFormat::Join(&["address", "property_type", "ownership"]),
    )),
    Block::List(ListSpec::new(
        "bank_accounts",
        "Bank accounts",
        8,
        ItemFormat::Join(&["institution", "account_type"]),
    )),
    Block::List(ListSpec::new(
        "investments",
        "Investments",
        8,
        ItemFormat::Join(&["institution", "account_type"]),
    )),
    Block::List(ListSpec::new(
        "vehicles",
        "Vehicles",
        6,
        ItemFormat::Join(&["year", "make", "model"]),
    )),
    Block::List(ListSpec::new(
        "businesses",
        "Business interests",
        6,
        ItemFormat::Join(&["name", "ownership"]),
    )),
];

pub const SUMMARY_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        id: "about",
        title: "About This Summary",
        blocks: &[Block::Paragraph(DISCLAIMER)],
    },
    SectionSpec {
        id: "testator",
        title: "Person Making the Will",
        blocks: &[TESTATOR, ADDRESS, SPOUSE, CHILDREN],
    },
    SectionSpec {
        id: "fiduciaries",
        title: "Executor and Advisors",
        blocks: &[Block::List(ListSpec::new(
            "professional_contacts",
            "Named professionals",
            8,
            ItemFormat::Contact,
        ))],
    },
    SectionSpec {
        id: "assets",
        title: "Assets",
        blocks: ASSET_LISTS,
    },
    SectionSpec {
        id: "wishes",
        title: "Stated Wishes",
        blocks: &[
            Block::Field(FieldSpec::text_area("notes.legal", "Legal notes", 6)),
            Block::Field(FieldSpec::text_area("notes.pets", "Pet care", 3)),
        ],
    },
];

pub const OUTLINE_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        id: "about",
        title: "How to Use This Outline",
        blocks: &[
            Block::Paragraph(DISCLAIMER),
            Block::Paragraph(
                "Work through each article below. Where your plan already holds an answer it \
                 is filled in; otherwise write your answer on the lines provided.",
            ),
        ],
    },
    SectionSpec {
        id: "identification",
        title: "Article I: Identification",
        blocks: &[TESTATOR, ADDRESS, SPOUSE, CHILDREN],
    },
    SectionSpec {
        id: "executor",
        title: "Article II: Executor",
        blocks: &[
            Block::Paragraph("Name the person who will carry out your will, and an alternate."),
            Block::Field(FieldSpec::line("will_preparation.executor", "Executor")),
            Block::Field(FieldSpec::line("will_preparation.alternate_executor", "Alternate executor")),
        ],
    },
    SectionSpec {
        id: "guardianship",
        title: "Article III: Guardianship",
        blocks: &[
            Block::Field(FieldSpec::line("will_preparation.guardian", "Guardian for minor children")),
            Block::Field(FieldSpec::line("will_preparation.alternate_guardian", "Alternate guardian")),
        ],
    },
    SectionSpec {
        id: "bequests",
        title: "Article IV: Specific Gifts",
        blocks: &[Block::Field(FieldSpec::text_area(
            "will_preparation.specific_gifts",
            "Item and recipient",
            8,
        ))],
    },
    SectionSpec {
        id: "residuary",
        title: "Article V: Remainder of the Estate",
        blocks: &[Block::Field(FieldSpec::text_area(
            "will_preparation.residuary",
            "Who receives everything else",
            4,
        ))],
    },
    SectionSpec {
        id: "signing",
        title: "Article VI: Signing",
        blocks: &[Block::Checklist(&[
            "Sign in front of two adult witnesses who are not beneficiaries",
            "Have the will notarized with a self-proving affidavit, if available",
            "Store the original where your executor can find it",
        ])],
    },
];

pub const ATTORNEY_PACKET_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        id: "client",
        title: "Client Information",
        blocks: &[
            TESTATOR,
            ADDRESS,
            Block::Field(FieldSpec::line("personal_profile.phone", "Phone")),
            Block::Field(FieldSpec::line("personal_profile.email", "Email")),
            Block::Field(FieldSpec::line("personal_profile.marital_status", "Marital status")),
        ],
    },
    SectionSpec {
        id: "family",
        title: "Family",
        blocks: &[
            SPOUSE,
            CHILDREN,
            Block::Field(FieldSpec::text_area("personal_profile.parents_names", "Parents", 2)),
        ],
    },
    SectionSpec {
        id: "assets",
        title: "Assets",
        blocks: ASSET_LISTS,
    },
    SectionSpec {
        id: "liabilities",
        title: "Debts and Insurance",
        blocks: &[
            Block::List(ListSpec::new(
                "debts",
                "Debts",
                8,
                ItemFormat::Join(&["creditor", "debt_type", "amount"]),
            )),
            Block::List(ListSpec::new(
                "insurance_policies",
                "Insurance",
                8,
                ItemFormat::Join(&["provider", "policy_type", "beneficiary"]),
            )),
        ],
    },
    SectionSpec {
        id: "advisors",
        title: "Current Advisors",
        blocks: &[Block::List(ListSpec::new(
            "professional_contacts",
            "Advisors",
            8,
            ItemFormat::Contact,
        ))],
    },
    SectionSpec {
        id: "questions",
        title: "Questions for the Attorney",
        blocks: &[
            Block::Checklist(&[
                "Do I need a trust in addition to a will?",
                "How are my retirement accounts and life insurance passed on?",
                "Should I update my power of attorney and healthcare directive?",
                "What happens to property I own in another state?",
            ]),
            Block::Field(FieldSpec::text_area("notes.legal", "My notes", 6)),
        ],
    },
];

pub static SUMMARY_LAYOUT: DocumentLayout = DocumentLayout {
    version: SUMMARY_VERSION,
    title: "Will Preparation Summary",
    subtitle: "What my plan says, organized for my will",
    sections: SUMMARY_SECTIONS,
};

pub static OUTLINE_LAYOUT: DocumentLayout = DocumentLayout {
    version: OUTLINE_VERSION,
    title: "Will Preparation Outline",
    subtitle: "A worksheet, article by article",
    sections: OUTLINE_SECTIONS,
};

pub static ATTORNEY_PACKET_LAYOUT: DocumentLayout = DocumentLayout {
    version: ATTORNEY_PACKET_VERSION,
    title: "Attorney Packet",
    subtitle: "Information to bring to my estate planning appointment",
    sections: ATTORNEY_PACKET_SECTIONS,
};

pub struct WillPrepSummaryGenerator;

impl Generator for WillPrepSummaryGenerator {
    fn kind(&self) -> DocumentKind {
        DocumentKind::WillPrepSummary
    }

    fn layout(&self) -> &'static DocumentLayout {
        &SUMMARY_LAYOUT
    }
}

pub struct WillPrepOutlineGenerator;

impl Generator for WillPrepOutlineGenerator {
    fn kind(&self) -> DocumentKind {
        DocumentKind::WillPrepOutline
    }

    fn layout(&self) -> &'static DocumentLayout {
        &OUTLINE_LAYOUT
    }

    fn style(&self, _ctx: &GenerationContext<'_>) -> ComposeStyle {
        ComposeStyle {
            contents: false,
            page_per_section: true,
        }
    }
}

pub struct AttorneyPacketGenerator;

impl Generator for AttorneyPacketGenerator {
    fn kind(&self) -> DocumentKind {
        DocumentKind::AttorneyPacket
    }

    fn layout(&self) -> &'static DocumentLayout {
        &ATTORNEY_PACKET_LAYOUT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComposerConfig;
    use crate::document::generators::GenerateOptions;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_outline_prefills_known_answers() {
        let config = ComposerConfig::default();
        let ctx = GenerationContext {
            config: &config,
            logo: None,
            generated_on: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        };
        let data = json!({
            "personal_profile": {"full_name": "Jane Doe"},
            "will_preparation": {"executor": "John Doe"}
        });
        let doc = WillPrepOutlineGenerator.compose(&data, &GenerateOptions::default(), &ctx);
        let text = doc.all_text();
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("John Doe"));
        // one page per article plus the cover
        assert_eq!(doc.page_count(), 1 + OUTLINE_SECTIONS.len());
    }
}
