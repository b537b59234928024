//! Printable checklists. Mostly static text; the after-death checklist also
//! pulls in the people to call.

use super::traits::Generator;
use super::DocumentKind;
use crate::document::fields::{
    Block, DocumentLayout, FieldSpec, ItemFormat, LayoutVersion, ListSpec, SectionSpec,
};

pub const PRE_PLANNING_VERSION: LayoutVersion = LayoutVersion("pre-planning-checklist.2024-06");
pub const AFTER_DEATH_VERSION: LayoutVersion = LayoutVersion("after-death-checklist.2024-06");

pub const PRE_PLANNING_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        id: "documents",
        title: "Gather Important Documents",
        blocks: &[Block::Checklist(&[
            "Birth certificate and marriage or divorce records",
            "Will, trust documents and any codicils",
            "Durable power of attorney and healthcare directive",
            "Insurance policies and beneficiary designations",
            "Deeds, titles and recent account statements",
            "Military discharge papers (DD-214), if applicable",
        ])],
    },
    SectionSpec {
        id: "decisions",
        title: "Make Key Decisions",
        blocks: &[Block::Checklist(&[
            "Choose an executor and a backup executor",
            "Decide between burial and cremation",
            "Choose who will care for pets",
            "Decide what should happen to online accounts",
            "Name guardians for minor children",
        ])],
    },
    SectionSpec {
        id: "conversations",
        title: "Have the Conversations",
        blocks: &[
            Block::Paragraph(
                "Share where this plan is kept with at least one person you trust. \
                 Walk your executor through your wishes while you can answer questions.",
            ),
            Block::Checklist(&[
                "Tell my executor where to find this plan",
                "Discuss funeral wishes with family",
                "Review beneficiaries with my financial advisor",
                "Meet with an estate attorney",
            ]),
        ],
    },
    SectionSpec {
        id: "storage",
        title: "Store and Review",
        blocks: &[
            Block::Checklist(&[
                "Keep originals in a fireproof safe or safe deposit box",
                "Give copies to my executor and attorney",
                "Review this plan every year and after major life events",
            ]),
            Block::Field(FieldSpec::line("notes.instructions", "Plan is stored at")),
        ],
    },
];

pub const AFTER_DEATH_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        id: "first-24-hours",
        title: "The First 24 Hours",
        blocks: &[Block::Checklist(&[
            "Obtain a legal pronouncement of death",
            "Notify close family and friends",
            "Contact the funeral home",
            "Secure the home, vehicles and valuables",
            "Arrange care for pets and dependents",
        ])],
    },
    SectionSpec {
        id: "people-to-call",
        title: "People to Call",
        blocks: &[
            Block::List(ListSpec::new(
                "notify_contacts",
                "Family and friends",
                15,
                ItemFormat::Contact,
            )),
            Block::List(ListSpec::new(
                "professional_contacts",
                "Professionals",
                8,
                ItemFormat::Contact,
            )),
        ],
    },
    SectionSpec {
        id: "first-week",
        title: "The First Week",
        blocks: &[Block::Checklist(&[
            "Order certified copies of the death certificate (10 or more)",
            "Locate the will and contact the executor",
            "Notify the employer and request benefits information",
            "Plan the funeral or memorial service",
            "Write and publish the obituary",
        ])],
    },
    SectionSpec {
        id: "first-month",
        title: "The First Month",
        blocks: &[Block::Checklist(&[
            "Notify Social Security and pension providers",
            "Contact banks, credit card issuers and lenders",
            "File life insurance claims",
            "Notify the Department of Veterans Affairs, if applicable",
            "Cancel or transfer utilities and subscriptions",
            "Forward mail and notify the post office",
        ])],
    },
    SectionSpec {
        id: "ongoing",
        title: "Over the Following Months",
        blocks: &[Block::Checklist(&[
            "Memorialize or close social media accounts",
            "Transfer vehicle titles and property deeds",
            "File final income tax returns",
            "Close remaining accounts once the estate is settled",
        ])],
    },
];

pub static PRE_PLANNING_LAYOUT: DocumentLayout = DocumentLayout {
    version: PRE_PLANNING_VERSION,
    title: "Pre-Planning Checklist",
    subtitle: "Steps to complete while you can",
    sections: PRE_PLANNING_SECTIONS,
};

pub static AFTER_DEATH_LAYOUT: DocumentLayout = DocumentLayout {
    version: AFTER_DEATH_VERSION,
    title: "After-Death Checklist",
    subtitle: "A step-by-step guide for the people handling my affairs",
    sections: AFTER_DEATH_SECTIONS,
};

pub struct PrePlanningChecklistGenerator;

impl Generator for PrePlanningChecklistGenerator {
    fn kind(&self) -> DocumentKind {
        DocumentKind::PrePlanningChecklist
    }

    fn layout(&self) -> &'static DocumentLayout {
        &PRE_PLANNING_LAYOUT
    }
}

pub struct AfterDeathChecklistGenerator;

impl Generator for AfterDeathChecklistGenerator {
    fn kind(&self) -> DocumentKind {
        DocumentKind::AfterDeathChecklist
    }

    fn layout(&self) -> &'static DocumentLayout {
        &AFTER_DEATH_LAYOUT
    }
}
