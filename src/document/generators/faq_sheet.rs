use super::traits::Generator;
use super::DocumentKind;
use crate::document::fields::{Block, DocumentLayout, FaqEntry, LayoutVersion, SectionSpec};

pub const LAYOUT_VERSION: LayoutVersion = LayoutVersion("faq-sheet.2024-06");

const PLANNING_FAQ: &[FaqEntry] = &[
    FaqEntry {
        question: "Is this plan a legal document?",
        answer: "No. It records your wishes and where things are. Your will, trusts and \
                 powers of attorney are the legal documents; this plan tells people where to find them.",
    },
    FaqEntry {
        question: "Who should get a copy?",
        answer: "Your executor, and anyone you expect to make arrangements. Shared links can be \
                 turned off at any time.",
    },
    FaqEntry {
        question: "How often should I update it?",
        answer: "Review it once a year and after any major change such as a marriage, a move, \
                 a new account or a new grandchild. Each time you sign, a new revision is recorded.",
    },
];

const PRIVACY_FAQ: &[FaqEntry] = &[
    FaqEntry {
        question: "Why is my Social Security number not printed?",
        answer: "Sensitive identifiers are never printed or shared. Keep them with your legal \
                 documents instead.",
    },
    FaqEntry {
        question: "What does the DRAFT watermark mean?",
        answer: "The document was printed before the plan was finalized or during a trial. \
                 It is still useful as a working copy.",
    },
];

pub const FAQ_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        id: "planning",
        title: "About Your Plan",
        blocks: &[Block::Faq(PLANNING_FAQ)],
    },
    SectionSpec {
        id: "privacy",
        title: "Privacy and Printing",
        blocks: &[Block::Faq(PRIVACY_FAQ)],
    },
];

pub static FAQ_LAYOUT: DocumentLayout = DocumentLayout {
    version: LAYOUT_VERSION,
    title: "Frequently Asked Questions",
    subtitle: "",
    sections: FAQ_SECTIONS,
};

pub struct FaqSheetGenerator;

impl Generator for FaqSheetGenerator {
    fn kind(&self) -> DocumentKind {
        DocumentKind::FaqSheet
    }

    fn layout(&self) -> &'static DocumentLayout {
        &FAQ_LAYOUT
    }
}
