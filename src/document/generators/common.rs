//! Common utilities for document generation.
//!
//! Shared layout driver, block rendering and filename derivation.

use serde_json::Value;

use super::{DocumentKind, GenerateOptions, GenerationContext};
use crate::document::fields::{Block, DocumentLayout, SectionSpec};
use crate::document::format::{format_long_date, full_name, name_parts};
use crate::document::layout::{
    ComposedDocument, Cover, FinishOptions, PageComposer, BODY_FONT_SIZE,
};
use crate::document::text::{paragraphs, FontFace};

const FILENAME_PREFIX: &str = "Planner";

/// Per-generator layout switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComposeStyle {
    /// Reserve a table of contents after the cover.
    pub contents: bool,
    /// Start every section on a fresh page.
    pub page_per_section: bool,
}

/// Cover, optional contents, then every selected section in layout order.
pub fn compose_layout(
    layout: &'static DocumentLayout,
    data: &Value,
    options: &GenerateOptions,
    ctx: &GenerationContext<'_>,
    style: ComposeStyle,
) -> ComposedDocument {
    let provider = ctx.config.provider_name.as_str();
    let mut composer = PageComposer::new(layout.title, provider, layout.version, ctx.logo.clone());

    composer.cover_page(&Cover {
        title: layout.title,
        subtitle: layout.subtitle,
        prepared_for: full_name(data),
        generated_on: format_long_date(ctx.generated_on),
        provider,
    });

    let sections = layout.select(options.sections.as_deref());
    if style.contents && !sections.is_empty() {
        let entries: Vec<(&'static str, &'static str)> =
            sections.iter().map(|s| (s.id, s.title)).collect();
        composer.contents_page(&entries);
    }

    for (index, section) in sections.iter().enumerate() {
        if index == 0 || style.page_per_section {
            composer.start_page();
        }
        render_section(&mut composer, section, data);
    }

    composer.finish(&FinishOptions {
        draft: ctx.draft(options),
    })
}

pub fn render_section(composer: &mut PageComposer, section: &SectionSpec, data: &Value) {
    composer.section_heading(section.id, section.title);
    for block in section.blocks {
        match block {
            Block::Field(spec) => composer.field(spec, data),
            Block::List(spec) => composer.list(spec, data),
            Block::Checklist(items) => composer.checklist(items),
            Block::Paragraph(text) => {
                for para in paragraphs(text) {
                    composer.paragraph(&para, FontFace::Regular, BODY_FONT_SIZE);
                }
            }
            Block::Faq(entries) => composer.faq(entries),
        }
    }
}

/// Keep ASCII letters, digits and single dashes.
pub fn filename_part(raw: &str) -> String {
    let mut out = String::new();
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}

/// `Planner[-<Kind>][-<Last>][-<First>].pdf`
pub fn document_filename(kind: DocumentKind, data: &Value) -> String {
    let (first, last) = name_parts(data);
    let parts: Vec<String> = [
        Some(FILENAME_PREFIX.to_string()),
        kind.filename_label().map(str::to_string),
        last.map(|l| filename_part(&l)),
        first.map(|f| filename_part(&f)),
    ]
    .into_iter()
    .flatten()
    .filter(|p| !p.is_empty())
    .collect();

    format!("{}.pdf", parts.join("-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_binder_filename() {
        let data = json!({"personal_profile": {"first_name": "Jane", "last_name": "Doe"}});
        assert_eq!(
            document_filename(DocumentKind::PlanBinder, &data),
            "Planner-Doe-Jane.pdf"
        );
    }

    #[test]
    fn test_kind_filename_and_fallback() {
        let data = json!({"personal_profile": {"full_name": "Mary Ann O'Brien"}});
        assert_eq!(
            document_filename(DocumentKind::ReferenceGuide, &data),
            "Planner-ReferenceGuide-OBrien-Mary.pdf"
        );
        assert_eq!(document_filename(DocumentKind::PlanBinder, &json!({})), "Planner.pdf");
        assert_eq!(
            document_filename(DocumentKind::FaqSheet, &json!({})),
            "Planner-FAQ.pdf"
        );
    }

    #[test]
    fn test_filename_part_strips_unsafe_characters() {
        assert_eq!(filename_part(" Jos\u{00E9} / de la Cruz "), "Jos-de-la-Cruz");
        assert_eq!(filename_part("../../etc"), "etc");
        assert_eq!(filename_part("\u{1F600}"), "");
    }
}
