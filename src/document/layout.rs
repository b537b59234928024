//! In-memory page model and the pagination engine.
//!
//! Pages are kept as an ordered `Vec<Page>` of drawing operations. Footer and
//! table-of-contents regions are reserved while content is emitted and
//! stamped in a second pass by [`PageComposer::finish`], once the total page
//! count and every section's start page are known.
//!
//! Coordinates are in points with the origin at the top-left corner of the
//! page; `y` of a text operation is its baseline.

use serde_json::Value;

use super::assets::LogoImage;
use super::fields::{
    display_value, is_allowed, resolve, resolve_allowed, FaqEntry, FieldSpec, LayoutVersion,
    ListSpec,
};
use super::format::format_list;
use super::text::{measure, sanitize, wrap_text, FontFace};

/// US Letter.
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN_X: f32 = 54.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;
/// Cursor position right after the running header.
pub const CONTENT_TOP: f32 = 78.0;
pub const CONTENT_BOTTOM: f32 = PAGE_HEIGHT - 62.0;
const HEADER_BASELINE: f32 = 40.0;
const HEADER_RULE_Y: f32 = 48.0;
const FOOTER_BASELINE: f32 = PAGE_HEIGHT - 34.0;

pub const BODY_FONT_SIZE: f32 = 10.0;
pub const LINE_SPACING: f32 = 1.4;
const LABEL_FONT_SIZE: f32 = 9.0;
const HEADING_FONT_SIZE: f32 = 14.0;
const MARKER_FONT_SIZE: f32 = 8.0;
const FOOTER_FONT_SIZE: f32 = 8.0;
const FIELD_GAP: f32 = 6.0;
const SECTION_GAP: f32 = 14.0;
const CHECKBOX_SIZE: f32 = 9.0;
const CHECKLIST_INDENT: f32 = 18.0;
const LIST_INDENT: f32 = 10.0;
const TOC_ROW_HEIGHT: f32 = 20.0;

pub const CONTINUED_MARKER: &str = "(Continued)";
pub const WATERMARK_TEXT: &str = "DRAFT";

fn line_height(size: f32) -> f32 {
    size * LINE_SPACING
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        face: FontFace,
        size: f32,
        text: String,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
    },
    /// Stroked rectangle; `y` is the top edge.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// The document logo; `y` is the top edge.
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Diagonal text across the whole page.
    Watermark { text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Cover,
    Contents,
    Body,
}

/// Reserved table-of-contents row, filled during [`PageComposer::finish`].
#[derive(Debug, Clone, PartialEq)]
pub struct TocSlot {
    pub section_id: &'static str,
    pub title: &'static str,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub kind: PageKind,
    pub ops: Vec<DrawOp>,
    /// Left footer label; `None` means the page carries no footer.
    pub footer: Option<String>,
    pub toc: Vec<TocSlot>,
}

impl Page {
    fn new(kind: PageKind, footer: Option<String>) -> Self {
        Self {
            kind,
            ops: Vec::new(),
            footer,
            toc: Vec::new(),
        }
    }

    /// All text drawn on the page, one operation per line.
    pub fn text(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } | DrawOp::Watermark { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Start page of a rendered section (0-based page index).
#[derive(Debug, Clone, PartialEq)]
pub struct SectionStart {
    pub id: &'static str,
    pub title: &'static str,
    pub page_index: usize,
}

/// A fully laid out document, ready for [`super::pdf::render`].
#[derive(Debug, Clone)]
pub struct ComposedDocument {
    pub title: String,
    pub layout_version: LayoutVersion,
    pub pages: Vec<Page>,
    pub sections: Vec<SectionStart>,
    pub logo: Option<LogoImage>,
}

impl ComposedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_text(&self, index: usize) -> String {
        self.pages.get(index).map(Page::text).unwrap_or_default()
    }

    pub fn all_text(&self) -> String {
        self.pages
            .iter()
            .map(Page::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn section_ids(&self) -> Vec<&'static str> {
        self.sections.iter().map(|s| s.id).collect()
    }

    pub fn section_page(&self, id: &str) -> Option<usize> {
        self.sections
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.page_index)
    }
}

/// Cover page content.
#[derive(Debug, Clone)]
pub struct Cover<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub prepared_for: Option<String>,
    pub generated_on: String,
    pub provider: &'a str,
}

/// Settings for the second pass.
#[derive(Debug, Clone)]
pub struct FinishOptions {
    pub draft: bool,
}

/// Sequential writer over a [`ComposedDocument`] with a running vertical cursor.
pub struct PageComposer {
    doc: ComposedDocument,
    header_left: String,
    header_right: String,
    cursor: f32,
    on_body_page: bool,
}

impl PageComposer {
    pub fn new(
        title: &str,
        provider: &str,
        layout_version: LayoutVersion,
        logo: Option<LogoImage>,
    ) -> Self {
        Self {
            doc: ComposedDocument {
                title: sanitize(title),
                layout_version,
                pages: Vec::new(),
                sections: Vec::new(),
                logo,
            },
            header_left: sanitize(title),
            header_right: sanitize(provider),
            cursor: CONTENT_TOP,
            on_body_page: false,
        }
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn page_count(&self) -> usize {
        self.doc.pages.len()
    }

    fn page_mut(&mut self) -> &mut Page {
        if self.doc.pages.is_empty() {
            self.start_page();
        }
        let last = self.doc.pages.len() - 1;
        &mut self.doc.pages[last]
    }

    fn push_text(&mut self, x: f32, y: f32, face: FontFace, size: f32, text: &str) {
        let text = sanitize(text);
        if text.is_empty() {
            return;
        }
        self.page_mut().ops.push(DrawOp::Text {
            x,
            y,
            face,
            size,
            text,
        });
    }

    fn push_centered(&mut self, y: f32, face: FontFace, size: f32, text: &str) {
        let clean = sanitize(text);
        let x = ((PAGE_WIDTH - measure(&clean, face, size)) / 2.0).max(MARGIN_X);
        self.push_text(x, y, face, size, &clean);
    }

    fn push_rule(&mut self, x1: f32, x2: f32, y: f32, width: f32) {
        self.page_mut().ops.push(DrawOp::Line {
            x1,
            y1: y,
            x2,
            y2: y,
            width,
        });
    }

    /// Emit the cover page. Does not carry a header or footer.
    pub fn cover_page(&mut self, cover: &Cover<'_>) {
        self.doc.pages.push(Page::new(PageKind::Cover, None));
        self.on_body_page = false;

        let mut y: f32 = 150.0;
        if let Some(logo) = &self.doc.logo {
            let (width, height) = logo.fit_within(160.0, 80.0);
            let x = (PAGE_WIDTH - width) / 2.0;
            self.page_mut().ops.push(DrawOp::Image {
                x,
                y: 60.0,
                width,
                height,
            });
            y = y.max(60.0 + height + 50.0);
        }

        for line in wrap_text(cover.title, FontFace::Bold, 26.0, CONTENT_WIDTH) {
            self.push_centered(y, FontFace::Bold, 26.0, &line);
            y += line_height(26.0);
        }
        if !cover.subtitle.is_empty() {
            y += 6.0;
            for line in wrap_text(cover.subtitle, FontFace::Oblique, 13.0, CONTENT_WIDTH) {
                self.push_centered(y, FontFace::Oblique, 13.0, &line);
                y += line_height(13.0);
            }
        }

        y += 60.0;
        let label = "Prepared for:";
        let label_x = MARGIN_X + 90.0;
        self.push_text(label_x, y, FontFace::Bold, 12.0, label);
        let value_x = label_x + measure(label, FontFace::Bold, 12.0) + 8.0;
        match cover.prepared_for.as_deref().map(sanitize).filter(|s| !s.is_empty()) {
            Some(name) => self.push_text(value_x, y, FontFace::Regular, 12.0, &name),
            None => self.push_rule(value_x, PAGE_WIDTH - MARGIN_X - 90.0, y + 2.0, 0.6),
        }

        y += 28.0;
        let generated = format!("Generated on {}", cover.generated_on);
        self.push_centered(y, FontFace::Regular, 11.0, &generated);

        let provider = format!("Provided by {}", cover.provider);
        self.push_centered(PAGE_HEIGHT - 110.0, FontFace::Bold, 11.0, &provider);
        let version = format!("Layout {}", self.doc.layout_version.as_str());
        self.push_centered(PAGE_HEIGHT - 92.0, FontFace::Regular, 7.0, &version);
    }

    /// Reserve contents pages with one slot per section, continuing onto
    /// further pages when the entries do not fit on one.
    pub fn contents_page(&mut self, entries: &[(&'static str, &'static str)]) {
        let mut remaining = entries;
        let mut first = true;
        while first || !remaining.is_empty() {
            let footer = Some(self.header_right.clone());
            self.doc.pages.push(Page::new(PageKind::Contents, footer));
            self.on_body_page = false;
            self.draw_header();

            let mut y = CONTENT_TOP + HEADING_FONT_SIZE;
            self.push_text(MARGIN_X, y, FontFace::Bold, 18.0, "Table of Contents");
            if !first {
                let x = MARGIN_X + measure("Table of Contents", FontFace::Bold, 18.0) + 8.0;
                self.push_text(x, y, FontFace::Oblique, 9.0, CONTINUED_MARKER);
            }
            y += 36.0;

            let max_rows = (((CONTENT_BOTTOM - y) / TOC_ROW_HEIGHT).floor() as usize).max(1);
            let (page_entries, rest) = remaining.split_at(max_rows.min(remaining.len()));
            self.page_mut().toc = page_entries
                .iter()
                .enumerate()
                .map(|(i, &(id, title))| TocSlot {
                    section_id: id,
                    title,
                    y: y + i as f32 * TOC_ROW_HEIGHT,
                })
                .collect();

            remaining = rest;
            first = false;
        }
    }

    /// Start a body page: header redrawn, footer reserved, cursor reset.
    pub fn start_page(&mut self) {
        let footer = Some(self.header_right.clone());
        self.doc.pages.push(Page::new(PageKind::Body, footer));
        self.on_body_page = true;
        self.draw_header();
        self.cursor = CONTENT_TOP;
    }

    fn draw_header(&mut self) {
        let left = self.header_left.clone();
        let right = self.header_right.clone();
        self.push_text(MARGIN_X, HEADER_BASELINE, FontFace::Bold, 9.0, &left);
        let right_x = PAGE_WIDTH - MARGIN_X - measure(&right, FontFace::Regular, 9.0);
        self.push_text(right_x, HEADER_BASELINE, FontFace::Regular, 9.0, &right);
        self.push_rule(MARGIN_X, PAGE_WIDTH - MARGIN_X, HEADER_RULE_Y, 0.5);
    }

    /// Space left between the cursor and the bottom content margin.
    pub fn remaining(&self) -> f32 {
        if !self.on_body_page {
            return 0.0;
        }
        CONTENT_BOTTOM - self.cursor
    }

    /// Page-break policy: start a new page when `footprint` does not fit.
    /// Returns `true` if a break happened.
    pub fn ensure_space(&mut self, footprint: f32) -> bool {
        if self.remaining() < footprint {
            self.start_page();
            true
        } else {
            false
        }
    }

    pub fn section_heading(&mut self, id: &'static str, title: &'static str) {
        let footprint = line_height(HEADING_FONT_SIZE) + 8.0 + line_height(BODY_FONT_SIZE) * 2.0;
        if self.on_body_page && self.cursor > CONTENT_TOP {
            self.cursor += SECTION_GAP;
        }
        self.ensure_space(footprint);

        let page_index = self.doc.pages.len() - 1;
        self.doc.sections.push(SectionStart {
            id,
            title,
            page_index,
        });

        let baseline = self.cursor + HEADING_FONT_SIZE;
        self.push_text(MARGIN_X, baseline, FontFace::Bold, HEADING_FONT_SIZE, title);
        self.push_rule(MARGIN_X, PAGE_WIDTH - MARGIN_X, baseline + 5.0, 0.8);
        self.cursor += line_height(HEADING_FONT_SIZE) + 8.0;
    }

    /// One line of text at the cursor, breaking the page first if needed.
    pub fn text_line(&mut self, x: f32, text: &str, face: FontFace, size: f32) {
        self.ensure_space(line_height(size));
        let baseline = self.cursor + size;
        self.push_text(MARGIN_X + x, baseline, face, size, text);
        self.cursor += line_height(size);
    }

    /// Static body text wrapped to the content width, flowing across pages.
    pub fn paragraph(&mut self, text: &str, face: FontFace, size: f32) {
        for line in wrap_text(text, face, size, CONTENT_WIDTH) {
            self.text_line(0.0, &line, face, size);
        }
        self.cursor += FIELD_GAP;
    }

    /// Ruled lines standing in for an empty value.
    pub fn ruled_lines(&mut self, x: f32, width: f32, count: u8) {
        let step = line_height(BODY_FONT_SIZE);
        for _ in 0..count.max(1) {
            self.ensure_space(step);
            let y = self.cursor + step - 2.0;
            self.push_rule(MARGIN_X + x, MARGIN_X + x + width, y, 0.4);
            self.cursor += step;
        }
    }

    fn continued_marker(&mut self, x: f32) {
        let baseline = self.cursor + MARKER_FONT_SIZE;
        self.push_text(
            MARGIN_X + x,
            baseline,
            FontFace::Oblique,
            MARKER_FONT_SIZE,
            CONTINUED_MARKER,
        );
        self.cursor += line_height(MARKER_FONT_SIZE);
    }

    /// Draw one configured field from `record`.
    ///
    /// Denied keys are skipped before anything is resolved. Multi-line values
    /// that do not fit the declared footprint continue on a following page
    /// behind a `(Continued)` marker.
    pub fn field(&mut self, spec: &FieldSpec, record: &Value) {
        if !is_allowed(spec.key) {
            log::debug!("Skipping privacy-excluded field {}", spec.key);
            return;
        }
        let value = resolve(record, spec.key).and_then(display_value);

        if spec.multiline {
            self.multiline_field(spec, value.as_deref());
        } else {
            self.inline_field(spec, value.as_deref());
        }
        self.cursor += FIELD_GAP;
    }

    fn inline_field(&mut self, spec: &FieldSpec, value: Option<&str>) {
        let label = format!("{}:", spec.label);
        let label_width = measure(&sanitize(&label), FontFace::Bold, LABEL_FONT_SIZE) + 6.0;
        let value_x = spec.x + label_width;
        let value_width = (spec.width - label_width).max(40.0);
        let step = line_height(spec.font_size);

        self.ensure_space(spec.height.max(step));
        let baseline = self.cursor + spec.font_size;
        self.push_text(MARGIN_X + spec.x, baseline, FontFace::Bold, LABEL_FONT_SIZE, &label);

        let lines = value
            .map(|v| wrap_text(v, FontFace::Regular, spec.font_size, value_width))
            .unwrap_or_default();

        if lines.is_empty() {
            let y = baseline + 2.0;
            self.push_rule(
                MARGIN_X + value_x,
                MARGIN_X + spec.x + spec.width,
                y,
                0.4,
            );
            self.cursor += step;
            if spec.blank_lines > 1 {
                self.ruled_lines(spec.x, spec.width, spec.blank_lines - 1);
            }
            return;
        }

        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.ensure_space(step);
            }
            let baseline = self.cursor + spec.font_size;
            self.push_text(MARGIN_X + value_x, baseline, FontFace::Regular, spec.font_size, line);
            self.cursor += step;
        }
    }

    fn multiline_field(&mut self, spec: &FieldSpec, value: Option<&str>) {
        let label_step = line_height(LABEL_FONT_SIZE);
        let step = line_height(spec.font_size);

        self.ensure_space(label_step + spec.height);
        let baseline = self.cursor + LABEL_FONT_SIZE;
        self.push_text(MARGIN_X + spec.x, baseline, FontFace::Bold, LABEL_FONT_SIZE, spec.label);
        self.cursor += label_step;

        let lines: Vec<String> = value
            .map(|v| {
                v.split(['\n', '\r'])
                    .flat_map(|p| wrap_text(p, FontFace::Regular, spec.font_size, spec.width))
                    .collect()
            })
            .unwrap_or_default();

        if lines.is_empty() {
            self.ruled_lines(spec.x, spec.width, spec.blank_lines);
            return;
        }

        let fit = spec.lines_in_footprint().min(lines.len());
        let (head, tail) = lines.split_at(fit);
        for line in head {
            let baseline = self.cursor + spec.font_size;
            self.push_text(MARGIN_X + spec.x, baseline, FontFace::Regular, spec.font_size, line);
            self.cursor += step;
        }

        if tail.is_empty() {
            return;
        }

        self.start_page();
        self.continued_marker(spec.x);
        for line in tail {
            if self.ensure_space(step) {
                self.continued_marker(spec.x);
            }
            let baseline = self.cursor + spec.font_size;
            self.push_text(MARGIN_X + spec.x, baseline, FontFace::Regular, spec.font_size, line);
            self.cursor += step;
        }
    }

    /// Draw an array-valued field as a capped bullet list.
    pub fn list(&mut self, spec: &ListSpec, record: &Value) {
        if !is_allowed(spec.key) {
            log::debug!("Skipping privacy-excluded list {}", spec.key);
            return;
        }
        let items: &[Value] = resolve_allowed(record, spec.key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let lines = format_list(items, spec);

        let label_step = line_height(LABEL_FONT_SIZE);
        self.ensure_space(label_step + line_height(BODY_FONT_SIZE));
        let baseline = self.cursor + LABEL_FONT_SIZE;
        self.push_text(MARGIN_X, baseline, FontFace::Bold, LABEL_FONT_SIZE, spec.label);
        self.cursor += label_step;

        if lines.is_empty() {
            self.ruled_lines(LIST_INDENT, CONTENT_WIDTH - LIST_INDENT, spec.blank_lines);
            self.cursor += FIELD_GAP;
            return;
        }

        let width = CONTENT_WIDTH - LIST_INDENT * 2.0;
        for entry in lines {
            for (i, line) in wrap_text(&entry, FontFace::Regular, BODY_FONT_SIZE, width)
                .iter()
                .enumerate()
            {
                let text = if i == 0 {
                    format!("- {line}")
                } else {
                    format!("  {line}")
                };
                self.text_line(LIST_INDENT, &text, FontFace::Regular, BODY_FONT_SIZE);
            }
        }
        self.cursor += FIELD_GAP;
    }

    /// Static checklist items, each with an empty checkbox.
    pub fn checklist(&mut self, items: &[&str]) {
        let step = line_height(BODY_FONT_SIZE);
        let width = CONTENT_WIDTH - CHECKLIST_INDENT;
        for item in items {
            let lines = wrap_text(item, FontFace::Regular, BODY_FONT_SIZE, width);
            if lines.is_empty() {
                continue;
            }
            self.ensure_space(step * lines.len() as f32);
            let top = self.cursor + 1.5;
            self.page_mut().ops.push(DrawOp::Rect {
                x: MARGIN_X,
                y: top,
                width: CHECKBOX_SIZE,
                height: CHECKBOX_SIZE,
            });
            for line in &lines {
                self.text_line(CHECKLIST_INDENT, line, FontFace::Regular, BODY_FONT_SIZE);
            }
            self.cursor += 2.0;
        }
        self.cursor += FIELD_GAP;
    }

    pub fn faq(&mut self, entries: &[FaqEntry]) {
        for entry in entries {
            let question_lines = wrap_text(entry.question, FontFace::Bold, BODY_FONT_SIZE, CONTENT_WIDTH);
            self.ensure_space(line_height(BODY_FONT_SIZE) * (question_lines.len() as f32 + 1.0));
            for line in &question_lines {
                self.text_line(0.0, line, FontFace::Bold, BODY_FONT_SIZE);
            }
            self.paragraph(entry.answer, FontFace::Regular, BODY_FONT_SIZE);
        }
    }

    /// Second pass over every emitted page: footers, contents, watermark.
    pub fn finish(mut self, options: &FinishOptions) -> ComposedDocument {
        let total = self.doc.pages.len();
        let starts: Vec<SectionStart> = self.doc.sections.clone();

        for (index, page) in self.doc.pages.iter_mut().enumerate() {
            if let Some(label) = page.footer.clone() {
                stamp_footer(page, &label, index + 1, total);
            }
            if !page.toc.is_empty() {
                fill_contents(page, &starts);
            }
            if options.draft {
                page.ops.push(DrawOp::Watermark {
                    text: WATERMARK_TEXT.to_string(),
                });
            }
        }

        self.doc
    }
}

fn stamp_footer(page: &mut Page, label: &str, number: usize, total: usize) {
    page.ops.push(DrawOp::Line {
        x1: MARGIN_X,
        y1: FOOTER_BASELINE - 12.0,
        x2: PAGE_WIDTH - MARGIN_X,
        y2: FOOTER_BASELINE - 12.0,
        width: 0.4,
    });
    if !label.is_empty() {
        page.ops.push(DrawOp::Text {
            x: MARGIN_X,
            y: FOOTER_BASELINE,
            face: FontFace::Regular,
            size: FOOTER_FONT_SIZE,
            text: label.to_string(),
        });
    }
    let numbering = format!("Page {number} of {total}");
    let x = PAGE_WIDTH - MARGIN_X - measure(&numbering, FontFace::Regular, FOOTER_FONT_SIZE);
    page.ops.push(DrawOp::Text {
        x,
        y: FOOTER_BASELINE,
        face: FontFace::Regular,
        size: FOOTER_FONT_SIZE,
        text: numbering,
    });
}

fn fill_contents(page: &mut Page, starts: &[SectionStart]) {
    let slots = std::mem::take(&mut page.toc);
    for slot in &slots {
        let Some(start) = starts.iter().find(|s| s.id == slot.section_id) else {
            continue;
        };
        let title = sanitize(slot.title);
        let number = (start.page_index + 1).to_string();
        let title_width = measure(&title, FontFace::Regular, 11.0);
        let number_x = PAGE_WIDTH - MARGIN_X - measure(&number, FontFace::Regular, 11.0);

        page.ops.push(DrawOp::Text {
            x: MARGIN_X,
            y: slot.y,
            face: FontFace::Regular,
            size: 11.0,
            text: title,
        });
        page.ops.push(DrawOp::Line {
            x1: MARGIN_X + title_width + 6.0,
            y1: slot.y,
            x2: number_x - 6.0,
            y2: slot.y,
            width: 0.3,
        });
        page.ops.push(DrawOp::Text {
            x: number_x,
            y: slot.y,
            face: FontFace::Regular,
            size: 11.0,
            text: number,
        });
    }
    page.toc = slots;
}
