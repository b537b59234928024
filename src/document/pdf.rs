//! PDF serialization of a [`ComposedDocument`] with `lopdf`.
//!
//! Uses the standard Type1 Helvetica faces with WinAnsi encoding, so no font
//! programs are embedded. Content streams are left uncompressed.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use thiserror::Error;

use super::assets::LogoImage;
use super::layout::{ComposedDocument, DrawOp, Page, PAGE_HEIGHT, PAGE_WIDTH};
use super::text::{measure, to_win_ansi, FontFace};

const LOGO_RESOURCE: &str = "Im1";
const WATERMARK_SIZE: f32 = 96.0;
const WATERMARK_GRAY: f32 = 0.88;
const PRODUCER: &str = "legacy-planner-server";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to encode PDF: {0}")]
    Encode(#[from] lopdf::Error),
    #[error("failed to write PDF: {0}")]
    Write(#[from] std::io::Error),
}

fn pdf_string(text: &str) -> Object {
    Object::String(to_win_ansi(text), StringFormat::Literal)
}

fn flip(y: f32) -> f32 {
    PAGE_HEIGHT - y
}

fn text_ops(ops: &mut Vec<Operation>, x: f32, y: f32, face: FontFace, size: f32, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![face.resource_name().into(), size.into()],
    ));
    ops.push(Operation::new("Td", vec![x.into(), flip(y).into()]));
    ops.push(Operation::new("Tj", vec![pdf_string(text)]));
    ops.push(Operation::new("ET", vec![]));
}

fn watermark_ops(ops: &mut Vec<Operation>, text: &str) {
    let angle = std::f32::consts::FRAC_PI_4;
    let (sin, cos) = angle.sin_cos();
    let half = measure(text, FontFace::Bold, WATERMARK_SIZE) / 2.0;
    let x = PAGE_WIDTH / 2.0 - half * cos;
    let y = PAGE_HEIGHT / 2.0 - half * sin;

    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new("g", vec![WATERMARK_GRAY.into()]));
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![FontFace::Bold.resource_name().into(), WATERMARK_SIZE.into()],
    ));
    ops.push(Operation::new(
        "Tm",
        vec![
            cos.into(),
            sin.into(),
            (-sin).into(),
            cos.into(),
            x.into(),
            y.into(),
        ],
    ));
    ops.push(Operation::new("Tj", vec![pdf_string(text)]));
    ops.push(Operation::new("ET", vec![]));
    ops.push(Operation::new("Q", vec![]));
}

fn page_operations(page: &Page) -> Vec<Operation> {
    let mut ops = Vec::new();

    // watermark first so page content is drawn over it
    for op in &page.ops {
        if let DrawOp::Watermark { text } = op {
            watermark_ops(&mut ops, text);
        }
    }

    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                face,
                size,
                text,
            } => text_ops(&mut ops, *x, *y, *face, *size, text),
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                width,
            } => {
                ops.push(Operation::new("w", vec![(*width).into()]));
                ops.push(Operation::new("m", vec![(*x1).into(), flip(*y1).into()]));
                ops.push(Operation::new("l", vec![(*x2).into(), flip(*y2).into()]));
                ops.push(Operation::new("S", vec![]));
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
            } => {
                ops.push(Operation::new("w", vec![0.8.into()]));
                ops.push(Operation::new(
                    "re",
                    vec![
                        (*x).into(),
                        flip(*y + *height).into(),
                        (*width).into(),
                        (*height).into(),
                    ],
                ));
                ops.push(Operation::new("S", vec![]));
            }
            DrawOp::Image {
                x,
                y,
                width,
                height,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        (*width).into(),
                        0.into(),
                        0.into(),
                        (*height).into(),
                        (*x).into(),
                        flip(*y + *height).into(),
                    ],
                ));
                ops.push(Operation::new("Do", vec![LOGO_RESOURCE.into()]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawOp::Watermark { .. } => {}
        }
    }
    ops
}

fn font_resources() -> Dictionary {
    let mut fonts = Dictionary::new();
    for face in [FontFace::Regular, FontFace::Bold, FontFace::Oblique] {
        fonts.set(
            face.resource_name(),
            dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_font(),
                "Encoding" => "WinAnsiEncoding",
            },
        );
    }
    fonts
}

fn logo_xobject(doc: &mut Document, logo: &LogoImage) -> ObjectId {
    doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => logo.width_px as i64,
            "Height" => logo.height_px as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        logo.rgb.clone(),
    ))
}

/// Serialize every page in order.
pub fn render(composed: &ComposedDocument) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let fonts_id = doc.add_object(font_resources());

    let uses_logo = composed
        .pages
        .iter()
        .flat_map(|p| p.ops.iter())
        .any(|op| matches!(op, DrawOp::Image { .. }));
    let logo_id = match (&composed.logo, uses_logo) {
        (Some(logo), true) => Some(logo_xobject(&mut doc, logo)),
        _ => None,
    };

    let mut kids: Vec<Object> = Vec::with_capacity(composed.pages.len());
    for page in &composed.pages {
        let content = Content {
            operations: page_operations(page),
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

        let mut resources = dictionary! { "Font" => fonts_id };
        if let Some(id) = logo_id {
            resources.set("XObject", dictionary! { LOGO_RESOURCE => id });
        }

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => pdf_string(&composed.title),
        "Producer" => pdf_string(PRODUCER),
        "Creator" => pdf_string(PRODUCER),
        "LayoutVersion" => pdf_string(composed.layout_version.as_str()),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fields::LayoutVersion;
    use crate::document::layout::{Cover, FinishOptions, PageComposer};

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|window| window == needle.as_bytes())
    }

    fn sample(draft: bool, logo: Option<LogoImage>) -> ComposedDocument {
        let mut c = PageComposer::new("Sample", "Acme Planning", LayoutVersion("test.1"), logo);
        c.cover_page(&Cover {
            title: "Sample",
            subtitle: "Subtitle",
            prepared_for: Some("Jane Doe".to_string()),
            generated_on: "January 1, 2025".to_string(),
            provider: "Acme Planning",
        });
        c.start_page();
        c.text_line(0.0, "Body text", FontFace::Regular, 10.0);
        c.finish(&FinishOptions { draft })
    }

    #[test]
    fn test_render_produces_loadable_pdf() {
        let bytes = render(&sample(false, None)).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 2);
        assert!(contains(&bytes, "(Jane Doe)"));
        assert!(contains(&bytes, "(Page 2 of 2)"));
        assert!(!contains(&bytes, "(DRAFT)"));
    }

    #[test]
    fn test_render_draft_watermark() {
        let bytes = render(&sample(true, None)).unwrap();
        assert!(contains(&bytes, "(DRAFT)"));
    }

    #[test]
    fn test_render_embeds_logo_xobject() {
        let logo = LogoImage {
            width_px: 2,
            height_px: 1,
            rgb: vec![0, 0, 0, 255, 255, 255],
        };
        let bytes = render(&sample(false, Some(logo))).unwrap();
        assert!(contains(&bytes, "/Im1"));
        assert!(contains(&bytes, "/DeviceRGB"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let doc = sample(false, None);
        assert_eq!(render(&doc).unwrap(), render(&doc).unwrap());
    }
}
