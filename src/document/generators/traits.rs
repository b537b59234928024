//! Trait for generator system standardization.

use serde_json::Value;

use super::common::{compose_layout, document_filename, ComposeStyle};
use super::{DocumentKind, GenerateOptions, GeneratedDocument, GenerationContext, GeneratorError};
use crate::document::fields::DocumentLayout;
use crate::document::format::format_long_date;
use crate::document::layout::ComposedDocument;
use crate::document::pdf;

/// A printable document type.
pub trait Generator: Send + Sync {
    fn kind(&self) -> DocumentKind;

    fn layout(&self) -> &'static DocumentLayout;

    fn style(&self, _ctx: &GenerationContext<'_>) -> ComposeStyle {
        ComposeStyle::default()
    }

    /// Lay out the document in memory. Pure and synchronous.
    fn compose(
        &self,
        data: &Value,
        options: &GenerateOptions,
        ctx: &GenerationContext<'_>,
    ) -> ComposedDocument {
        compose_layout(self.layout(), data, options, ctx, self.style(ctx))
    }

    /// Compose and serialize to PDF.
    fn generate(
        &self,
        data: &Value,
        options: &GenerateOptions,
        ctx: &GenerationContext<'_>,
    ) -> Result<GeneratedDocument, GeneratorError> {
        let composed = self.compose(data, options, ctx);
        let pdf = pdf::render(&composed)?;
        log::debug!(
            "Generated {} with {} pages ({} bytes)",
            self.kind(),
            composed.page_count(),
            pdf.len()
        );

        Ok(GeneratedDocument {
            filename: document_filename(self.kind(), data),
            pdf,
            page_count: composed.page_count(),
            generated_on: format_long_date(ctx.generated_on),
        })
    }
}
