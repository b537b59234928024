//! Generators module - one generator per printable document type.
//!
//! Every generator is a frozen [`DocumentLayout`] plus a small amount of
//! behavior (contents page, page per section). Composition is pure; only
//! [`Generator::generate`] serializes to PDF.
//!
//! - `PlanBinderGenerator` - the full planner binder
//! - `PrePlanningChecklistGenerator` / `AfterDeathChecklistGenerator`
//! - `ReferenceGuideGenerator` - short summary for the family
//! - `WillPrepSummaryGenerator`, `WillPrepOutlineGenerator`, `AttorneyPacketGenerator`
//! - `FaqSheetGenerator`

pub mod checklists;
pub mod common;
pub mod faq_sheet;
pub mod plan_binder;
pub mod reference_guide;
pub mod traits;
pub mod will_prep;

pub use checklists::{AfterDeathChecklistGenerator, PrePlanningChecklistGenerator};
pub use faq_sheet::FaqSheetGenerator;
pub use plan_binder::PlanBinderGenerator;
pub use reference_guide::ReferenceGuideGenerator;
pub use traits::Generator;
pub use will_prep::{AttorneyPacketGenerator, WillPrepOutlineGenerator, WillPrepSummaryGenerator};

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

use super::assets::LogoImage;
use super::pdf::PdfError;
use crate::config::ComposerConfig;

/// Errors that can occur during document generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Pdf(#[from] PdfError),
    #[error("document type '{0}' is not enabled for this account")]
    FeatureDisabled(DocumentKind),
}

/// Result of a successful document generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
    pub page_count: usize,
    pub generated_on: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    PlanBinder,
    PrePlanningChecklist,
    AfterDeathChecklist,
    ReferenceGuide,
    WillPrepSummary,
    WillPrepOutline,
    AttorneyPacket,
    FaqSheet,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 8] = [
        Self::PlanBinder,
        Self::PrePlanningChecklist,
        Self::AfterDeathChecklist,
        Self::ReferenceGuide,
        Self::WillPrepSummary,
        Self::WillPrepOutline,
        Self::AttorneyPacket,
        Self::FaqSheet,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::PlanBinder => "plan-binder",
            Self::PrePlanningChecklist => "pre-planning-checklist",
            Self::AfterDeathChecklist => "after-death-checklist",
            Self::ReferenceGuide => "reference-guide",
            Self::WillPrepSummary => "will-prep-summary",
            Self::WillPrepOutline => "will-prep-outline",
            Self::AttorneyPacket => "attorney-packet",
            Self::FaqSheet => "faq-sheet",
        }
    }

    /// Label used inside filenames; `None` for the binder.
    pub fn filename_label(&self) -> Option<&'static str> {
        match self {
            Self::PlanBinder => None,
            Self::PrePlanningChecklist => Some("PrePlanningChecklist"),
            Self::AfterDeathChecklist => Some("AfterDeathChecklist"),
            Self::ReferenceGuide => Some("ReferenceGuide"),
            Self::WillPrepSummary => Some("WillPrepSummary"),
            Self::WillPrepOutline => Some("WillPrepOutline"),
            Self::AttorneyPacket => Some("AttorneyPacket"),
            Self::FaqSheet => Some("FAQ"),
        }
    }

    pub fn requires_will_preparation(&self) -> bool {
        matches!(
            self,
            Self::WillPrepSummary | Self::WillPrepOutline | Self::AttorneyPacket
        )
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown document type '{wanted}'"))
    }
}

/// Caller-selected rendering options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GenerateOptions {
    #[serde(default)]
    pub draft: bool,
    /// Subset of section ids; order is always the layout's own.
    #[serde(default)]
    pub sections: Option<Vec<String>>,
}

/// Everything a generator needs besides the plan data.
#[derive(Debug, Clone)]
pub struct GenerationContext<'a> {
    pub config: &'a ComposerConfig,
    pub logo: Option<LogoImage>,
    pub generated_on: NaiveDate,
}

impl GenerationContext<'_> {
    pub fn draft(&self, options: &GenerateOptions) -> bool {
        options.draft || self.config.forces_draft()
    }
}

pub fn generator_for(kind: DocumentKind) -> &'static dyn Generator {
    match kind {
        DocumentKind::PlanBinder => &PlanBinderGenerator,
        DocumentKind::PrePlanningChecklist => &PrePlanningChecklistGenerator,
        DocumentKind::AfterDeathChecklist => &AfterDeathChecklistGenerator,
        DocumentKind::ReferenceGuide => &ReferenceGuideGenerator,
        DocumentKind::WillPrepSummary => &WillPrepSummaryGenerator,
        DocumentKind::WillPrepOutline => &WillPrepOutlineGenerator,
        DocumentKind::AttorneyPacket => &AttorneyPacketGenerator,
        DocumentKind::FaqSheet => &FaqSheetGenerator,
    }
}

/// Generate `kind` from the plan payload, honoring feature flags.
pub fn generate(
    kind: DocumentKind,
    data: &Value,
    options: &GenerateOptions,
    ctx: &GenerationContext<'_>,
) -> Result<GeneratedDocument, GeneratorError> {
    if kind.requires_will_preparation() && !ctx.config.features.will_preparation {
        return Err(GeneratorError::FeatureDisabled(kind));
    }
    generator_for(kind).generate(data, options, ctx)
}
