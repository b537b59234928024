use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use super::delivery::{deliver, DeliveryOutcome};
use super::generators::{self, DocumentKind, GenerateOptions, GeneratedDocument, GenerationContext, GeneratorError};
use crate::plan::handlers::owned_plan;
use crate::plan::models::PlanRecord;
use crate::{AppState, ErrorResponse};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DownloadQuery {
    /// Stamp a DRAFT watermark on every page
    #[serde(default)]
    pub draft: bool,
    /// Comma-separated section ids; all sections when omitted
    pub sections: Option<String>,
}

impl DownloadQuery {
    pub fn into_options(self) -> GenerateOptions {
        let sections = self.sections.map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        });
        GenerateOptions {
            draft: self.draft,
            sections,
        }
    }
}

fn parse_kind(raw: &str) -> Result<DocumentKind, HttpResponse> {
    raw.parse::<DocumentKind>().map_err(|_| {
        let known: Vec<&str> = DocumentKind::ALL.iter().map(|k| k.slug()).collect();
        HttpResponse::BadRequest().json(ErrorResponse::bad_request(&format!(
            "Unknown document type '{}'. Expected one of: {}",
            raw,
            known.join(", ")
        )))
    })
}

/// Compose and render off the async executor.
async fn build_document(
    state: &AppState,
    plan: PlanRecord,
    kind: DocumentKind,
    options: GenerateOptions,
) -> Result<GeneratedDocument, HttpResponse> {
    let logo = state.logos.load(state.composer.logo_url.as_deref()).await;
    let config = state.composer.clone();
    let plan_id = plan.id;

    let result = web::block(move || {
        let ctx = GenerationContext {
            config: &config,
            logo,
            generated_on: Utc::now().date_naive(),
        };
        generators::generate(kind, &plan.data, &options, &ctx)
    })
    .await;

    match result {
        Ok(Ok(doc)) => {
            state
                .metrics
                .documents_generated
                .with_label_values(&[kind.slug()])
                .inc();
            log::info!(
                "Generated {} for plan {} ({} pages)",
                kind,
                plan_id,
                doc.page_count
            );
            Ok(doc)
        }
        Ok(Err(GeneratorError::FeatureDisabled(kind))) => Err(HttpResponse::Forbidden().json(
            ErrorResponse::forbidden(&format!("Document type '{}' is not enabled for this account", kind)),
        )),
        Ok(Err(e)) => {
            log::error!("Failed to generate {} for plan {}: {}", kind, plan_id, e);
            Err(HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to generate document")))
        }
        Err(e) => {
            log::error!("Generation task for plan {} failed: {}", plan_id, e);
            Err(HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to generate document")))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/plans/{id}/documents/{kind}",
    tag = "Documents",
    params(
        ("id" = Uuid, Path, description = "Plan ID"),
        ("kind" = DocumentKind, Path, description = "Document type"),
        DownloadQuery
    ),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Unknown document type", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired session", body = ErrorResponse),
        (status = 403, description = "Document type disabled", body = ErrorResponse),
        (status = 404, description = "Plan not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_document(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
    query: web::Query<DownloadQuery>,
) -> HttpResponse {
    let (plan_id, raw_kind) = path.into_inner();
    let kind = match parse_kind(&raw_kind) {
        Ok(kind) => kind,
        Err(resp) => return resp,
    };
    let plan = match owned_plan(&req, &state, plan_id).await {
        Ok(plan) => plan,
        Err(resp) => return resp,
    };

    let doc = match build_document(&state, plan, kind, query.into_inner().into_options()).await {
        Ok(doc) => doc,
        Err(resp) => return resp,
    };

    HttpResponse::Ok()
        .content_type(super::content::PDF_MIME)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(doc.filename.clone())],
        })
        .body(doc.pdf)
}

#[utoipa::path(
    post,
    path = "/api/plans/{id}/documents/{kind}",
    tag = "Documents",
    params(
        ("id" = Uuid, Path, description = "Plan ID"),
        ("kind" = DocumentKind, Path, description = "Document type")
    ),
    request_body = GenerateOptions,
    responses(
        (status = 200, description = "Signed URL, or the inline document when storage is unavailable", body = DeliveryOutcome),
        (status = 400, description = "Unknown document type", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired session", body = ErrorResponse),
        (status = 403, description = "Document type disabled", body = ErrorResponse),
        (status = 404, description = "Plan not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn deliver_document(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
    body: Option<web::Json<GenerateOptions>>,
) -> HttpResponse {
    let (plan_id, raw_kind) = path.into_inner();
    let kind = match parse_kind(&raw_kind) {
        Ok(kind) => kind,
        Err(resp) => return resp,
    };
    let plan = match owned_plan(&req, &state, plan_id).await {
        Ok(plan) => plan,
        Err(resp) => return resp,
    };
    let owner = plan.user_id.to_string();
    let options = body.map(web::Json::into_inner).unwrap_or_default();

    let doc = match build_document(&state, plan, kind, options).await {
        Ok(doc) => doc,
        Err(resp) => return resp,
    };

    let outcome = deliver(state.storage.as_ref(), &owner, &doc, Utc::now()).await;
    if outcome.is_inline() {
        state.metrics.inline_fallbacks.inc();
    }
    HttpResponse::Ok().json(outcome)
}
