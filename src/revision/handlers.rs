use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use super::ledger::LedgerError;
use super::models::{Revision, SignRequest};
use crate::plan::handlers::owned_plan;
use crate::{AppState, ErrorResponse};

fn ledger_error_response(plan_id: Uuid, e: LedgerError) -> HttpResponse {
    match e {
        LedgerError::Validation(errors) => {
            HttpResponse::BadRequest().json(ErrorResponse::validation(&errors))
        }
        LedgerError::PlanNotFound(_) => {
            HttpResponse::NotFound().json(ErrorResponse::not_found("Plan not found"))
        }
        LedgerError::Store(e) => {
            log::error!("Revision ledger failure for plan {}: {}", plan_id, e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to access revision history"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/plans/{id}/revisions",
    tag = "Revisions",
    params(
        ("id" = Uuid, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "Revisions in ascending number order", body = Vec<Revision>),
        (status = 401, description = "Missing, invalid or expired session", body = ErrorResponse),
        (status = 404, description = "Plan not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_revisions(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let plan_id = path.into_inner();
    if let Err(resp) = owned_plan(&req, &state, plan_id).await {
        return resp;
    }

    match state.ledger.list(plan_id).await {
        Ok(revisions) => HttpResponse::Ok().json(revisions),
        Err(e) => ledger_error_response(plan_id, e),
    }
}

#[utoipa::path(
    get,
    path = "/api/plans/{id}/revisions/latest",
    tag = "Revisions",
    params(
        ("id" = Uuid, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "Revision with the highest number", body = Revision),
        (status = 401, description = "Missing, invalid or expired session", body = ErrorResponse),
        (status = 404, description = "Plan not found or never signed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn latest_revision(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let plan_id = path.into_inner();
    if let Err(resp) = owned_plan(&req, &state, plan_id).await {
        return resp;
    }

    match state.ledger.latest(plan_id).await {
        Ok(Some(revision)) => HttpResponse::Ok().json(revision),
        Ok(None) => {
            HttpResponse::NotFound().json(ErrorResponse::not_found("Plan has not been signed yet"))
        }
        Err(e) => ledger_error_response(plan_id, e),
    }
}

#[utoipa::path(
    post,
    path = "/api/plans/{id}/revisions",
    tag = "Revisions",
    params(
        ("id" = Uuid, Path, description = "Plan ID")
    ),
    request_body = SignRequest,
    responses(
        (status = 201, description = "Revision appended", body = Revision),
        (status = 400, description = "Signer name, acknowledgment or signature missing", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired session", body = ErrorResponse),
        (status = 404, description = "Plan not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn sign_plan(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<SignRequest>,
) -> HttpResponse {
    let plan_id = path.into_inner();
    if let Err(resp) = owned_plan(&req, &state, plan_id).await {
        return resp;
    }

    match state.ledger.append(plan_id, body.into_inner()).await {
        Ok(revision) => {
            state.metrics.revisions_signed.inc();
            HttpResponse::Created().json(revision)
        }
        Err(e) => ledger_error_response(plan_id, e),
    }
}
