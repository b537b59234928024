use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::models::{completion_percentage, PlanRecord};
use crate::auth::{validate_request_token, AuthError};
use crate::revision::migration::normalize;
use crate::revision::models::Revision;
use crate::{AppState, ErrorResponse};

/// Authenticate the caller and load a plan they own.
///
/// Plans owned by someone else answer exactly like missing ones.
pub async fn owned_plan(
    req: &HttpRequest,
    state: &AppState,
    plan_id: Uuid,
) -> Result<PlanRecord, HttpResponse> {
    let claims = validate_request_token(req, &state.jwt).map_err(|e| e.error_response())?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| AuthError::InvalidToken.error_response())?;

    match state.plans.fetch_plan(plan_id).await {
        Ok(Some(plan)) if plan.is_owned_by(&user_id) => Ok(plan),
        Ok(_) => Err(HttpResponse::NotFound().json(ErrorResponse::not_found("Plan not found"))),
        Err(e) => {
            log::error!("Failed to load plan {}: {}", plan_id, e);
            Err(HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to load plan")))
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanSummary {
    pub id: Uuid,
    pub percent_complete: i32,
    pub last_signed_at: Option<DateTime<Utc>>,
    pub revision_count: usize,
    pub latest_revision: Option<Revision>,
}

#[utoipa::path(
    get,
    path = "/api/plans/{id}",
    tag = "Plans",
    params(
        ("id" = Uuid, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "Plan summary", body = PlanSummary),
        (status = 401, description = "Missing, invalid or expired session", body = ErrorResponse),
        (status = 404, description = "Plan not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_plan_summary(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let plan_id = path.into_inner();
    let plan = match owned_plan(&req, &state, plan_id).await {
        Ok(plan) => plan,
        Err(resp) => return resp,
    };

    let percent = i32::from(completion_percentage(&plan.data));
    if percent != plan.percent_complete {
        if let Err(e) = state.plans.update_completion(plan_id, percent).await {
            log::warn!("Failed to store completion for plan {}: {}", plan_id, e);
        }
    }

    let revisions = normalize(&plan.data);
    HttpResponse::Ok().json(PlanSummary {
        id: plan.id,
        percent_complete: percent,
        last_signed_at: plan.last_signed_at,
        revision_count: revisions.len(),
        latest_revision: revisions.into_iter().max_by_key(|r| r.revision_number),
    })
}
