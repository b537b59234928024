use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use super::access::{detect_device, generate_token, normalize_sections, shared_view, summarize};
use super::models::{
    AccessReport, CreateShareLinkRequest, ShareLink, ShareLinkResponse, SharedPlanView,
    UpdateShareLinkRequest,
};
use super::store::ShareError;
use crate::plan::handlers::owned_plan;
use crate::{AppState, ErrorResponse};

fn share_error_response(context: &str, e: ShareError) -> HttpResponse {
    match e {
        ShareError::NotFound => {
            HttpResponse::NotFound().json(ErrorResponse::not_found("Share link not found"))
        }
        ShareError::NoSections => HttpResponse::BadRequest().json(ErrorResponse::bad_request(
            "Select at least one known section to share",
        )),
        ShareError::Database(e) => {
            log::error!("{}: {}", context, e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Share link storage failed"))
        }
    }
}

fn link_not_found() -> HttpResponse {
    share_error_response("Share link lookup", ShareError::NotFound)
}

/// Load a link whose plan the caller owns.
async fn owned_link(req: &HttpRequest, state: &AppState, link_id: Uuid) -> Result<ShareLink, HttpResponse> {
    let link = match state.shares.find_by_id(link_id).await {
        Ok(Some(link)) => link,
        Ok(None) => return Err(link_not_found()),
        Err(e) => return Err(share_error_response("Failed to load share link", e)),
    };
    // Links of other users' plans look missing too.
    owned_plan(req, state, link.plan_id).await.map_err(|resp| {
        if resp.status() == actix_web::http::StatusCode::NOT_FOUND {
            link_not_found()
        } else {
            resp
        }
    })?;
    Ok(link)
}

async fn with_summary(state: &AppState, link: ShareLink) -> Result<ShareLinkResponse, ShareError> {
    let log = state.shares.access_log(link.id).await?;
    Ok(ShareLinkResponse {
        link,
        access: summarize(&log),
    })
}

#[utoipa::path(
    post,
    path = "/api/plans/{id}/share-links",
    tag = "Share Links",
    params(
        ("id" = Uuid, Path, description = "Plan ID")
    ),
    request_body = CreateShareLinkRequest,
    responses(
        (status = 201, description = "Share link created", body = ShareLinkResponse),
        (status = 400, description = "No known section selected", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired session", body = ErrorResponse),
        (status = 404, description = "Plan not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_share_link(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CreateShareLinkRequest>,
) -> HttpResponse {
    let plan_id = path.into_inner();
    if let Err(resp) = owned_plan(&req, &state, plan_id).await {
        return resp;
    }

    let sections = normalize_sections(&body.sections);
    if sections.is_empty() {
        return share_error_response("Share link sections", ShareError::NoSections);
    }

    let link = ShareLink {
        id: Uuid::new_v4(),
        plan_id,
        token: generate_token(),
        enabled: true,
        include_archived_versions: body.include_archived_versions,
        sections,
        created_at: Utc::now(),
    };

    match state.shares.create_link(&link).await {
        Ok(()) => {
            log::info!("Share link {} created for plan {}", link.id, plan_id);
            HttpResponse::Created().json(ShareLinkResponse {
                link,
                access: Default::default(),
            })
        }
        Err(e) => share_error_response("Failed to create share link", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/plans/{id}/share-links",
    tag = "Share Links",
    params(
        ("id" = Uuid, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "Share links of the plan, newest first", body = Vec<ShareLinkResponse>),
        (status = 401, description = "Missing, invalid or expired session", body = ErrorResponse),
        (status = 404, description = "Plan not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_share_links(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let plan_id = path.into_inner();
    if let Err(resp) = owned_plan(&req, &state, plan_id).await {
        return resp;
    }

    let links = match state.shares.list_for_plan(plan_id).await {
        Ok(links) => links,
        Err(e) => return share_error_response("Failed to list share links", e),
    };

    let mut response = Vec::with_capacity(links.len());
    for link in links {
        match with_summary(&state, link).await {
            Ok(item) => response.push(item),
            Err(e) => return share_error_response("Failed to read access log", e),
        }
    }
    HttpResponse::Ok().json(response)
}

#[utoipa::path(
    patch,
    path = "/api/share-links/{id}",
    tag = "Share Links",
    params(
        ("id" = Uuid, Path, description = "Share link ID")
    ),
    request_body = UpdateShareLinkRequest,
    responses(
        (status = 200, description = "Share link updated", body = ShareLinkResponse),
        (status = 400, description = "No known section selected", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired session", body = ErrorResponse),
        (status = 404, description = "Share link not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_share_link(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateShareLinkRequest>,
) -> HttpResponse {
    let link_id = path.into_inner();
    if let Err(resp) = owned_link(&req, &state, link_id).await {
        return resp;
    }

    let mut changes = body.into_inner();
    if let Some(requested) = changes.sections.take() {
        let sections = normalize_sections(&requested);
        if sections.is_empty() {
            return share_error_response("Share link sections", ShareError::NoSections);
        }
        changes.sections = Some(sections);
    }

    let link = match state.shares.update_link(link_id, &changes).await {
        Ok(Some(link)) => link,
        Ok(None) => return link_not_found(),
        Err(e) => return share_error_response("Failed to update share link", e),
    };

    match with_summary(&state, link).await {
        Ok(item) => HttpResponse::Ok().json(item),
        Err(e) => share_error_response("Failed to read access log", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/share-links/{id}/access",
    tag = "Share Links",
    params(
        ("id" = Uuid, Path, description = "Share link ID")
    ),
    responses(
        (status = 200, description = "Access summary and log", body = AccessReport),
        (status = 401, description = "Missing, invalid or expired session", body = ErrorResponse),
        (status = 404, description = "Share link not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_access_log(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let link_id = path.into_inner();
    if let Err(resp) = owned_link(&req, &state, link_id).await {
        return resp;
    }

    match state.shares.access_log(link_id).await {
        Ok(entries) => HttpResponse::Ok().json(AccessReport {
            summary: summarize(&entries),
            entries,
        }),
        Err(e) => share_error_response("Failed to read access log", e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/share-links/{id}/access",
    tag = "Share Links",
    params(
        ("id" = Uuid, Path, description = "Share link ID")
    ),
    responses(
        (status = 204, description = "Access log cleared"),
        (status = 401, description = "Missing, invalid or expired session", body = ErrorResponse),
        (status = 404, description = "Share link not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn clear_access_log(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let link_id = path.into_inner();
    if let Err(resp) = owned_link(&req, &state, link_id).await {
        return resp;
    }

    match state.shares.clear_access_log(link_id).await {
        Ok(removed) => {
            log::info!("Cleared {} access entries of share link {}", removed, link_id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => share_error_response("Failed to clear access log", e),
    }
}

#[utoipa::path(
    get,
    path = "/shared/{token}",
    tag = "Share Links",
    params(
        ("token" = String, Path, description = "Share link token")
    ),
    responses(
        (status = 200, description = "Filtered read-only plan view", body = SharedPlanView),
        (status = 404, description = "Unknown or disabled link", body = ErrorResponse)
    )
)]
pub async fn view_shared_plan(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let token = path.into_inner();
    let link = match state.shares.find_by_token(&token).await {
        Ok(Some(link)) if link.enabled => link,
        Ok(_) => return link_not_found(),
        Err(e) => return share_error_response("Failed to resolve share token", e),
    };

    let plan = match state.plans.fetch_plan(link.plan_id).await {
        Ok(Some(plan)) => plan,
        Ok(None) => return link_not_found(),
        Err(e) => {
            log::error!("Failed to load shared plan {}: {}", link.plan_id, e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to load plan"));
        }
    };

    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok());
    let device = detect_device(user_agent);
    if let Err(e) = state.shares.record_access(link.id, device, Utc::now()).await {
        log::warn!("Failed to record access to share link {}: {}", link.id, e);
    }
    state.metrics.shared_views.inc();

    HttpResponse::Ok().json(shared_view(&link, &plan.data))
}
