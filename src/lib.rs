use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod config;
pub mod db;
pub mod document;
pub mod metrics;
pub mod plan;
pub mod revision;
pub mod share;
pub mod storage;
pub mod validation;

pub use crate::db::AppState;

use crate::validation::{ValidationError, ValidationErrors};

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
    /// Field-level problems of a rejected request
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ValidationError>,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            details: Vec::new(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::new("Unauthorized", message)
    }

    /// The client should send the user back through sign-in.
    pub fn session_expired(message: &str) -> Self {
        Self::new("SessionExpired", message)
    }

    pub fn forbidden(message: &str) -> Self {
        Self::new("Forbidden", message)
    }

    pub fn validation(errors: &ValidationErrors) -> Self {
        Self {
            details: errors.errors().to_vec(),
            ..Self::new("ValidationError", &errors.to_string())
        }
    }
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::plan::handlers::get_plan_summary,
        crate::document::handlers::download_document,
        crate::document::handlers::deliver_document,
        crate::revision::handlers::list_revisions,
        crate::revision::handlers::latest_revision,
        crate::revision::handlers::sign_plan,
        crate::share::handlers::create_share_link,
        crate::share::handlers::list_share_links,
        crate::share::handlers::update_share_link,
        crate::share::handlers::get_access_log,
        crate::share::handlers::clear_access_log,
        crate::share::handlers::view_shared_plan
    ),
    components(
        schemas(
            ErrorResponse,
            validation::ValidationError,
            plan::handlers::PlanSummary,
            plan::models::PlanData,
            plan::models::PersonalProfile,
            plan::models::Contact,
            plan::models::FuneralPreferences,
            plan::models::PlanNotes,
            plan::models::WillPreparation,
            document::generators::DocumentKind,
            document::generators::GenerateOptions,
            document::delivery::DeliveryOutcome,
            document::content::FileContent,
            document::content::FileMetadata,
            revision::models::Revision,
            revision::models::SignRequest,
            share::models::ShareLink,
            share::models::ShareLinkResponse,
            share::models::CreateShareLinkRequest,
            share::models::UpdateShareLinkRequest,
            share::models::AccessSummary,
            share::models::AccessLogEntry,
            share::models::AccessReport,
            share::models::DeviceType,
            share::models::SharedPlanView,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Plans", description = "Plan summary."),
        (name = "Documents", description = "Printable planner documents."),
        (name = "Revisions", description = "Signed revision history."),
        (name = "Share Links", description = "Read-only shared access and its log.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost")
    )
)]
pub struct ApiDoc;

/// Mount every route on `cfg`; shared by the server and handler tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::resource("/plans/{id}").route(web::get().to(plan::handlers::get_plan_summary)),
            )
            .service(
                web::resource("/plans/{id}/documents/{kind}")
                    .route(web::get().to(document::handlers::download_document))
                    .route(web::post().to(document::handlers::deliver_document)),
            )
            .service(
                web::resource("/plans/{id}/revisions")
                    .route(web::get().to(revision::handlers::list_revisions))
                    .route(web::post().to(revision::handlers::sign_plan)),
            )
            .service(
                web::resource("/plans/{id}/revisions/latest")
                    .route(web::get().to(revision::handlers::latest_revision)),
            )
            .service(
                web::resource("/plans/{id}/share-links")
                    .route(web::get().to(share::handlers::list_share_links))
                    .route(web::post().to(share::handlers::create_share_link)),
            )
            .service(
                web::resource("/share-links/{id}")
                    .route(web::patch().to(share::handlers::update_share_link)),
            )
            .service(
                web::resource("/share-links/{id}/access")
                    .route(web::get().to(share::handlers::get_access_log))
                    .route(web::delete().to(share::handlers::clear_access_log)),
            ),
    )
    .service(
        web::resource("/shared/{token}").route(web::get().to(share::handlers::view_shared_plan)),
    )
    .service(web::resource("/metrics/app").route(web::get().to(metrics::app_metrics)));
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    dotenvy::dotenv().ok(); // Load .env file
    let config = config::AppConfig::from_env().context("Invalid configuration")?;

    let app_state = match AppState::new(&config).await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to connect to database. Please check your SUPABASE_DATABASE_URL in .env and ensure the database is running. Error: {}", e);
            anyhow::bail!("startup failed: {}", e);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("legacy_planner_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create Prometheus metrics middleware: {}", e))?;

    let bind = (config.server.host.clone(), config.server.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .configure(configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
