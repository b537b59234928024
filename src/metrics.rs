//! Application counters, exported on `/metrics/app` next to the HTTP metrics
//! on `/metrics`.

use actix_web::{web, HttpResponse};
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::AppState;

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,
    pub documents_generated: IntCounterVec,
    pub inline_fallbacks: IntCounter,
    pub revisions_signed: IntCounter,
    pub shared_views: IntCounter,
}

impl Metrics {
    pub fn new(namespace: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let documents_generated = IntCounterVec::new(
            Opts::new("documents_generated_total", "Documents generated by kind").namespace(namespace),
            &["kind"],
        )?;
        let inline_fallbacks = IntCounter::with_opts(
            Opts::new(
                "document_inline_fallbacks_total",
                "Stored deliveries that fell back to an inline payload",
            )
            .namespace(namespace),
        )?;
        let revisions_signed = IntCounter::with_opts(
            Opts::new("revisions_signed_total", "Revisions appended to plan ledgers").namespace(namespace),
        )?;
        let shared_views = IntCounter::with_opts(
            Opts::new("shared_views_total", "Shared plan views served").namespace(namespace),
        )?;

        registry.register(Box::new(documents_generated.clone()))?;
        registry.register(Box::new(inline_fallbacks.clone()))?;
        registry.register(Box::new(revisions_signed.clone()))?;
        registry.register(Box::new(shared_views.clone()))?;

        Ok(Self {
            registry,
            documents_generated,
            inline_fallbacks,
            revisions_signed,
            shared_views,
        })
    }

    /// Prometheus text exposition of every registered counter.
    pub fn render(&self) -> Result<(String, String), prometheus::Error> {
        let encoder = TextEncoder::new();
        let text = encoder.encode_to_string(&self.registry.gather())?;
        Ok((encoder.format_type().to_string(), text))
    }
}

pub async fn app_metrics(state: web::Data<AppState>) -> HttpResponse {
    match state.metrics.render() {
        Ok((content_type, body)) => HttpResponse::Ok().content_type(content_type).body(body),
        Err(e) => {
            log::error!("Failed to encode metrics: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
