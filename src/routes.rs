use axum::{
    extract::Request,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Level;

use crate::handlers::{audit, health};
use crate::services::AuditService;

pub fn create_router(service: AuditService) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/calculate", post(audit::calculate))
        .route("/api/v1/audit/calculate", post(audit::calculate))
        .with_state(service)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::span!(
                        Level::INFO,
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_request(|_request: &Request, _span: &tracing::Span| {
                    tracing::event!(Level::DEBUG, "received request");
                })
                .on_response(
                    |response: &axum::response::Response,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::event!(
                            Level::INFO,
                            status = response.status().as_u16(),
                            latency = ?latency,
                            "request completed"
                        );
                    },
                ),
        )
}
