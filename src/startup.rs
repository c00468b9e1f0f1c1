use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::{
    extractors::tenant::ORGANIZATION_HEADER,
    handlers,
    middleware::{metrics_middleware, request_id_middleware},
    openapi::ApiDoc,
};

pub fn build_router(state: Arc<crate::AppState>) -> Router {
    // CORS configuration
    let cors = match state.config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(_) => {
            tracing::warn!(origin = %state.config.cors_origin, "Ignoring unparsable CORS_ORIGIN");
            CorsLayer::new()
        }
    }
    .allow_methods([Method::GET, Method::POST])
    .allow_headers([
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static("x-organization-id"),
        HeaderName::from_static("x-request-id"),
    ])
    .allow_credentials(true);

    // Contract routes
    let contract_routes = Router::new()
        .route("/{id}/generate-jobs", post(handlers::generation_handler::generate_jobs))
        .route("/{id}/generate-jobs/preview", post(handlers::generation_handler::preview_jobs));

    // Job routes
    let job_routes = Router::new().route("/{id}/check-in", post(handlers::check_in_handler::check_in));

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        let organization = request
            .headers()
            .get(ORGANIZATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            organization,
            request_id = tracing::field::Empty,
        )
    });

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/health/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_handler))
        .nest("/api/contracts", contract_routes)
        .nest("/api/jobs", job_routes)
        .route("/api/availability", post(handlers::availability_handler::check_availability))
        .route("/api/durations/parse", post(handlers::durations_handler::parse_duration))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/swagger-ui", get(swagger_ui))
        .route_layer(middleware::from_fn(metrics_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(trace)
                .layer(middleware::from_fn(request_id_middleware))
                .layer(cors),
        )
        .with_state(state)
}

async fn swagger_ui() -> Html<&'static str> {
    Html(r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>FieldRota API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: '/api-docs/openapi.json',
                dom_id: '#swagger-ui',
            });
        };
    </script>
</body>
</html>
    "#)
}
