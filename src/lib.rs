pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod services;

use crate::api::middleware::request_id::{REQUEST_ID_HEADER, request_id_middleware};
use crate::config::AppConfig;
use crate::services::gateway::StorageGateway;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Headroom on top of `max_file_size` for multipart boundaries and headers.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::health::root,
        api::handlers::health::health_check,
        api::handlers::upload::upload_file,
        api::handlers::voices::list_voices,
    ),
    components(
        schemas(
            api::handlers::health::RootResponse,
            api::handlers::health::HealthResponse,
            api::handlers::upload::UploadForm,
            api::handlers::upload::UploadResponse,
            api::handlers::voices::VoiceResponse,
        )
    ),
    tags(
        (name = "health", description = "Liveness endpoints"),
        (name = "uploads", description = "File upload and listing endpoints")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<StorageGateway>,
    pub config: AppConfig,
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.max_file_size + MULTIPART_OVERHEAD;
    let cors = cors_layer(&state.config);

    // Sits beneath the request-id middleware so every span sees the final id
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<axum::body::Body>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        })
        .on_request(|request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
            info!("📥 {} {}", request.method(), request.uri());
        })
        .on_response(
            |response: &axum::http::Response<axum::body::Body>,
             latency: std::time::Duration,
             _span: &tracing::Span| {
                info!(
                    "📤 Finished in {:?} with status {}",
                    latency,
                    response.status()
                );
            },
        );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::handlers::health::root))
        .route("/health", get(api::handlers::health::health_check))
        .route("/api/upload", post(api::handlers::upload::upload_file))
        .route("/api/voices", get(api::handlers::voices::list_voices))
        .layer(trace_layer)
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
