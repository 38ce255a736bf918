use crate::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub docs: String,
    pub openapi: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = RootResponse)
    ),
    tag = "health"
)]
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(RootResponse {
        message: format!("Welcome to {}", state.config.app_name),
        version: state.config.app_version.clone(),
        docs: "/swagger-ui".to_string(),
        openapi: "/api-docs/openapi.json".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Liveness status", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.config.app_version.clone(),
    })
}
