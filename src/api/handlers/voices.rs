use crate::AppState;
use crate::api::error::AppError;
use crate::models::ObjectSummary;
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct VoiceResponse {
    pub file_key: String,
    pub file_name: String,
    pub size: i64,
    pub last_modified: DateTime<Utc>,
    pub url: String,
}

impl From<ObjectSummary> for VoiceResponse {
    fn from(summary: ObjectSummary) -> Self {
        Self {
            file_key: summary.key,
            file_name: summary.display_name,
            size: summary.size_bytes,
            last_modified: summary.last_modified,
            url: summary.public_url,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/voices",
    responses(
        (status = 200, description = "Uploaded files, newest first", body = Vec<VoiceResponse>),
        (status = 500, description = "Storage failure")
    ),
    tag = "uploads"
)]
pub async fn list_voices(
    State(state): State<AppState>,
) -> Result<Json<Vec<VoiceResponse>>, AppError> {
    let summaries = state
        .gateway
        .list_uploads()
        .await
        .map_err(AppError::storage("Failed to list files from S3"))?;

    Ok(Json(summaries.into_iter().map(VoiceResponse::from).collect()))
}
