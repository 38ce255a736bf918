use crate::AppState;
use crate::api::error::AppError;
use crate::models::UploadRequest;
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub file_name: String,
    pub file_key: String,
    pub file_size: i64,
    pub s3_url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Multipart body accepted by `POST /api/upload`.
#[derive(ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File exceeds the maximum allowed size".to_string())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data", description = "File upload"),
    responses(
        (status = 201, description = "File uploaded successfully", body = UploadResponse),
        (status = 400, description = "Missing file, empty filename or empty content"),
        (status = 413, description = "File too large"),
        (status = 500, description = "Storage failure")
    ),
    tag = "uploads"
)]
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut upload: Option<UploadRequest> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content = field.bytes().await.map_err(multipart_error)?;

        upload = Some(UploadRequest { file_name, content });
    }

    let req = upload.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;
    req.check().map_err(AppError::BadRequest)?;

    if req.content.len() > state.config.max_file_size {
        return Err(AppError::PayloadTooLarge(
            "File exceeds the maximum allowed size".to_string(),
        ));
    }

    let result = state
        .gateway
        .upload(req.content, &req.file_name)
        .await
        .map_err(AppError::storage("Failed to upload file to S3"))?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            file_name: req.file_name,
            file_key: result.key,
            file_size: result.size,
            s3_url: result.public_url,
            uploaded_at: Utc::now(),
        }),
    ))
}
