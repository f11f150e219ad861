//! API request handlers.
//!
//! Three endpoints share one upload-validation helper: the multipart
//! `file` field is gatekept (present, named, allowed extension), staged
//! under the upload directory, handed to the vision collaborator, and the
//! staging file is removed when the request's guard drops — on success and
//! on every failure path alike.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::response::Html;

use super::error::ApiError;
use super::types::{ApiState, HealthResponse, OcrResponse, ScanImageResponse, ScanResultAck};
use crate::staging::{self, StagedUpload};
use crate::{Result, ScanHubError};

static INDEX_HTML: &str = include_str!("../../static/index.html");

/// Landing page handler.
///
/// GET /
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint handler.
///
/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Scan-result echo endpoint handler.
///
/// POST /api/scan/result
///
/// Accepts a JSON body with a `result` field holding any JSON value. The
/// value is logged for operator visibility and echoed back unchanged; no
/// further processing, persistence, or validation happens here.
pub async fn scan_result_handler(
    payload: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> std::result::Result<Json<ScanResultAck>, ApiError> {
    let Json(body) = payload
        .map_err(|e| ApiError::validation(ScanHubError::validation(format!("Invalid JSON body: {}", e))))?;

    let result = body
        .get("result")
        .cloned()
        .ok_or_else(|| ApiError::validation(ScanHubError::validation("No scan result provided")))?;

    tracing::info!(result = %result, "scan result received");

    Ok(Json(ScanResultAck {
        status: "success".to_string(),
        message: "Scan result received".to_string(),
        data: result,
    }))
}

/// Symbol scan endpoint handler.
///
/// POST /api/scan/image
///
/// Accepts multipart form data with a `file` field (png/jpg/jpeg). Returns
/// every barcode/QR symbol the collaborator detects; an image without
/// symbols yields an empty `results` list.
pub async fn scan_image_handler(
    State(state): State<ApiState>,
    multipart: Multipart,
) -> std::result::Result<Json<ScanImageResponse>, ApiError> {
    let staged = receive_upload(&state, multipart).await?;
    let symbols = state.engine.decode_symbols_file(staged.path()).await?;
    Ok(Json(symbols.into()))
}

/// OCR endpoint handler.
///
/// POST /api/ocr
///
/// Accepts multipart form data with a `file` field (png/jpg/jpeg). Returns
/// the text the collaborator extracts, whitespace-trimmed; a blank image
/// yields an empty string.
pub async fn ocr_handler(
    State(state): State<ApiState>,
    multipart: Multipart,
) -> std::result::Result<Json<OcrResponse>, ApiError> {
    let staged = receive_upload(&state, multipart).await?;
    let text = state.engine.recognize_text_file(staged.path()).await?;
    Ok(Json(OcrResponse { text }))
}

/// Upload gatekeeper shared by the image endpoints.
///
/// Pulls the `file` field out of the multipart stream, validates it, and
/// stages it under the upload directory. The returned guard owns the
/// staging file; dropping it deletes the file.
async fn receive_upload(state: &ApiState, mut multipart: Multipart) -> std::result::Result<StagedUpload, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(ScanHubError::validation(e.to_string())))?
    {
        if field.name().unwrap_or("") == "file" {
            let file_name = field.file_name().unwrap_or("").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::validation(ScanHubError::validation(e.to_string())))?;
            upload = Some((file_name, data.to_vec()));
        }
    }

    let (file_name, data) = upload.ok_or_else(|| ApiError::validation(ScanHubError::validation("No file part")))?;

    if file_name.is_empty() {
        return Err(ApiError::validation(ScanHubError::validation("No selected file")));
    }

    if !staging::is_allowed_filename(&file_name) {
        return Err(ApiError::validation(ScanHubError::validation("Invalid file type")));
    }

    stage_upload(state, &file_name, &data).await.map_err(ApiError::from)
}

async fn stage_upload(state: &ApiState, file_name: &str, data: &[u8]) -> Result<StagedUpload> {
    let filename = staging::sanitize_filename(file_name);
    StagedUpload::create(&state.config.upload_dir, &filename, data).await
}
