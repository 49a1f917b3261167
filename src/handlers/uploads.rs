use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::{AppError, AppResult},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct UploadReceipt {
    pub filename: String,
    pub content_type: Option<String>,
    pub message: String,
}

/// Stores every file part of the form. Parts without a file name are
/// skipped; the first part that fails to store aborts the request.
pub async fn upload_files(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<Vec<UploadReceipt>>> {
    let mut multipart = multipart?;
    let mut receipts = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(filename) = field.file_name().map(str::to_owned) else {
            debug!(field = ?field.name(), "Skipping multipart field without a file name");
            continue;
        };
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        state.uploads.save(&filename, &bytes).await?;

        info!(filename = %filename, size = bytes.len(), "Uploaded file");

        receipts.push(UploadReceipt {
            filename,
            content_type,
            message: "File uploaded successfully".to_string(),
        });
    }

    if receipts.is_empty() {
        return Err(AppError::BadRequest("No files provided".to_string()));
    }

    Ok(Json(receipts))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Failed to read multipart field: {}", err))
}
