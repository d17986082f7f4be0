use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::access;
use common::error::AccessError;

use crate::blobs::BlobStoreError;
use crate::database::NewImage;
use crate::http::extract::AuthenticatedAccount;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub resource_id: Uuid,
}

/// Upload an image, optionally protecting it with a password.
///
/// Multipart form: one binary part (`image` or `file`) and an optional
/// `password` text part. The caller becomes the immutable owner of the
/// new record.
pub async fn handler(
    State(state): State<ServiceState>,
    auth: AuthenticatedAccount,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, UploadError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut password: Option<String> = None;

    // Parse multipart form data
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::MultipartError(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "image" | "file" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| UploadError::MultipartError(e.to_string()))?;
                file = Some((filename, data));
            }
            "password" => {
                password = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| UploadError::MultipartError(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    let (original_name, data) =
        file.ok_or_else(|| UploadError::InvalidRequest("no file uploaded".into()))?;

    // authorize + hash the optional password before anything is stored
    let password_hash = access::authorize_upload(&auth.context(), password.as_deref()).await?;

    let locator = format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        sanitize_filename(&original_name)
    );
    let size = data.len();

    state.blobs().put(&locator, data).await?;

    let record = state
        .database()
        .create_image(NewImage {
            filename: locator.clone(),
            owner_id: auth.account_id,
            password_hash,
        })
        .await?;

    tracing::info!(
        resource_id = %record.id,
        owner_id = %record.owner_id,
        protected = record.is_protected(),
        size,
        "image uploaded"
    );

    Ok((
        http::StatusCode::CREATED,
        axum::Json(UploadResponse {
            resource_id: record.id,
        }),
    )
        .into_response())
}

/// Keep the original extension so content-type guessing keeps working,
/// drop anything that could escape the locator namespace.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Multipart error: {0}")]
    MultipartError(String),
    #[error("access error: {0}")]
    Access(#[from] AccessError),
    #[error("blob store error: {0}")]
    Blob(#[from] BlobStoreError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::InvalidRequest(msg) | UploadError::MultipartError(msg) => (
                http::StatusCode::BAD_REQUEST,
                format!("Bad request: {}", msg),
            )
                .into_response(),
            UploadError::Access(AccessError::Unauthenticated) => (
                http::StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            )
                .into_response(),
            UploadError::Access(e) => {
                tracing::error!("upload authorization failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
            UploadError::Blob(e) => {
                tracing::error!("upload blob write failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
            UploadError::Database(e) => {
                tracing::error!("upload record creation failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("cat.png"), "cat.png");
        assert_eq!(sanitize_filename("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_filename("my photo.jpg"), "my_photo.jpg");
        assert_eq!(sanitize_filename(""), "unnamed");
    }
}
