use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use common::access::{self, AccessDecision};

use crate::blobs::BlobStoreError;
use crate::http::api::resources::content_response;
use crate::ServiceState;

/// Credential-free public fetch (thumbnails, embeds).
///
/// Protected images are denied unconditionally on this path; no caller
/// identity and no password can change the outcome.
pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<Uuid>,
) -> Result<Response, PublicContentError> {
    let record = state
        .database()
        .image_by_id(&id)
        .await?
        .ok_or(PublicContentError::NotFound)?;

    if access::authorize_public_fetch(&record) == AccessDecision::Deny {
        return Err(PublicContentError::Protected);
    }

    let bytes = state.blobs().get(&record.filename).await?;
    Ok(content_response(
        &record.filename,
        bytes,
        "public, max-age=3600",
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum PublicContentError {
    #[error("image not found")]
    NotFound,
    #[error("image is protected")]
    Protected,
    #[error("blob store error: {0}")]
    Blob(BlobStoreError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<BlobStoreError> for PublicContentError {
    fn from(e: BlobStoreError) -> Self {
        match e {
            BlobStoreError::NotFound(_) => PublicContentError::NotFound,
            other => PublicContentError::Blob(other),
        }
    }
}

impl IntoResponse for PublicContentError {
    fn into_response(self) -> Response {
        match self {
            PublicContentError::NotFound => {
                (http::StatusCode::NOT_FOUND, "Image not found".to_string()).into_response()
            }
            PublicContentError::Protected => {
                (http::StatusCode::FORBIDDEN, "Protected image".to_string()).into_response()
            }
            PublicContentError::Blob(e) => {
                tracing::error!("public fetch blob read failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
            PublicContentError::Database(e) => {
                tracing::error!("public fetch lookup failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
