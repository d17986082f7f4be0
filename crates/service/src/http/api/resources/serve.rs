use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use common::access;
use common::error::AccessError;

use crate::blobs::BlobStoreError;
use crate::http::api::resources::content_response;
use crate::http::extract::AuthenticatedAccount;
use crate::ServiceState;

/// Authenticated dashboard fetch. Identity-only: the owner sees their
/// own images regardless of protection, everyone else only public
/// ones. This path never accepts a password.
pub async fn handler(
    State(state): State<ServiceState>,
    auth: AuthenticatedAccount,
    Path(id): Path<Uuid>,
) -> Result<Response, ServeError> {
    let record = state
        .database()
        .image_by_id(&id)
        .await?
        .ok_or(ServeError::NotFound)?;

    access::authorize_authenticated_fetch(&record, &auth.context())?;

    let bytes = state.blobs().get(&record.filename).await?;
    Ok(content_response(
        &record.filename,
        bytes,
        "private, max-age=3600",
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("image not found")]
    NotFound,
    #[error("access error: {0}")]
    Access(#[from] AccessError),
    #[error("blob store error: {0}")]
    Blob(BlobStoreError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<BlobStoreError> for ServeError {
    fn from(e: BlobStoreError) -> Self {
        match e {
            BlobStoreError::NotFound(_) => ServeError::NotFound,
            other => ServeError::Blob(other),
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        match self {
            ServeError::NotFound => {
                (http::StatusCode::NOT_FOUND, "Image not found".to_string()).into_response()
            }
            ServeError::Access(AccessError::Forbidden) => {
                (http::StatusCode::FORBIDDEN, "Access denied".to_string()).into_response()
            }
            ServeError::Access(e) => {
                tracing::error!("serve authorization failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
            ServeError::Blob(e) => {
                tracing::error!("serve blob read failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
            ServeError::Database(e) => {
                tracing::error!("serve lookup failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
