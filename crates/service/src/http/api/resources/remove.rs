use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::access;
use common::error::AccessError;

use crate::http::extract::AuthenticatedAccount;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Delete an image record and its stored bytes. Owner only.
pub async fn handler(
    State(state): State<ServiceState>,
    auth: AuthenticatedAccount,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, DeleteError> {
    let record = state
        .database()
        .image_by_id(&id)
        .await?
        .ok_or(DeleteError::NotFound)?;

    access::authorize_owner_mutation(&record, &auth.context())?;

    // the record is authoritative: a failed blob removal leaves an
    // orphan blob that is unreachable once the record is gone
    if let Err(e) = state.blobs().delete(&record.filename).await {
        tracing::warn!(resource_id = %id, "failed to delete image blob: {}", e);
    }

    state.database().delete_image(&id).await?;

    tracing::info!(resource_id = %id, owner_id = %record.owner_id, "image deleted");

    Ok((http::StatusCode::OK, Json(DeleteResponse { deleted: true })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error("image not found")]
    NotFound,
    #[error("access error: {0}")]
    Access(#[from] AccessError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for DeleteError {
    fn into_response(self) -> Response {
        match self {
            DeleteError::NotFound => {
                (http::StatusCode::NOT_FOUND, "Image not found".to_string()).into_response()
            }
            DeleteError::Access(AccessError::Forbidden) => (
                http::StatusCode::FORBIDDEN,
                "Not authorized to delete this image".to_string(),
            )
                .into_response(),
            DeleteError::Access(e) => {
                tracing::error!("delete authorization failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
            DeleteError::Database(e) => {
                tracing::error!("delete failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
