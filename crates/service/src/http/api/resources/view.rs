use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::access;
use common::error::AccessError;

use crate::blobs::BlobStoreError;
use crate::http::api::resources::content_response;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ViewRequest {
    #[serde(default)]
    pub password: Option<String>,
}

/// Anonymous password-gated view: the share-link path.
///
/// No session required. Public images stream to anyone; protected
/// images require the exact password in the request body.
pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<Uuid>,
    body: Option<Json<ViewRequest>>,
) -> Result<Response, ViewError> {
    let Json(req) = body.unwrap_or_default();

    let record = state
        .database()
        .image_by_id(&id)
        .await?
        .ok_or(ViewError::NotFound)?;

    if record.is_protected() {
        let supplied = req.password.as_deref().filter(|p| !p.is_empty());
        if supplied.is_none() {
            return Err(ViewError::PasswordRequired);
        }
        let valid = access::verify_resource_password(&record, supplied).await?;
        if !valid {
            return Err(ViewError::IncorrectPassword);
        }
    }

    let bytes = state.blobs().get(&record.filename).await?;
    Ok(content_response(
        &record.filename,
        bytes,
        "private, max-age=3600",
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("image not found")]
    NotFound,
    #[error("password required")]
    PasswordRequired,
    #[error("incorrect password")]
    IncorrectPassword,
    #[error("access error: {0}")]
    Access(#[from] AccessError),
    #[error("blob store error: {0}")]
    Blob(BlobStoreError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<BlobStoreError> for ViewError {
    fn from(e: BlobStoreError) -> Self {
        match e {
            // record without bytes serves the same 404 as no record
            BlobStoreError::NotFound(_) => ViewError::NotFound,
            other => ViewError::Blob(other),
        }
    }
}

impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        match self {
            ViewError::NotFound => {
                (http::StatusCode::NOT_FOUND, "Image not found".to_string()).into_response()
            }
            ViewError::PasswordRequired => (
                http::StatusCode::UNAUTHORIZED,
                "Password required".to_string(),
            )
                .into_response(),
            ViewError::IncorrectPassword => (
                http::StatusCode::UNAUTHORIZED,
                "Incorrect password".to_string(),
            )
                .into_response(),
            ViewError::Access(e) => {
                tracing::error!("view authorization failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
            ViewError::Blob(e) => {
                tracing::error!("view blob read failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
            ViewError::Database(e) => {
                tracing::error!("view lookup failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
