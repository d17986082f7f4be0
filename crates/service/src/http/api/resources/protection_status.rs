use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionStatusResponse {
    pub requires_password: bool,
}

/// Whether an image needs a password to view. No auth required.
///
/// This route reveals resource existence to anonymous callers while the
/// byte-serving routes answer a uniform 404; the asymmetry is kept for
/// compatibility with the existing client.
pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ProtectionStatusError> {
    let record = state
        .database()
        .image_by_id(&id)
        .await?
        .ok_or(ProtectionStatusError::NotFound)?;

    Ok((
        http::StatusCode::OK,
        Json(ProtectionStatusResponse {
            requires_password: record.is_protected(),
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum ProtectionStatusError {
    #[error("image not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ProtectionStatusError {
    fn into_response(self) -> Response {
        match self {
            ProtectionStatusError::NotFound => {
                (http::StatusCode::NOT_FOUND, "Image not found".to_string()).into_response()
            }
            ProtectionStatusError::Database(e) => {
                tracing::error!("protection status lookup failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
