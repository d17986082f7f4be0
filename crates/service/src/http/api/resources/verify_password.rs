use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::access;
use common::error::AccessError;

use crate::http::extract::AuthenticatedAccount;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VerifyPasswordRequest {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPasswordResponse {
    pub valid: bool,
}

/// Owner-side unlock check: does a supplied password match?
///
/// Used by the dashboard before download/share actions. This is the
/// bearer-gated sibling of the anonymous view route; mismatches are a
/// `valid: false`, never an error status.
pub async fn handler(
    State(state): State<ServiceState>,
    auth: AuthenticatedAccount,
    Path(id): Path<Uuid>,
    Json(req): Json<VerifyPasswordRequest>,
) -> Result<impl IntoResponse, VerifyPasswordError> {
    let record = state
        .database()
        .image_by_id(&id)
        .await?
        .ok_or(VerifyPasswordError::NotFound)?;

    access::authorize_owner_mutation(&record, &auth.context())?;

    let valid = access::verify_resource_password(&record, req.password.as_deref()).await?;
    Ok((
        http::StatusCode::OK,
        Json(VerifyPasswordResponse { valid }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyPasswordError {
    #[error("image not found")]
    NotFound,
    #[error("access error: {0}")]
    Access(#[from] AccessError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for VerifyPasswordError {
    fn into_response(self) -> Response {
        match self {
            VerifyPasswordError::NotFound => {
                (http::StatusCode::NOT_FOUND, "Image not found".to_string()).into_response()
            }
            VerifyPasswordError::Access(AccessError::Forbidden) => (
                http::StatusCode::FORBIDDEN,
                "Not authorized to access this image".to_string(),
            )
                .into_response(),
            VerifyPasswordError::Access(e) => {
                tracing::error!("password verification failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
            VerifyPasswordError::Database(e) => {
                tracing::error!("password verification failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
