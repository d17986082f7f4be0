use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::access;
use common::error::AccessError;

use crate::http::extract::AuthenticatedAccount;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdatePasswordRequest {
    /// New password; absent or empty clears protection.
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePasswordResponse {
    pub protected: bool,
}

/// Set or clear an image password. Owner only.
///
/// This is the only way a record moves between Public and Protected.
pub async fn handler(
    State(state): State<ServiceState>,
    auth: AuthenticatedAccount,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<impl IntoResponse, UpdatePasswordError> {
    // existence first, then ownership: missing resources are 404 even
    // for non-owners at this layer
    let record = state
        .database()
        .image_by_id(&id)
        .await?
        .ok_or(UpdatePasswordError::NotFound)?;

    access::authorize_owner_mutation(&record, &auth.context())?;

    let password_hash = access::hash_optional_password(req.password.as_deref()).await?;
    let protected = password_hash.is_some();

    state
        .database()
        .set_image_password(&id, password_hash.as_deref())
        .await?;

    tracing::info!(resource_id = %id, protected, "image password updated");

    Ok((
        http::StatusCode::OK,
        Json(UpdatePasswordResponse { protected }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum UpdatePasswordError {
    #[error("image not found")]
    NotFound,
    #[error("access error: {0}")]
    Access(#[from] AccessError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for UpdatePasswordError {
    fn into_response(self) -> Response {
        match self {
            UpdatePasswordError::NotFound => {
                (http::StatusCode::NOT_FOUND, "Image not found".to_string()).into_response()
            }
            UpdatePasswordError::Access(AccessError::Forbidden) => (
                http::StatusCode::FORBIDDEN,
                "Not authorized to modify this image".to_string(),
            )
                .into_response(),
            UpdatePasswordError::Access(e) => {
                tracing::error!("password update failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
            UpdatePasswordError::Database(e) => {
                tracing::error!("password update failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
