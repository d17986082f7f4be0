use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::models::ImageRecord;

use crate::http::extract::AuthenticatedAccount;
use crate::ServiceState;

/// One entry in the caller's dashboard listing. Password hashes stay
/// server-side; only the protection flag is exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub resource_id: Uuid,
    pub filename: String,
    pub requires_password: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ImageRecord> for ResourceSummary {
    fn from(record: ImageRecord) -> Self {
        Self {
            resource_id: record.id,
            requires_password: record.is_protected(),
            created_at: record.created_at,
            filename: record.filename,
        }
    }
}

/// List the caller's own images, newest first.
pub async fn handler(
    State(state): State<ServiceState>,
    auth: AuthenticatedAccount,
) -> Result<impl IntoResponse, ListError> {
    let records = state
        .database()
        .images_for_owner(&auth.account_id)
        .await?;

    let summaries: Vec<ResourceSummary> = records.into_iter().map(Into::into).collect();
    Ok((http::StatusCode::OK, Json(summaries)).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        match self {
            ListError::Database(e) => {
                tracing::error!("image listing failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
