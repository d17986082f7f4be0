use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::crypto::password::{self, PasswordError};

use crate::database::AccountQueryError;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub account_id: Uuid,
}

/// Register a new account.
pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, RegisterError> {
    if req.display_name.is_empty() || req.email.is_empty() || req.password.is_empty() {
        return Err(RegisterError::InvalidRequest(
            "display_name, email and password are required".into(),
        ));
    }

    let password_hash = password::hash(req.password).await?;
    let account = state
        .database()
        .create_account(&req.display_name, &req.email, &password_hash)
        .await?;

    tracing::info!(account_id = %account.id, "account registered");

    Ok((
        http::StatusCode::CREATED,
        Json(RegisterResponse {
            account_id: account.id,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("account query error: {0}")]
    Account(#[from] AccountQueryError),
    #[error("password hash error: {0}")]
    Password(#[from] PasswordError),
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        match self {
            RegisterError::InvalidRequest(msg) => (
                http::StatusCode::BAD_REQUEST,
                format!("Bad request: {}", msg),
            )
                .into_response(),
            RegisterError::Account(AccountQueryError::EmailTaken) => (
                http::StatusCode::CONFLICT,
                "Email is already registered".to_string(),
            )
                .into_response(),
            RegisterError::Account(AccountQueryError::Database(e)) => {
                tracing::error!("account creation failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
            RegisterError::Password(e) => {
                tracing::error!("password hashing failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
