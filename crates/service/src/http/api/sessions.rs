use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::crypto::password::{self, PasswordError};

use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub account_id: Uuid,
    pub display_name: String,
    pub email: String,
    pub token: String,
}

/// Login: verify credentials and mint a session token.
///
/// Account passwords go through the same one-way hash as image
/// passwords; there is no plaintext comparison anywhere. Unknown email
/// and wrong password produce the same response.
pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, SessionError> {
    let account = state
        .database()
        .account_by_email(&req.email)
        .await?
        .ok_or(SessionError::InvalidCredentials)?;

    let valid = password::verify(req.password, account.password_hash.clone()).await?;
    if !valid {
        return Err(SessionError::InvalidCredentials);
    }

    let token = state.tokens().issue(account.id);
    tracing::info!(account_id = %account.id, "session issued");

    Ok((
        http::StatusCode::OK,
        Json(CreateSessionResponse {
            account_id: account.id,
            display_name: account.display_name,
            email: account.email,
            token,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("password verification error: {0}")]
    Password(#[from] PasswordError),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        match self {
            SessionError::InvalidCredentials => (
                http::StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            )
                .into_response(),
            SessionError::Database(e) => {
                tracing::error!("login failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
            SessionError::Password(e) => {
                tracing::error!("login hash verification failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
