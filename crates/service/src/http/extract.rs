//! Request extractors for caller identity.

use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::request::Parts;
use http::StatusCode;
use uuid::Uuid;

use common::access::CallerContext;
use common::crypto::token::TokenError;

use crate::ServiceState;

/// Extracts and verifies the `Authorization: Bearer <token>` header.
///
/// Routes that take this extractor reject unauthenticated callers with
/// a 401 before the handler body runs. Anonymous routes simply do not
/// use it.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedAccount {
    pub account_id: Uuid,
}

impl AuthenticatedAccount {
    pub fn context(&self) -> CallerContext {
        CallerContext::Authenticated(self.account_id)
    }
}

#[axum::async_trait]
impl FromRequestParts<ServiceState> for AuthenticatedAccount {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let token = match header {
            None => return Err(AuthRejection(TokenError::Missing)),
            Some(value) => value
                .strip_prefix("Bearer ")
                .ok_or(AuthRejection(TokenError::Malformed))?,
        };

        let account_id = state.tokens().verify(token).map_err(AuthRejection)?;
        Ok(Self { account_id })
    }
}

#[derive(Debug)]
pub struct AuthRejection(pub TokenError);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let msg = match self.0 {
            TokenError::Missing => "no token provided",
            TokenError::Malformed => "invalid token",
            TokenError::InvalidSignature => "invalid token",
            TokenError::Expired => "token expired",
        };
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "msg": msg })),
        )
            .into_response()
    }
}
